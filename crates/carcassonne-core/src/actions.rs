//! Game actions that teams can take.
//!
//! This module defines all possible actions in the game, the events that
//! result from those actions, and the parser for the string-keyed action
//! boundary used by hosting layers.

use crate::game::GameError;
use crate::grid::Position;
use crate::structure::{Spot, StructureKind};
use crate::team::TeamId;
use crate::tile::TileFace;
use crate::tokens::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// All possible actions a team can take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    // ==================== Tile Phase ====================
    /// Turn the held tile a quarter clockwise
    RotateTileRight,
    /// Turn the held tile a quarter counter-clockwise
    RotateTileLeft,
    /// Put the held tile on the board in its current orientation
    PlaceTile { x: i32, y: i32 },

    // ==================== Token Phase ====================
    /// Claim a structure on the tile just placed, or pass
    PlaceToken(TokenChoice),

    // ==================== Host ====================
    /// Declare the winners directly and end the game
    SetWinners(Vec<TeamId>),
}

/// What a team does after placing its tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenChoice {
    Pass,
    Place {
        kind: TokenKind,
        x: i32,
        y: i32,
        spot: Spot,
    },
}

impl GameAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            GameAction::RotateTileRight => ActionKind::RotateTileRight,
            GameAction::RotateTileLeft => ActionKind::RotateTileLeft,
            GameAction::PlaceTile { .. } => ActionKind::PlaceTile,
            GameAction::PlaceToken(_) => ActionKind::PlaceToken,
            GameAction::SetWinners(_) => ActionKind::SetWinners,
        }
    }

    /// Whether this rotation cancels `other`
    pub(crate) fn undoes(&self, other: &GameAction) -> bool {
        matches!(
            (self, other),
            (GameAction::RotateTileRight, GameAction::RotateTileLeft)
                | (GameAction::RotateTileLeft, GameAction::RotateTileRight)
        )
    }

    pub(crate) fn is_rotation(&self) -> bool {
        matches!(self, GameAction::RotateTileRight | GameAction::RotateTileLeft)
    }
}

/// Action names on the string-keyed boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    PlaceTile,
    PlaceToken,
    RotateTileRight,
    RotateTileLeft,
    SetWinners,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::PlaceTile => "PlaceTile",
            ActionKind::PlaceToken => "PlaceToken",
            ActionKind::RotateTileRight => "RotateTileRight",
            ActionKind::RotateTileLeft => "RotateTileLeft",
            ActionKind::SetWinners => "SetWinners",
        }
    }

    pub fn from_name(name: &str) -> Option<ActionKind> {
        match name {
            "PlaceTile" => Some(ActionKind::PlaceTile),
            "PlaceToken" => Some(ActionKind::PlaceToken),
            "RotateTileRight" => Some(ActionKind::RotateTileRight),
            "RotateTileLeft" => Some(ActionKind::RotateTileLeft),
            "SetWinners" => Some(ActionKind::SetWinners),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Raw Payloads ====================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaceTileDetails {
    x: i32,
    y: i32,
    /// The face the submitter believes it holds
    #[serde(default)]
    tile: Option<TileFace>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaceTokenDetails {
    #[serde(default)]
    pass: bool,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    x: Option<i32>,
    #[serde(default)]
    y: Option<i32>,
    #[serde(default)]
    side: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetWinnersDetails {
    teams: Vec<TeamId>,
}

/// An action decoded from the string-keyed boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAction {
    pub action: GameAction,
    /// Face the submitter expects to be holding, for `PlaceTile`
    pub expected_tile: Option<TileFace>,
}

impl RawAction {
    /// Decode `details` for an action named `kind`
    pub fn parse(kind: &str, details: Value) -> Result<RawAction, GameError> {
        let kind = ActionKind::from_name(kind)
            .ok_or_else(|| GameError::UnknownActionType(kind.to_string()))?;

        let mut expected_tile = None;
        let action = match kind {
            ActionKind::RotateTileRight => GameAction::RotateTileRight,
            ActionKind::RotateTileLeft => GameAction::RotateTileLeft,
            ActionKind::PlaceTile => {
                let details: PlaceTileDetails = decode(kind, details)?;
                expected_tile = details.tile;
                GameAction::PlaceTile {
                    x: details.x,
                    y: details.y,
                }
            }
            ActionKind::PlaceToken => {
                let details: PlaceTokenDetails = decode(kind, details)?;
                GameAction::PlaceToken(token_choice(details)?)
            }
            ActionKind::SetWinners => {
                let details: SetWinnersDetails = decode(kind, details)?;
                GameAction::SetWinners(details.teams)
            }
        };

        Ok(RawAction {
            action,
            expected_tile,
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(kind: ActionKind, details: Value) -> Result<T, GameError> {
    serde_json::from_value(details)
        .map_err(|e| GameError::InvalidActionDetails(format!("{kind}: {e}")))
}

fn token_choice(details: PlaceTokenDetails) -> Result<TokenChoice, GameError> {
    if details.pass {
        return Ok(TokenChoice::Pass);
    }

    let invalid = |reason: String| GameError::InvalidActionDetails(reason);
    let name = details
        .kind
        .ok_or_else(|| invalid("token type is required unless passing".into()))?;
    let kind = TokenKind::from_name(&name).ok_or_else(|| invalid(format!("unknown token type {name}")))?;
    let (Some(x), Some(y)) = (details.x, details.y) else {
        return Err(invalid("token coordinates are required".into()));
    };

    let spot = match (kind, details.side.as_deref()) {
        (TokenKind::Monk, None | Some("") | Some("Center")) => Spot::Center,
        (TokenKind::Monk, Some(side)) => {
            return Err(invalid(format!("a Monk stands in the center, not on {side}")))
        }
        (_, None) => return Err(invalid(format!("a {name} needs a side"))),
        (_, Some(side)) => {
            Spot::from_name(side).ok_or_else(|| invalid(format!("unknown side {side}")))?
        }
    };
    if !kind.fits(spot) {
        return Err(invalid(format!("a {name} cannot stand on {spot}")));
    }

    Ok(TokenChoice::Place { kind, x, y, spot })
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The held tile was turned
    TileRotated { team: TeamId, face: TileFace },

    /// A tile went onto the board
    TilePlaced {
        team: TeamId,
        position: Position,
        face: TileFace,
    },

    /// A token claimed a structure
    TokenPlaced { token: Token },

    /// The team placed no token; `forced` when it had no choice
    TokenPassed { team: TeamId, forced: bool },

    /// A structure paid out and its tokens went home
    StructureScored {
        kind: StructureKind,
        complete: bool,
        points: u32,
        winners: Vec<TeamId>,
        tokens_returned: usize,
    },

    /// The next team received a tile
    TileDrawn { team: TeamId, tiles_remaining: usize },

    /// It is now this team's turn
    TurnChanged { team: TeamId },

    /// The deck ran dry and the game was scored
    GameEnded { winners: Vec<TeamId> },

    /// The host declared the winners
    WinnersSet { winners: Vec<TeamId> },
}
