//! Core game state machine.
//!
//! This module contains the main `GameState` struct and all game logic:
//! turn order, tile and token placement, the scoring cascade that follows
//! every turn, and end-of-game scoring.
//!
//! Every action is validated before anything is written. The work done at
//! the end of a turn (scoring, returning tokens, drawing the next tile) is
//! first computed as a [`TurnPlan`] against `&self` and only then committed.

use crate::actions::{GameAction, GameEvent, RawAction, TokenChoice};
use crate::board::{Board, PlacementError};
use crate::deck::Deck;
use crate::grid::{FarmSide, Position};
use crate::record::{GameRecord, LoggedAction};
use crate::rules::Ruleset;
use crate::scoring::{points_winners, ScoreTable};
use crate::structure::{Spot, Structure, StructureError, StructureKind};
use crate::team::{Team, TeamId};
use crate::tile::{EdgeKind, Tile};
use crate::tokens::{Token, TokenKind, TokenTracker};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when creating a game or applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Invalid team count: {0}")]
    InvalidTeamCount(String),

    #[error("Wrong turn: {0}")]
    WrongTurn(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid action details: {0}")]
    InvalidActionDetails(String),

    #[error("Game is over")]
    GameOver,

    #[error("Unknown action type: {0}")]
    UnknownActionType(String),
}

impl From<PlacementError> for GameError {
    fn from(err: PlacementError) -> Self {
        GameError::InvalidAction(err.to_string())
    }
}

impl From<StructureError> for GameError {
    fn from(err: StructureError) -> Self {
        match err {
            StructureError::NoTile(_) => GameError::InvalidAction(err.to_string()),
            StructureError::NotOnTile { .. } => GameError::InvalidActionDetails(err.to_string()),
        }
    }
}

/// What the game is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Current team rotates and places its tile
    PlaceTile,
    /// Current team claims something on the tile it just placed, or passes
    PlaceToken,
    /// Winners are known
    Finished,
}

/// A structure that paid out
#[derive(Debug, Clone)]
struct Payout {
    structure: Structure,
    points: u32,
    winners: Vec<TeamId>,
    tokens: Vec<Token>,
}

/// Everything the end of a turn changes, computed before anything is written
#[derive(Debug)]
struct TurnPlan {
    board: Board,
    teams: Vec<Team>,
    tokens: TokenTracker,
    deck: Deck,
    payouts: Vec<Payout>,
    /// `None` ends the game
    next_tile: Option<Tile>,
    final_payouts: Vec<Payout>,
}

/// Read-only view of a game, optionally from one team's seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Team whose turn it is, `None` once the game is over
    pub turn: Option<TeamId>,
    pub phase: TurnPhase,
    /// Turn order with token supplies and scores
    pub teams: Vec<Team>,
    pub winners: Vec<TeamId>,
    /// Held tile, hidden from teams other than the holder
    pub play_tile: Option<Tile>,
    pub last_placed: Option<Tile>,
    /// Placed tiles, start tile first
    pub board: Vec<Tile>,
    pub tokens: Vec<Token>,
    pub tiles_remaining: usize,
    /// Legal actions for the viewer when it is their turn
    pub targets: Vec<GameAction>,
    /// Accepted actions so far, enough to replay the game
    pub actions: Vec<LoggedAction>,
    pub message: String,
}

/// The complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Teams in turn order
    teams: Vec<Team>,
    /// Seed the deck was shuffled with
    seed: u64,
    ruleset: Ruleset,
    /// Index into `teams` of the team to act
    turn: usize,
    phase: TurnPhase,
    board: Board,
    tokens: TokenTracker,
    deck: Deck,
    /// Tile held by the current team
    play_tile: Option<Tile>,
    /// Tile placed this turn or, between turns, last turn
    last_placed: Option<Position>,
    winners: Vec<TeamId>,
    /// Accepted actions, with cancelling rotations folded away
    log: Vec<LoggedAction>,
}

impl GameState {
    /// Create a standard game. The first team listed plays first.
    pub fn new<I, S>(teams: I, seed: u64) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<TeamId>,
    {
        Self::with_ruleset(teams, seed, Ruleset::STANDARD)
    }

    /// Create a game with the standard deck under custom rules
    pub fn with_ruleset<I, S>(teams: I, seed: u64, ruleset: Ruleset) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<TeamId>,
    {
        Self::with_deck(teams, seed, ruleset, Deck::standard(seed))
    }

    /// Create a game drawing from a prepared deck
    pub fn with_deck<I, S>(teams: I, seed: u64, ruleset: Ruleset, deck: Deck) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<TeamId>,
    {
        let ids: Vec<TeamId> = teams.into_iter().map(Into::into).collect();
        validate_teams(&ids, &ruleset)?;

        let mut game = Self {
            teams: ids
                .into_iter()
                .map(|id| Team::new(id, ruleset.tokens_per_team))
                .collect(),
            seed,
            ruleset,
            turn: 0,
            phase: TurnPhase::PlaceTile,
            board: Board::new(),
            tokens: TokenTracker::new(),
            deck,
            play_tile: None,
            last_placed: None,
            winners: Vec::new(),
            log: Vec::new(),
        };

        let attempts = game.deck.len();
        game.play_tile = game.deck.draw_playable(&game.board, attempts);
        if game.play_tile.is_none() {
            game.phase = TurnPhase::Finished;
            game.winners = leaders(&game.teams);
            info!(winners = ?game.winners, "game over before the first turn");
        }
        Ok(game)
    }

    // ==================== Accessors ====================

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// Team to act, `None` once the game is over
    pub fn current_team(&self) -> Option<&TeamId> {
        if self.is_finished() {
            None
        } else {
            self.teams.get(self.turn).map(|t| &t.id)
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tokens(&self) -> &TokenTracker {
        &self.tokens
    }

    pub fn play_tile(&self) -> Option<&Tile> {
        self.play_tile.as_ref()
    }

    pub fn last_placed(&self) -> Option<Position> {
        self.last_placed
    }

    pub fn winners(&self) -> &[TeamId] {
        &self.winners
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TurnPhase::Finished
    }

    pub fn tiles_remaining(&self) -> usize {
        self.deck.len()
    }

    /// Accepted actions in order, enough to replay the game
    pub fn log(&self) -> &[LoggedAction] {
        &self.log
    }

    pub fn record(&self) -> GameRecord {
        GameRecord {
            teams: self.teams.iter().map(|t| t.id.clone()).collect(),
            seed: self.seed,
            ruleset: self.ruleset,
            actions: self.log.clone(),
        }
    }

    // ==================== Legal Actions ====================

    /// Actions `team` may take right now. Placements come first, so the
    /// first entry is always a move that makes progress.
    pub fn valid_actions(&self, team: &str) -> Vec<GameAction> {
        if self.current_team().map(String::as_str) != Some(team) {
            return Vec::new();
        }

        match self.phase {
            TurnPhase::PlaceTile => {
                let mut actions: Vec<GameAction> = self
                    .play_tile
                    .as_ref()
                    .map(|tile| self.board.valid_placements(tile))
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| GameAction::PlaceTile { x: p.x, y: p.y })
                    .collect();
                actions.push(GameAction::RotateTileRight);
                actions.push(GameAction::RotateTileLeft);
                actions
            }
            TurnPhase::PlaceToken => {
                let mut actions = Vec::new();
                if let Some(position) = self.last_placed {
                    if self.teams[self.turn].has_tokens() {
                        actions.extend(
                            token_targets(&self.board, &self.tokens, position)
                                .into_iter()
                                .map(GameAction::PlaceToken),
                        );
                    }
                }
                actions.push(GameAction::PlaceToken(TokenChoice::Pass));
                actions
            }
            TurnPhase::Finished => Vec::new(),
        }
    }

    // ==================== Action Dispatch ====================

    /// Apply an action to the game state
    pub fn apply_action(
        &mut self,
        team: &str,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() && !matches!(action, GameAction::SetWinners(_)) {
            return Err(GameError::GameOver);
        }
        debug!(team, kind = %action.kind(), "applying action");

        let events = match &action {
            GameAction::RotateTileRight => {
                let index = self.check_turn(team, TurnPhase::PlaceTile)?;
                self.rotate_tile(index, Tile::rotate_right)?
            }
            GameAction::RotateTileLeft => {
                let index = self.check_turn(team, TurnPhase::PlaceTile)?;
                self.rotate_tile(index, Tile::rotate_left)?
            }
            GameAction::PlaceTile { x, y } => {
                let index = self.check_turn(team, TurnPhase::PlaceTile)?;
                self.place_tile(index, Position::new(*x, *y))?
            }
            GameAction::PlaceToken(choice) => {
                let index = self.check_turn(team, TurnPhase::PlaceToken)?;
                self.place_token(index, choice)?
            }
            GameAction::SetWinners(winners) => self.set_winners(winners)?,
        };

        self.log_action(team, action);
        Ok(events)
    }

    /// Apply an action submitted as a name plus JSON details
    pub fn apply_raw(
        &mut self,
        team: &str,
        kind: &str,
        details: Value,
    ) -> Result<Vec<GameEvent>, GameError> {
        let raw = RawAction::parse(kind, details)?;

        if let Some(expected) = raw.expected_tile {
            let holder = self.current_team().map(String::as_str) == Some(team);
            let submitted = Tile::new(expected);
            let matches = self
                .play_tile
                .as_ref()
                .is_some_and(|held| held.same_face(&submitted));
            if holder && self.phase == TurnPhase::PlaceTile && !matches {
                return Err(GameError::InvalidAction(
                    "submitted tile is not the tile in hand".into(),
                ));
            }
        }

        self.apply_action(team, raw.action)
    }

    /// Index of `team` if it may act in `phase` now
    fn check_turn(&self, team: &str, phase: TurnPhase) -> Result<usize, GameError> {
        let index = self
            .teams
            .iter()
            .position(|t| t.id == team)
            .ok_or_else(|| GameError::WrongTurn(format!("{team} is not playing")))?;
        if index != self.turn {
            return Err(GameError::WrongTurn(format!(
                "it is {}'s turn",
                self.teams[self.turn].id
            )));
        }
        if self.phase != phase {
            return Err(GameError::InvalidAction(match self.phase {
                TurnPhase::PlaceTile => "a tile must be placed first".into(),
                TurnPhase::PlaceToken => "the tile is placed, place a token or pass".into(),
                TurnPhase::Finished => "the game is over".into(),
            }));
        }
        Ok(index)
    }

    fn rotate_tile(&mut self, index: usize, turn: fn(&mut Tile)) -> Result<Vec<GameEvent>, GameError> {
        let tile = self
            .play_tile
            .as_mut()
            .ok_or_else(|| GameError::InvalidAction("no tile in hand".into()))?;
        turn(tile);
        Ok(vec![GameEvent::TileRotated {
            team: self.teams[index].id.clone(),
            face: *tile.face(),
        }])
    }

    fn place_tile(&mut self, index: usize, position: Position) -> Result<Vec<GameEvent>, GameError> {
        let tile = self
            .play_tile
            .clone()
            .ok_or_else(|| GameError::InvalidAction("no tile in hand".into()))?;
        let face = *tile.face();

        let mut board = self.board.clone();
        board.place(tile, position)?;

        let team = self.teams[index].id.clone();
        let forced_pass = !self.teams[index].has_tokens()
            || token_targets(&board, &self.tokens, position).is_empty();

        let mut events = vec![GameEvent::TilePlaced {
            team: team.clone(),
            position,
            face,
        }];

        if forced_pass {
            let plan = self.plan_turn_end(board, position, None)?;
            self.play_tile = None;
            self.last_placed = Some(position);
            events.push(GameEvent::TokenPassed { team, forced: true });
            events.extend(self.commit(plan));
        } else {
            self.board = board;
            self.play_tile = None;
            self.last_placed = Some(position);
            self.phase = TurnPhase::PlaceToken;
        }
        Ok(events)
    }

    fn place_token(&mut self, index: usize, choice: &TokenChoice) -> Result<Vec<GameEvent>, GameError> {
        let position = self
            .last_placed
            .ok_or_else(|| GameError::InvalidAction("no tile was placed this turn".into()))?;

        let token = match choice {
            TokenChoice::Pass => None,
            TokenChoice::Place { kind, x, y, spot } => {
                let at = Position::new(*x, *y);
                if at != position {
                    return Err(GameError::InvalidAction(format!(
                        "tokens go on the tile just placed at {position}"
                    )));
                }
                if !kind.fits(*spot) {
                    return Err(GameError::InvalidActionDetails(format!(
                        "a {} cannot stand on {spot}",
                        kind.name()
                    )));
                }
                if !self.teams[index].has_tokens() {
                    return Err(GameError::InvalidAction("no tokens left".into()));
                }
                let structure = self.board.generate(kind.claims(), at, *spot)?;
                if !self.tokens.unclaimed(&structure) {
                    return Err(GameError::InvalidAction(format!(
                        "that {:?} is already claimed",
                        structure.kind
                    )));
                }
                Some(Token::new(at, self.teams[index].id.clone(), *kind, *spot))
            }
        };

        let plan = self.plan_turn_end(self.board.clone(), position, token.clone())?;
        let mut events = vec![match token {
            Some(token) => GameEvent::TokenPlaced { token },
            None => GameEvent::TokenPassed {
                team: self.teams[index].id.clone(),
                forced: false,
            },
        }];
        events.extend(self.commit(plan));
        Ok(events)
    }

    fn set_winners(&mut self, winners: &[TeamId]) -> Result<Vec<GameEvent>, GameError> {
        if winners.is_empty() {
            return Err(GameError::InvalidActionDetails(
                "at least one winner is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for winner in winners {
            if self.team(winner).is_none() {
                return Err(GameError::InvalidActionDetails(format!(
                    "{winner} is not playing"
                )));
            }
            if !seen.insert(winner) {
                return Err(GameError::InvalidActionDetails(format!(
                    "{winner} is listed twice"
                )));
            }
        }

        self.winners = winners.to_vec();
        self.phase = TurnPhase::Finished;
        info!(winners = ?self.winners, "winners declared");
        Ok(vec![GameEvent::WinnersSet {
            winners: self.winners.clone(),
        }])
    }

    /// Append to the log, folding rotations that cancel out
    fn log_action(&mut self, team: &str, action: GameAction) {
        if action.is_rotation() {
            if self.log.last().is_some_and(|last| action.undoes(&last.action)) {
                self.log.pop();
                return;
            }
            let len = self.log.len();
            if len >= 3 && self.log[len - 3..].iter().all(|l| l.action == action) {
                self.log.truncate(len - 3);
                return;
            }
        }
        self.log.push(LoggedAction {
            team: team.to_string(),
            action,
        });
    }

    // ==================== Turn Resolution ====================

    /// Work out the end of the current turn on `board` without touching
    /// `self`
    fn plan_turn_end(
        &self,
        board: Board,
        last: Position,
        token: Option<Token>,
    ) -> Result<TurnPlan, GameError> {
        let scoring = &self.ruleset.scoring;
        let mut teams = self.teams.clone();
        let mut tokens = self.tokens.clone();
        if let Some(token) = token {
            if let Some(team) = teams.iter_mut().find(|t| t.id == token.team) {
                team.take_token();
            }
            tokens.add(token);
        }

        let mut payouts = Vec::new();
        for structure in completed_around(&board, last)? {
            let claimed = tokens.in_structure(&structure);
            if claimed.is_empty() {
                continue;
            }
            payouts.push(pay_out(scoring, &board, structure, claimed, &mut teams, &mut tokens)?);
        }

        let mut deck = self.deck.clone();
        let attempts = deck.len();
        let next_tile = deck.draw_playable(&board, attempts);

        let final_payouts = match next_tile {
            Some(_) => Vec::new(),
            None => final_scoring(scoring, &board, &mut teams, &mut tokens)?,
        };

        Ok(TurnPlan {
            board,
            teams,
            tokens,
            deck,
            payouts,
            next_tile,
            final_payouts,
        })
    }

    /// Write a plan into the game, color the scored structures and hand the
    /// next tile over or finish the game
    fn commit(&mut self, plan: TurnPlan) -> Vec<GameEvent> {
        self.board = plan.board;
        self.teams = plan.teams;
        self.tokens = plan.tokens;
        self.deck = plan.deck;

        let mut events = Vec::new();
        for payout in plan.payouts.iter().chain(&plan.final_payouts) {
            self.color(payout);
            events.push(GameEvent::StructureScored {
                kind: payout.structure.kind,
                complete: payout.structure.complete,
                points: payout.points,
                winners: payout.winners.clone(),
                tokens_returned: payout.tokens.len(),
            });
        }

        match plan.next_tile {
            Some(tile) => {
                self.turn = (self.turn + 1) % self.teams.len();
                self.play_tile = Some(tile);
                self.phase = TurnPhase::PlaceTile;
                let team = self.teams[self.turn].id.clone();
                events.push(GameEvent::TileDrawn {
                    team: team.clone(),
                    tiles_remaining: self.deck.len(),
                });
                events.push(GameEvent::TurnChanged { team });
            }
            None => {
                self.play_tile = None;
                self.phase = TurnPhase::Finished;
                self.winners = leaders(&self.teams);
                info!(winners = ?self.winners, tiles = self.board.len(), "game over");
                events.push(GameEvent::GameEnded {
                    winners: self.winners.clone(),
                });
            }
        }
        events
    }

    /// Mark the tiles of a scored structure with the teams that won it
    fn color(&mut self, payout: &Payout) {
        for node in &payout.structure.nodes {
            let Some(tile) = self.board.tile_mut(node.position) else {
                continue;
            };
            let claims = tile.claims_mut();
            for spot in &node.spots {
                match spot {
                    Spot::Edge(side) => claims.sides[side.index()] = payout.winners.clone(),
                    Spot::Farm(farm_side) => claims.farms[farm_side.index()] = payout.winners.clone(),
                    Spot::Center => claims.center = payout.winners.first().cloned(),
                }
            }
        }
    }

    // ==================== Snapshots ====================

    /// View of the game. With `Some(team)` the held tile and the legal
    /// actions are only shown when `team` is the one to act.
    pub fn snapshot(&self, viewer: Option<&str>) -> Snapshot {
        let current = self.current_team().cloned();
        let sees_hand = match viewer {
            None => true,
            Some(team) => current.as_deref() == Some(team),
        };

        let targets = match (viewer, &current) {
            (None, Some(team)) => self.valid_actions(team),
            (Some(team), Some(_)) => self.valid_actions(team),
            _ => Vec::new(),
        };

        Snapshot {
            turn: current,
            phase: self.phase,
            teams: self.teams.clone(),
            winners: self.winners.clone(),
            play_tile: if sees_hand { self.play_tile.clone() } else { None },
            last_placed: self.last_placed.and_then(|p| self.board.tile(p).cloned()),
            board: self.board.tiles().cloned().collect(),
            tokens: self.tokens.tokens().to_vec(),
            tiles_remaining: self.deck.len(),
            targets,
            actions: self.log.clone(),
            message: self.status_message(),
        }
    }

    fn status_message(&self) -> String {
        match (self.phase, self.current_team()) {
            (TurnPhase::PlaceTile, Some(team)) => format!("{team} to place a tile"),
            (TurnPhase::PlaceToken, Some(team)) => format!("{team} to place a token or pass"),
            _ if self.winners.len() == 1 => format!("Game over, {} wins", self.winners[0]),
            _ => format!("Game over, tie between {}", self.winners.join(", ")),
        }
    }
}

// ==================== Helper Functions ====================

fn validate_teams(teams: &[TeamId], ruleset: &Ruleset) -> Result<(), GameError> {
    if !ruleset.allows_team_count(teams.len()) {
        return Err(GameError::InvalidTeamCount(format!(
            "{} teams, need {} to {}",
            teams.len(),
            ruleset.min_teams,
            ruleset.max_teams
        )));
    }
    let mut seen = HashSet::new();
    for team in teams {
        if !seen.insert(team) {
            return Err(GameError::InvalidTeamCount(format!("{team} is listed twice")));
        }
    }
    Ok(())
}

/// Teams with the highest score, sorted by name
fn leaders(teams: &[Team]) -> Vec<TeamId> {
    let Some(best) = teams.iter().map(|t| t.score).max() else {
        return Vec::new();
    };
    let mut leaders: Vec<TeamId> = teams
        .iter()
        .filter(|t| t.score == best)
        .map(|t| t.id.clone())
        .collect();
    leaders.sort();
    leaders
}

/// Every spot on the tile at `position` a token could claim right now
fn token_targets(board: &Board, tokens: &TokenTracker, position: Position) -> Vec<TokenChoice> {
    let Some(tile) = board.tile(position) else {
        return Vec::new();
    };

    let mut spots: Vec<(TokenKind, Spot)> = Vec::new();
    spots.extend(
        tile.sides_of(EdgeKind::City)
            .into_iter()
            .map(|side| (TokenKind::Knight, Spot::Edge(side))),
    );
    spots.extend(
        tile.sides_of(EdgeKind::Road)
            .into_iter()
            .map(|side| (TokenKind::Thief, Spot::Edge(side))),
    );
    spots.extend(
        FarmSide::ALL
            .into_iter()
            .filter(|farm_side| tile.farm_region(*farm_side).is_some())
            .map(|farm_side| (TokenKind::Farmer, Spot::Farm(farm_side))),
    );
    if tile.has_cloister() {
        spots.push((TokenKind::Monk, Spot::Center));
    }

    spots
        .into_iter()
        .filter(|(kind, spot)| {
            board
                .generate(kind.claims(), position, *spot)
                .is_ok_and(|structure| tokens.unclaimed(&structure))
        })
        .map(|(kind, spot)| TokenChoice::Place {
            kind,
            x: position.x,
            y: position.y,
            spot,
        })
        .collect()
}

/// Completed cities, roads and cloisters touching the tile at `last`, each
/// structure once
fn completed_around(board: &Board, last: Position) -> Result<Vec<Structure>, StructureError> {
    let tile = board.tile(last).ok_or(StructureError::NoTile(last))?;
    let mut found = Vec::new();
    let mut keys = HashSet::new();

    for side in tile.sides_of(EdgeKind::City) {
        let city = board.generate_city(last, side)?;
        if city.complete && keys.insert((StructureKind::City, city.key())) {
            found.push(city);
        }
    }
    for side in tile.sides_of(EdgeKind::Road) {
        let road = board.generate_road(last, side)?;
        if road.complete && keys.insert((StructureKind::Road, road.key())) {
            found.push(road);
        }
    }
    for cell in std::iter::once(last).chain(last.surrounding()) {
        if board.tile(cell).is_some_and(Tile::has_cloister) {
            let cloister = board.generate_cloister(cell)?;
            if cloister.complete {
                found.push(cloister);
            }
        }
    }
    Ok(found)
}

/// Score a structure for the teams with the most tokens in it and send the
/// tokens home
fn pay_out(
    scoring: &ScoreTable,
    board: &Board,
    structure: Structure,
    claimed: Vec<Token>,
    teams: &mut [Team],
    tokens: &mut TokenTracker,
) -> Result<Payout, StructureError> {
    let points = scoring.points(board, &structure)?;
    let winners = points_winners(&claimed);
    for winner in &winners {
        if let Some(team) = teams.iter_mut().find(|t| &t.id == winner) {
            team.add_points(points);
        }
    }
    tokens.remove(&claimed, teams);
    debug!(kind = ?structure.kind, points, ?winners, "structure scored");

    Ok(Payout {
        structure,
        points,
        winners,
        tokens: claimed,
    })
}

/// Score every token still on the board, farms included
fn final_scoring(
    scoring: &ScoreTable,
    board: &Board,
    teams: &mut [Team],
    tokens: &mut TokenTracker,
) -> Result<Vec<Payout>, StructureError> {
    let mut payouts = Vec::new();
    while let Some(first) = tokens.first().cloned() {
        let structure = board.generate(first.kind.claims(), first.position, first.spot)?;
        let mut claimed = tokens.in_structure(&structure);
        if !claimed.contains(&first) {
            claimed.push(first);
        }
        payouts.push(pay_out(scoring, board, structure, claimed, teams, tokens)?);
    }
    Ok(payouts)
}
