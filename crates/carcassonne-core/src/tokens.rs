//! Tokens on the board and the claims they make.

use crate::grid::Position;
use crate::structure::{Spot, Structure, StructureKind};
use crate::team::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// Token types, one per claimable structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Claims a farm
    Farmer,
    /// Claims a city
    Knight,
    /// Claims a road
    Thief,
    /// Claims a cloister
    Monk,
}

impl TokenKind {
    pub const ALL: [TokenKind; 4] = [
        TokenKind::Farmer,
        TokenKind::Knight,
        TokenKind::Thief,
        TokenKind::Monk,
    ];

    /// The structure this token claims
    pub const fn claims(self) -> StructureKind {
        match self {
            TokenKind::Farmer => StructureKind::Farm,
            TokenKind::Knight => StructureKind::City,
            TokenKind::Thief => StructureKind::Road,
            TokenKind::Monk => StructureKind::Cloister,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Farmer => "Farmer",
            TokenKind::Knight => "Knight",
            TokenKind::Thief => "Thief",
            TokenKind::Monk => "Monk",
        }
    }

    pub fn from_name(name: &str) -> Option<TokenKind> {
        match name {
            "Farmer" => Some(TokenKind::Farmer),
            "Knight" => Some(TokenKind::Knight),
            "Thief" => Some(TokenKind::Thief),
            "Monk" => Some(TokenKind::Monk),
            _ => None,
        }
    }

    /// Whether `spot` has the right shape for this token
    pub const fn fits(self, spot: Spot) -> bool {
        matches!(
            (self, spot),
            (TokenKind::Farmer, Spot::Farm(_))
                | (TokenKind::Knight, Spot::Edge(_))
                | (TokenKind::Thief, Spot::Edge(_))
                | (TokenKind::Monk, Spot::Center)
        )
    }
}

impl StructureKind {
    /// The token that claims this structure
    pub const fn token_kind(self) -> TokenKind {
        match self {
            StructureKind::Farm => TokenKind::Farmer,
            StructureKind::City => TokenKind::Knight,
            StructureKind::Road => TokenKind::Thief,
            StructureKind::Cloister => TokenKind::Monk,
        }
    }
}

/// A token standing on the board
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub position: Position,
    pub team: TeamId,
    pub kind: TokenKind,
    pub spot: Spot,
}

impl Token {
    pub fn new(position: Position, team: impl Into<TeamId>, kind: TokenKind, spot: Spot) -> Self {
        Self {
            position,
            team: team.into(),
            kind,
            spot,
        }
    }
}

/// Every token currently on the board, in placement order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTracker {
    tokens: Vec<Token>,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn add(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Tokens of the structure's claiming type standing inside it
    pub fn in_structure(&self, structure: &Structure) -> Vec<Token> {
        let kind = structure.kind.token_kind();
        self.tokens
            .iter()
            .filter(|t| t.kind == kind && structure.contains(t.position, t.spot))
            .cloned()
            .collect()
    }

    /// Whether nobody has claimed the structure yet
    pub fn unclaimed(&self, structure: &Structure) -> bool {
        self.in_structure(structure).is_empty()
    }

    /// Take tokens off the board and hand them back to their teams
    pub fn remove(&mut self, removed: &[Token], teams: &mut [Team]) {
        self.tokens.retain(|t| !removed.contains(t));
        for token in removed {
            if let Some(team) = teams.iter_mut().find(|team| team.id == token.team) {
                team.return_tokens(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::grid::{FarmSide, Side};

    #[test]
    fn test_token_shapes() {
        assert!(TokenKind::Farmer.fits(Spot::Farm(FarmSide::TOP_A)));
        assert!(!TokenKind::Farmer.fits(Spot::Edge(Side::Top)));
        assert!(TokenKind::Knight.fits(Spot::Edge(Side::Top)));
        assert!(TokenKind::Monk.fits(Spot::Center));
        assert!(!TokenKind::Monk.fits(Spot::Edge(Side::Left)));
        for kind in TokenKind::ALL {
            assert_eq!(kind.claims().token_kind(), kind);
            assert_eq!(TokenKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TokenKind::from_name("Meeple"), None);
    }

    #[test]
    fn test_in_structure_filters_by_kind_and_spot() {
        let board = Board::new();
        let road = board.generate_road(Position::ORIGIN, Side::Left).unwrap();

        let mut tracker = TokenTracker::new();
        tracker.add(Token::new(Position::ORIGIN, "red", TokenKind::Thief, Spot::Edge(Side::Right)));
        tracker.add(Token::new(Position::ORIGIN, "blue", TokenKind::Knight, Spot::Edge(Side::Top)));
        tracker.add(Token::new(
            Position::ORIGIN,
            "blue",
            TokenKind::Farmer,
            Spot::Farm(FarmSide::RIGHT_A),
        ));

        let inside = tracker.in_structure(&road);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].team, "red");
        assert!(!tracker.unclaimed(&road));

        let city = board.generate_city(Position::ORIGIN, Side::Top).unwrap();
        assert_eq!(tracker.in_structure(&city)[0].team, "blue");
    }

    #[test]
    fn test_remove_returns_tokens_to_teams() {
        let mut teams = vec![Team::new("red", 6), Team::new("blue", 7)];
        let token = Token::new(Position::ORIGIN, "red", TokenKind::Thief, Spot::Edge(Side::Left));
        let mut tracker = TokenTracker::new();
        tracker.add(token.clone());

        tracker.remove(&[token], &mut teams);
        assert!(tracker.is_empty());
        assert_eq!(teams[0].tokens_remaining, 7);
        assert_eq!(teams[1].tokens_remaining, 7);
    }
}
