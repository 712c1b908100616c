//! Team state: token supply and score.

use serde::{Deserialize, Serialize};

/// Team identifier, the name the host registered the team under
pub type TeamId = String;

/// Per-team mutable state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Name of the team
    pub id: TeamId,
    /// Tokens still in the team's supply
    pub tokens_remaining: u32,
    /// Points scored so far
    pub score: u32,
}

impl Team {
    /// Create a team with a full token supply
    pub fn new(id: impl Into<TeamId>, tokens: u32) -> Self {
        Self {
            id: id.into(),
            tokens_remaining: tokens,
            score: 0,
        }
    }

    pub fn has_tokens(&self) -> bool {
        self.tokens_remaining > 0
    }

    /// Take one token from the supply, returning false if none is left
    pub fn take_token(&mut self) -> bool {
        if self.tokens_remaining == 0 {
            return false;
        }
        self.tokens_remaining -= 1;
        true
    }

    /// Return tokens from the board to the supply
    pub fn return_tokens(&mut self, count: u32) {
        self.tokens_remaining += count;
    }

    pub fn add_points(&mut self, points: u32) {
        self.score += points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_team_has_full_supply() {
        let team = Team::new("red", 7);
        assert_eq!(team.tokens_remaining, 7);
        assert_eq!(team.score, 0);
        assert!(team.has_tokens());
    }

    #[test]
    fn test_take_token_stops_at_zero() {
        let mut team = Team::new("red", 1);
        assert!(team.take_token());
        assert!(!team.take_token());
        assert_eq!(team.tokens_remaining, 0);

        team.return_tokens(2);
        assert_eq!(team.tokens_remaining, 2);
    }
}
