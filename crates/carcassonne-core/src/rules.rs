//! Game configuration.

use crate::scoring::ScoreTable;
use serde::{Deserialize, Serialize};

/// Knobs fixed at game creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    pub min_teams: usize,
    pub max_teams: usize,
    /// Tokens each team starts with
    pub tokens_per_team: u32,
    pub scoring: ScoreTable,
}

impl Ruleset {
    pub const STANDARD: Ruleset = Ruleset {
        min_teams: 2,
        max_teams: 5,
        tokens_per_team: 7,
        scoring: ScoreTable::STANDARD,
    };

    /// Whether `count` teams may play under these rules
    pub fn allows_team_count(&self, count: usize) -> bool {
        (self.min_teams..=self.max_teams).contains(&count)
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::STANDARD
    }
}
