//! Replayable game records.
//!
//! A game is fully determined by its teams, its seed, its rules and the
//! ordered list of accepted actions, so that is all a record stores.

use crate::actions::GameAction;
use crate::game::{GameError, GameState};
use crate::rules::Ruleset;
use crate::team::TeamId;
use serde::{Deserialize, Serialize};

/// One accepted action and the team that submitted it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedAction {
    pub team: TeamId,
    pub action: GameAction,
}

/// Everything needed to rebuild a game from scratch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub teams: Vec<TeamId>,
    pub seed: u64,
    #[serde(default)]
    pub ruleset: Ruleset,
    pub actions: Vec<LoggedAction>,
}

impl GameRecord {
    /// Start a fresh game from the record and apply every action in order
    pub fn replay(&self) -> Result<GameState, GameError> {
        let mut game = GameState::with_ruleset(self.teams.iter().cloned(), self.seed, self.ruleset)?;
        for logged in &self.actions {
            game.apply_action(&logged.team, logged.action.clone())?;
        }
        Ok(game)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_replay_reaches_same_state() {
        let mut game = GameState::new(["red", "blue"], 21).unwrap();
        for _ in 0..6 {
            let Some(team) = game.current_team().cloned() else {
                break;
            };
            let action = game.valid_actions(&team)[0].clone();
            game.apply_action(&team, action).unwrap();
        }

        let record = game.record();
        let json = record.to_json().unwrap();
        let replayed = GameRecord::from_json(&json).unwrap().replay().unwrap();
        assert_eq!(replayed.snapshot(None), game.snapshot(None));
        assert_eq!(replayed.record(), record);
    }

    #[test]
    fn test_replay_rejects_illegal_history() {
        let record = GameRecord {
            teams: vec!["red".into(), "blue".into()],
            seed: 4,
            ruleset: Ruleset::STANDARD,
            actions: vec![LoggedAction {
                team: "blue".into(),
                action: GameAction::RotateTileRight,
            }],
        };
        assert!(matches!(record.replay(), Err(GameError::WrongTurn(_))));
    }
}
