//! A game hosted by the command line tool.

use carcassonne_core::{GameError, GameEvent, GameRecord, GameState, Snapshot, TeamId};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0} has no legal action")]
    Stalled(TeamId),

    #[error("Game did not finish within {0} actions")]
    TooLong(usize),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Final scores and the game as it ended
#[derive(Debug, Serialize)]
pub struct Report {
    pub winners: Vec<TeamId>,
    pub scores: Vec<(TeamId, u32)>,
    pub tiles_placed: usize,
    pub structures_scored: usize,
    pub actions: usize,
    pub snapshot: Snapshot,
}

/// A game together with everything that happened in it
pub struct Session {
    game: GameState,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(teams: Vec<TeamId>, seed: u64) -> Result<Self, SessionError> {
        let game = GameState::new(teams, seed)?;
        info!(teams = game.teams().len(), seed, "game created");
        Ok(Self {
            game,
            events: Vec::new(),
        })
    }

    /// Rebuild a recorded game
    pub fn replay(record: &GameRecord) -> Result<Self, SessionError> {
        let game = record.replay()?;
        info!(actions = record.actions.len(), "game replayed");
        Ok(Self {
            game,
            events: Vec::new(),
        })
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Take the first legal action for the team to move. Returns false once
    /// the game is over.
    pub fn step(&mut self) -> Result<bool, SessionError> {
        let Some(team) = self.game.current_team().cloned() else {
            return Ok(false);
        };
        let action = self
            .game
            .valid_actions(&team)
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::Stalled(team.clone()))?;

        debug!(%team, ?action, "autoplay");
        let events = self.game.apply_action(&team, action)?;
        self.events.extend(events);
        Ok(true)
    }

    /// Step until the game ends
    pub fn play_out(&mut self, max_actions: usize) -> Result<(), SessionError> {
        for _ in 0..max_actions {
            if !self.step()? {
                return Ok(());
            }
        }
        if self.game.is_finished() {
            Ok(())
        } else {
            Err(SessionError::TooLong(max_actions))
        }
    }

    pub fn record(&self) -> GameRecord {
        self.game.record()
    }

    pub fn report(&self) -> Report {
        Report {
            winners: self.game.winners().to_vec(),
            scores: self
                .game
                .teams()
                .iter()
                .map(|t| (t.id.clone(), t.score))
                .collect(),
            tiles_placed: self.game.board().len(),
            structures_scored: self
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::StructureScored { .. }))
                .count(),
            actions: self.game.log().len(),
            snapshot: self.game.snapshot(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams(names: &[&str]) -> Vec<TeamId> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_autoplay_finishes() {
        let mut session = Session::new(teams(&["A", "B"]), 7).unwrap();
        session.play_out(1000).unwrap();
        assert!(session.game().is_finished());

        let report = session.report();
        assert!(!report.winners.is_empty());
        assert!(report.tiles_placed > 1);
        assert!(report.structures_scored > 0);
    }

    #[test]
    fn test_replay_matches_autoplay() {
        let mut session = Session::new(teams(&["A", "B", "C"]), 3).unwrap();
        session.play_out(1000).unwrap();

        let replayed = Session::replay(&session.record()).unwrap();
        assert_eq!(replayed.game().snapshot(None), session.game().snapshot(None));
    }

    #[test]
    fn test_bad_team_list() {
        assert!(matches!(
            Session::new(teams(&["A"]), 1),
            Err(SessionError::Game(GameError::InvalidTeamCount(_)))
        ));
    }

    #[test]
    fn test_step_limit() {
        let mut session = Session::new(teams(&["A", "B"]), 1).unwrap();
        assert!(matches!(session.play_out(3), Err(SessionError::TooLong(3))));
    }
}
