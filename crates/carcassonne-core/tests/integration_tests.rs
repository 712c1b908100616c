//! Integration tests for the Carcassonne rules engine.
//!
//! These tests play complete games from the first tile to final scoring and
//! check the invariants that must hold after every accepted action.

use carcassonne_core::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;

const TEAM_NAMES: [&str; 5] = ["amber", "blue", "coral", "green", "violet"];

fn face(top: EdgeKind, right: EdgeKind, bottom: EdgeKind, left: EdgeKind) -> Tile {
    Tile::new(TileFace::new(top, right, bottom, left, CenterKind::Nil, false, false))
}

/// Pick an action for the team to move: a random placement while a tile is
/// held, otherwise any legal token choice
fn choose_action(game: &GameState, team: &str, rng: &mut ChaCha8Rng) -> GameAction {
    let actions = game.valid_actions(team);
    assert!(!actions.is_empty(), "{team} has nothing to do");

    let placements: Vec<&GameAction> = actions
        .iter()
        .filter(|a| matches!(a, GameAction::PlaceTile { .. }))
        .collect();
    match game.phase() {
        TurnPhase::PlaceTile if !placements.is_empty() => {
            placements[rng.gen_range(0..placements.len())].clone()
        }
        TurnPhase::PlaceTile => GameAction::RotateTileRight,
        _ => actions[rng.gen_range(0..actions.len())].clone(),
    }
}

/// Invariants that hold between any two actions
fn check_invariants(game: &GameState) {
    let teams = game.teams().len() as u32;
    let tokens_per_team = game.ruleset().tokens_per_team;

    assert!(game.board().edges_match(), "touching edges differ");

    let in_supply: u32 = game.teams().iter().map(|t| t.tokens_remaining).sum();
    assert_eq!(
        in_supply + game.tokens().len() as u32,
        tokens_per_team * teams,
        "tokens were created or lost"
    );

    let held = usize::from(game.play_tile().is_some());
    assert_eq!(
        game.tiles_remaining() + game.board().len() + held,
        72,
        "tiles were created or lost"
    );

    // Every offered claim targets an unclaimed structure
    if let Some(team) = game.current_team() {
        for action in game.valid_actions(team) {
            if let GameAction::PlaceToken(TokenChoice::Place { kind, x, y, spot }) = action {
                let structure = game
                    .board()
                    .generate(kind.claims(), Position::new(x, y), spot)
                    .unwrap();
                assert!(game.tokens().in_structure(&structure).is_empty());
            }
        }
    }
}

/// Play a whole game, checking invariants after every action
fn play_out(teams: &[&str], seed: u64) -> GameState {
    let mut game = GameState::new(teams.iter().copied(), seed).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    let max_actions = 72 * 4;

    check_invariants(&game);
    for _ in 0..max_actions {
        let Some(team) = game.current_team().cloned() else {
            break;
        };
        let action = choose_action(&game, &team, &mut rng);
        game.apply_action(&team, action).unwrap();
        check_invariants(&game);
    }

    assert!(
        game.is_finished(),
        "game should end within {max_actions} actions"
    );
    game
}

#[test]
fn test_full_game_two_teams() {
    let game = play_out(&TEAM_NAMES[..2], 7);

    assert!(!game.winners().is_empty());
    let best = game.teams().iter().map(|t| t.score).max().unwrap();
    for winner in game.winners() {
        assert_eq!(game.team(winner).unwrap().score, best);
    }

    // Final scoring sends every token home
    assert!(game.tokens().is_empty());
    for team in game.teams() {
        assert_eq!(team.tokens_remaining, 7);
    }
}

#[test]
fn test_full_game_five_teams() {
    let game = play_out(&TEAM_NAMES, 2024);
    assert!(game.is_finished());
    assert!(game.board().len() > 1);
    assert!(game.snapshot(None).targets.is_empty());
}

#[test]
fn test_replay_from_json_record() {
    let game = play_out(&TEAM_NAMES[..3], 99);
    let json = game.record().to_json().unwrap();

    let replayed = GameRecord::from_json(&json).unwrap().replay().unwrap();
    assert_eq!(replayed.snapshot(None), game.snapshot(None));
    assert_eq!(replayed.winners(), game.winners());
}

#[test]
fn test_actions_after_game_over() {
    let mut game = play_out(&TEAM_NAMES[..2], 5);
    let first = game.teams()[0].id.clone();
    assert_eq!(
        game.apply_action(&first, GameAction::PlaceTile { x: 0, y: 0 }),
        Err(GameError::GameOver)
    );

    // The host override is still accepted
    game.apply_action(&first, GameAction::SetWinners(vec![first.clone()]))
        .unwrap();
    assert_eq!(game.winners(), [first]);
}

#[test]
fn test_road_scenario_through_raw_actions() {
    use EdgeKind::{Farm as F, Road as R};

    let deck = Deck::stacked(
        vec![face(R, R, R, R), face(R, R, F, R), face(R, F, R, F)],
        0,
    );
    let mut game = GameState::with_deck(["A", "B"], 0, Ruleset::STANDARD, deck).unwrap();

    game.apply_raw("A", "PlaceTile", json!({"x": 1, "y": 0}))
        .unwrap();
    game.apply_raw(
        "A",
        "PlaceToken",
        json!({"type": "Farmer", "x": 1, "y": 0, "side": "LeftB"}),
    )
    .unwrap();

    game.apply_raw("B", "PlaceTile", json!({"x": -1, "y": 0}))
        .unwrap();
    game.apply_raw(
        "B",
        "PlaceToken",
        json!({"type": "Thief", "x": -1, "y": 0, "side": "Right"}),
    )
    .unwrap();

    let snapshot = game.snapshot(Some("A"));
    let b = snapshot.teams.iter().find(|t| t.id == "B").unwrap();
    assert_eq!(b.score, 3);
    assert_eq!(b.tokens_remaining, 7);
    assert_eq!(snapshot.turn.as_deref(), Some("A"));
    assert_eq!(snapshot.tokens.len(), 1);
    assert_eq!(snapshot.tokens[0].kind, TokenKind::Farmer);
    assert!(snapshot.play_tile.is_some());
    assert!(game.snapshot(Some("B")).play_tile.is_none());
}

#[test]
fn test_raw_boundary_errors() {
    let mut game = GameState::new(["A", "B"], 1).unwrap();
    assert!(matches!(
        game.apply_raw("A", "Teleport", json!({})),
        Err(GameError::UnknownActionType(_))
    ));
    assert!(matches!(
        game.apply_raw("A", "PlaceTile", json!({"x": "one"})),
        Err(GameError::InvalidActionDetails(_))
    ));
    assert!(matches!(
        game.apply_raw("A", "SetWinners", json!({"teams": ["A", "Q"]})),
        Err(GameError::InvalidActionDetails(_))
    ));
    assert!(!game.is_finished());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_games_terminate_and_replay(seed in any::<u64>(), teams in 2usize..=5) {
        let game = play_out(&TEAM_NAMES[..teams], seed);
        prop_assert!(game.is_finished());
        prop_assert!(game.tokens().is_empty());

        let replayed = game.record().replay().unwrap();
        prop_assert_eq!(replayed.snapshot(None), game.snapshot(None));
    }
}
