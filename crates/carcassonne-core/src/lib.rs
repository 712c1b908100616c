//! Carcassonne - a rules engine for tile-placement, region-claiming games
//!
//! This crate provides the core game logic, including:
//! - A square grid with four edge sides and eight farm notches per cell
//! - Tiles, rotation and the standard tile supply
//! - Structure discovery for roads, cities, farms and cloisters
//! - Token claims, scoring and majority resolution
//! - The turn state machine with full rule enforcement
//!
//! # Architecture
//!
//! The engine is synchronous and deterministic. All randomness comes from the
//! seed a game is created with, so a [`GameRecord`] (teams, seed and the
//! accepted actions) rebuilds any game exactly. Hosts drive a game through
//! [`GameState::apply_action`] or the string-keyed [`GameState::apply_raw`]
//! and read it back with [`GameState::snapshot`].
//!
//! # Modules
//!
//! - [`grid`]: Sides, farm notches and board coordinates
//! - [`tile`]: Tile faces, rotation and per-tile topology
//! - [`board`]: Placed tiles and placement rules
//! - [`structure`]: Roads, cities, farms and cloisters spanning tiles
//! - [`deck`]: The seeded draw pile
//! - [`tokens`]: Tokens on the board
//! - [`scoring`]: Point values and majority resolution
//! - [`game`]: Game state machine

pub mod actions;
pub mod board;
pub mod deck;
pub mod game;
pub mod grid;
pub mod record;
pub mod rules;
pub mod scoring;
pub mod structure;
pub mod team;
pub mod tile;
pub mod tokens;

// Re-export commonly used types
pub use actions::{ActionKind, GameAction, GameEvent, RawAction, TokenChoice};
pub use board::{Board, EmptySpace, PlacementError};
pub use deck::Deck;
pub use game::{GameError, GameState, Snapshot, TurnPhase};
pub use grid::{FarmSide, Half, Position, Side};
pub use record::{GameRecord, LoggedAction};
pub use rules::Ruleset;
pub use scoring::{points_winners, ScoreTable};
pub use structure::{Node, Spot, Structure, StructureError, StructureKind};
pub use team::{Team, TeamId};
pub use tile::{CenterKind, Claims, EdgeKind, Tile, TileFace, START_TILE, STANDARD_TILES};
pub use tokens::{Token, TokenKind, TokenTracker};
