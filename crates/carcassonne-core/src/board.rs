//! Game board: a sparse grid of placed tiles.
//!
//! This module contains:
//! - The board map with its fixed start tile
//! - Placement validation (occupancy, adjacency, edge matching)
//! - Frontier enumeration and playability checks
//!
//! Structure discovery lives in [`crate::structure`].

use crate::grid::{Position, Side};
use crate::tile::{Tile, TileFace, START_TILE};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Why a tile cannot go where it was asked to
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("a tile already exists at {0}")]
    Occupied(Position),

    #[error("no tile next to {0}")]
    NotAdjacent(Position),

    #[error("{0} is out of reach of the board")]
    OutOfRange(Position),

    #[error("{side:?} edge does not match the neighbor at {neighbor}")]
    EdgeMismatch { side: Side, neighbor: Position },
}

/// An empty cell on the frontier together with the tiles around it
#[derive(Debug, Clone)]
pub struct EmptySpace<'a> {
    pub position: Position,
    /// Placed neighbors, indexed like `Side::ALL`
    pub neighbors: [Option<&'a Tile>; 4],
}

impl EmptySpace<'_> {
    /// Whether `tile` in its current rotation fits this cell
    pub fn admits(&self, tile: &Tile) -> bool {
        Side::ALL.into_iter().all(|side| match self.neighbors[side.index()] {
            Some(neighbor) => neighbor.edge(side.opposite()) == tile.edge(side),
            None => true,
        })
    }
}

/// The complete game board
#[derive(Debug, Clone)]
pub struct Board {
    /// All placed tiles indexed by coordinate
    tiles: HashMap<Position, Tile>,
    /// Placement order, start tile first
    order: Vec<Position>,
}

impl Board {
    /// Create a board holding the standard start tile at the origin
    pub fn new() -> Self {
        Self::with_start_tile(START_TILE)
    }

    /// Create a board with a custom start tile at the origin
    pub fn with_start_tile(face: TileFace) -> Self {
        let mut start = Tile::new(face);
        start.set_position(Position::ORIGIN);
        Self {
            tiles: HashMap::from([(Position::ORIGIN, start)]),
            order: vec![Position::ORIGIN],
        }
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    pub(crate) fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.tiles.get_mut(&position)
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.tiles.contains_key(&position)
    }

    /// Placed tiles in the order they were placed
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.order.iter().filter_map(|position| self.tiles.get(position))
    }

    /// Number of tiles on the board
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Check whether `tile` may be placed at `position` without placing it
    pub fn check_placement(&self, tile: &Tile, position: Position) -> Result<(), PlacementError> {
        if !self.within_reach(position) {
            return Err(PlacementError::OutOfRange(position));
        }
        if self.is_occupied(position) {
            return Err(PlacementError::Occupied(position));
        }

        let mut adjacent = false;
        for side in Side::ALL {
            let neighbor_position = position.neighbor(side);
            if let Some(neighbor) = self.tile(neighbor_position) {
                adjacent = true;
                if neighbor.edge(side.opposite()) != tile.edge(side) {
                    return Err(PlacementError::EdgeMismatch {
                        side,
                        neighbor: neighbor_position,
                    });
                }
            }
        }

        if !adjacent {
            return Err(PlacementError::NotAdjacent(position));
        }
        Ok(())
    }

    /// Every tile is placed next to an earlier one, so no cell farther from
    /// the origin than the tile count can border the board
    fn within_reach(&self, position: Position) -> bool {
        let reach = self.tiles.len() as u64;
        u64::from(position.x.unsigned_abs()) <= reach && u64::from(position.y.unsigned_abs()) <= reach
    }

    /// Place a tile, fixing its position for the rest of the game
    pub fn place(&mut self, mut tile: Tile, position: Position) -> Result<(), PlacementError> {
        self.check_placement(&tile, position)?;
        tile.set_position(position);
        self.tiles.insert(position, tile);
        self.order.push(position);
        Ok(())
    }

    /// Empty cells next to at least one placed tile, sorted by coordinate
    pub fn frontier(&self) -> Vec<Position> {
        let mut cells: HashSet<Position> = HashSet::new();
        for position in self.tiles.keys() {
            for neighbor in position.neighbors() {
                if !self.is_occupied(neighbor) {
                    cells.insert(neighbor);
                }
            }
        }
        let mut cells: Vec<Position> = cells.into_iter().collect();
        cells.sort();
        cells
    }

    /// The frontier with each cell's placed neighbors
    pub fn empty_spaces(&self) -> Vec<EmptySpace<'_>> {
        self.frontier()
            .into_iter()
            .map(|position| EmptySpace {
                position,
                neighbors: position.neighbors().map(|p| self.tile(p)),
            })
            .collect()
    }

    /// Frontier cells accepting `tile` in its current rotation
    pub fn valid_placements(&self, tile: &Tile) -> Vec<Position> {
        self.empty_spaces()
            .into_iter()
            .filter(|space| space.admits(tile))
            .map(|space| space.position)
            .collect()
    }

    /// Whether some frontier cell accepts `tile` in its current rotation
    pub fn playable(&self, tile: &Tile) -> bool {
        self.empty_spaces().iter().any(|space| space.admits(tile))
    }

    /// Number of occupied cells among the eight around `position`
    pub fn surrounding_count(&self, position: Position) -> usize {
        position
            .surrounding()
            .iter()
            .filter(|p| self.is_occupied(**p))
            .count()
    }

    /// Whether every pair of touching tiles shows matching edges
    pub fn edges_match(&self) -> bool {
        self.tiles.iter().all(|(position, tile)| {
            Side::ALL.into_iter().all(|side| {
                self.tile(position.neighbor(side))
                    .map_or(true, |neighbor| neighbor.edge(side.opposite()) == tile.edge(side))
            })
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
