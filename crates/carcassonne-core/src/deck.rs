//! The draw pile.
//!
//! All shuffling goes through one seeded ChaCha8 generator so a game started
//! from the same seed deals the same tiles on every platform.

use crate::board::Board;
use crate::tile::{Tile, STANDARD_TILES};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{trace, warn};

/// Shuffled supply of unplaced tiles. The top of the deck is the end of the
/// vector.
#[derive(Debug, Clone)]
pub struct Deck {
    tiles: Vec<Tile>,
    rng: ChaCha8Rng,
}

impl Deck {
    /// The standard 71 drawable tiles, shuffled
    pub fn standard(seed: u64) -> Self {
        let tiles = STANDARD_TILES
            .iter()
            .flat_map(|(face, count)| std::iter::repeat(*face).take(*count))
            .map(Tile::new)
            .collect();
        Self::from_tiles(tiles, seed)
    }

    /// A shuffled deck of the given tiles
    pub fn from_tiles(tiles: Vec<Tile>, seed: u64) -> Self {
        let mut deck = Self {
            tiles,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        deck.shuffle();
        deck
    }

    /// A deck dealt in exactly the given order, first element on top
    pub fn stacked(mut tiles: Vec<Tile>, seed: u64) -> Self {
        tiles.reverse();
        Self {
            tiles,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn shuffle(&mut self) {
        self.tiles.shuffle(&mut self.rng);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Take the top tile
    pub fn draw(&mut self) -> Option<Tile> {
        self.tiles.pop()
    }

    /// Return a tile to the deck and reshuffle
    pub fn add(&mut self, tile: Tile) {
        self.tiles.push(tile);
        self.shuffle();
    }

    /// Slide a tile under the deck without reshuffling
    fn put_back(&mut self, tile: Tile) {
        self.tiles.insert(0, tile);
    }

    /// Draw until some tile fits the board in one of its rotations.
    ///
    /// At most `max_attempts` tiles are examined. Rejected tiles go to the
    /// bottom of the deck, so with `max_attempts == len()` every tile is
    /// tried exactly once. The returned tile is already turned to the first
    /// orientation that fits.
    pub fn draw_playable(&mut self, board: &Board, max_attempts: usize) -> Option<Tile> {
        for attempt in 0..max_attempts {
            let mut tile = self.draw()?;
            for _ in 0..4 {
                if board.playable(&tile) {
                    trace!(attempt, "drew playable tile");
                    return Some(tile);
                }
                tile.rotate_right();
            }
            trace!(attempt, face = ?tile.face(), "tile does not fit anywhere");
            self.put_back(tile);
        }

        if !self.is_empty() {
            warn!(
                remaining = self.len(),
                max_attempts, "no playable tile left in the deck"
            );
        }
        None
    }
}
