//! Points for structures and who receives them.
//!
//! This module contains:
//! - `ScoreTable`, the pinned point values
//! - Structure valuation (roads, cities, cloisters, farms)
//! - Majority resolution between the tokens standing in a structure

use crate::board::Board;
use crate::structure::{Structure, StructureError, StructureKind};
use crate::team::TeamId;
use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point values for every structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    /// Per road tile, complete or not
    pub road_tile: u32,
    /// Per tile of a completed city
    pub city_tile: u32,
    /// Per banner in a completed city
    pub city_banner: u32,
    /// Per tile of a city left open at game end
    pub open_city_tile: u32,
    /// Per banner in a city left open at game end
    pub open_city_banner: u32,
    /// For the cloister tile itself
    pub cloister_base: u32,
    /// Per occupied cell around a cloister
    pub cloister_neighbor: u32,
    /// Per completed city bordering a farm
    pub farm_city: u32,
}

impl ScoreTable {
    pub const STANDARD: ScoreTable = ScoreTable {
        road_tile: 1,
        city_tile: 2,
        city_banner: 2,
        open_city_tile: 1,
        open_city_banner: 1,
        cloister_base: 1,
        cloister_neighbor: 1,
        farm_city: 3,
    };

    /// Value of a structure as it stands on the board
    pub fn points(&self, board: &Board, structure: &Structure) -> Result<u32, StructureError> {
        match structure.kind {
            StructureKind::Road => Ok(self.road(structure)),
            StructureKind::City => Ok(self.city(board, structure)),
            StructureKind::Cloister => self.cloister(board, structure),
            StructureKind::Farm => self.farm(board, structure),
        }
    }

    fn road(&self, road: &Structure) -> u32 {
        self.road_tile * road.tile_count() as u32
    }

    fn city(&self, board: &Board, city: &Structure) -> u32 {
        let tiles = city.tile_count() as u32;
        let banners = city
            .positions()
            .filter(|p| board.tile(*p).is_some_and(|t| t.banner()))
            .count() as u32;
        if city.complete {
            self.city_tile * tiles + self.city_banner * banners
        } else {
            self.open_city_tile * tiles + self.open_city_banner * banners
        }
    }

    fn cloister(&self, board: &Board, cloister: &Structure) -> Result<u32, StructureError> {
        let Some(center) = cloister.positions().next() else {
            return Ok(0);
        };
        if board.tile(center).is_none() {
            return Err(StructureError::NoTile(center));
        }
        Ok(self.cloister_base + self.cloister_neighbor * board.surrounding_count(center) as u32)
    }

    fn farm(&self, board: &Board, farm: &Structure) -> Result<u32, StructureError> {
        let completed = board
            .cities_touching_farm(farm)?
            .iter()
            .filter(|city| city.complete)
            .count() as u32;
        Ok(self.farm_city * completed)
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Teams holding the most tokens in a structure, sorted by name.
///
/// Every team in the result receives the structure's full points. Empty when
/// no token stands in the structure.
pub fn points_winners(tokens: &[Token]) -> Vec<TeamId> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.team.as_str()).or_default() += 1;
    }
    let Some(max) = counts.values().copied().max() else {
        return Vec::new();
    };
    counts
        .into_iter()
        .filter(|(_, count)| *count == max)
        .map(|(team, _)| team.to_string())
        .collect()
}
