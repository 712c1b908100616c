//! Structure discovery: roads, cities, farms and cloisters spanning tiles.
//!
//! Every structure is rebuilt on demand by a breadth-first walk over the
//! board starting from one tile side. The walk is read-only; coloring the
//! tiles of a scored structure is a separate step done by the game.

use crate::board::Board;
use crate::grid::{FarmSide, Position, Side};
use crate::tile::{EdgeKind, Tile};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Kind of connected region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Road,
    City,
    Farm,
    Cloister,
}

/// A place on a tile where a structure can be entered or a token can sit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Spot {
    /// One of the four edges (roads and cities)
    Edge(Side),
    /// One of the eight farm notches
    Farm(FarmSide),
    /// The middle of the tile (cloisters)
    Center,
}

impl std::fmt::Display for Spot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Spot::Edge(side) => f.write_str(side.name()),
            Spot::Farm(farm_side) => f.write_str(farm_side.name()),
            Spot::Center => f.write_str("Center"),
        }
    }
}

impl Spot {
    /// Parse an edge name ("Top"), a farm notch name ("TopA") or "Center"
    pub fn from_name(name: &str) -> Option<Spot> {
        if name == "Center" {
            return Some(Spot::Center);
        }
        Side::from_name(name)
            .map(Spot::Edge)
            .or_else(|| FarmSide::from_name(name).map(Spot::Farm))
    }
}

/// One tile's share of a structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub position: Position,
    pub spots: Vec<Spot>,
}

/// A connected region discovered from the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub kind: StructureKind,
    /// One node per tile, in discovery order
    pub nodes: Vec<Node>,
    pub complete: bool,
}

impl Structure {
    fn new(kind: StructureKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            complete: true,
        }
    }

    fn add(&mut self, position: Position, spot: Spot) {
        match self.nodes.iter_mut().find(|n| n.position == position) {
            Some(node) => node.spots.push(spot),
            None => self.nodes.push(Node {
                position,
                spots: vec![spot],
            }),
        }
    }

    /// Whether the structure covers `spot` of the tile at `position`
    pub fn contains(&self, position: Position, spot: Spot) -> bool {
        self.nodes
            .iter()
            .any(|n| n.position == position && n.spots.contains(&spot))
    }

    /// Number of distinct tiles the structure spans
    pub fn tile_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.nodes.iter().map(|n| n.position)
    }

    /// Smallest (position, spot) of the structure, identical for every walk
    /// of the same region
    pub fn key(&self) -> Option<(Position, Spot)> {
        self.nodes
            .iter()
            .flat_map(|n| n.spots.iter().map(move |s| (n.position, *s)))
            .min()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("no tile at {0}")]
    NoTile(Position),

    #[error("tile at {position} has no {kind:?} at {spot}")]
    NotOnTile {
        position: Position,
        kind: StructureKind,
        spot: Spot,
    },
}

impl Board {
    /// Resolve the structure of `kind` entered through `spot` of the tile at
    /// `position`
    pub fn generate(
        &self,
        kind: StructureKind,
        position: Position,
        spot: Spot,
    ) -> Result<Structure, StructureError> {
        let mismatch = StructureError::NotOnTile {
            position,
            kind,
            spot,
        };
        match (kind, spot) {
            (StructureKind::Road, Spot::Edge(side)) => self.generate_road(position, side),
            (StructureKind::City, Spot::Edge(side)) => self.generate_city(position, side),
            (StructureKind::Farm, Spot::Farm(farm_side)) => self.generate_farm(position, farm_side),
            (StructureKind::Cloister, Spot::Center) => self.generate_cloister(position),
            _ => Err(mismatch),
        }
    }

    pub fn generate_road(&self, position: Position, side: Side) -> Result<Structure, StructureError> {
        self.walk_edges(StructureKind::Road, EdgeKind::Road, position, side, Tile::road_group)
    }

    pub fn generate_city(&self, position: Position, side: Side) -> Result<Structure, StructureError> {
        self.walk_edges(StructureKind::City, EdgeKind::City, position, side, Tile::city_group)
    }

    /// Walk same-label edges across the board.
    ///
    /// The structure is complete when every edge it covers faces a placed
    /// tile.
    fn walk_edges(
        &self,
        kind: StructureKind,
        edge: EdgeKind,
        position: Position,
        side: Side,
        group: fn(&Tile, Side) -> Vec<Side>,
    ) -> Result<Structure, StructureError> {
        let start = self.tile(position).ok_or(StructureError::NoTile(position))?;
        if start.edge(side) != edge {
            return Err(StructureError::NotOnTile {
                position,
                kind,
                spot: Spot::Edge(side),
            });
        }

        let mut structure = Structure::new(kind);
        let mut seen: HashSet<(Position, Side)> = HashSet::new();
        let mut queue = VecDeque::from([(position, side)]);

        while let Some((at, entry)) = queue.pop_front() {
            if seen.contains(&(at, entry)) {
                continue;
            }
            let Some(tile) = self.tile(at) else {
                continue;
            };
            for s in group(tile, entry) {
                if !seen.insert((at, s)) {
                    continue;
                }
                structure.add(at, Spot::Edge(s));
                let next = at.neighbor(s);
                if self.is_occupied(next) {
                    queue.push_back((next, s.opposite()));
                } else {
                    structure.complete = false;
                }
            }
        }

        Ok(structure)
    }

    /// Walk the farm containing `farm_side` of the tile at `position`.
    ///
    /// Farms are never complete.
    pub fn generate_farm(
        &self,
        position: Position,
        farm_side: FarmSide,
    ) -> Result<Structure, StructureError> {
        let start = self.tile(position).ok_or(StructureError::NoTile(position))?;
        if start.farm_region(farm_side).is_none() {
            return Err(StructureError::NotOnTile {
                position,
                kind: StructureKind::Farm,
                spot: Spot::Farm(farm_side),
            });
        }

        let mut structure = Structure::new(StructureKind::Farm);
        structure.complete = false;
        let mut seen: HashSet<(Position, FarmSide)> = HashSet::new();
        let mut queue = VecDeque::from([(position, farm_side)]);

        while let Some((at, entry)) = queue.pop_front() {
            if seen.contains(&(at, entry)) {
                continue;
            }
            let Some(region) = self.tile(at).and_then(|t| t.farm_region(entry)) else {
                continue;
            };
            for notch in region {
                if !seen.insert((at, notch)) {
                    continue;
                }
                structure.add(at, Spot::Farm(notch));
                let next = at.neighbor(notch.side);
                if self.is_occupied(next) {
                    queue.push_back((next, notch.across()));
                }
            }
        }

        Ok(structure)
    }

    /// The cloister on the tile at `position`, complete once all eight
    /// surrounding cells are occupied
    pub fn generate_cloister(&self, position: Position) -> Result<Structure, StructureError> {
        let tile = self.tile(position).ok_or(StructureError::NoTile(position))?;
        if !tile.has_cloister() {
            return Err(StructureError::NotOnTile {
                position,
                kind: StructureKind::Cloister,
                spot: Spot::Center,
            });
        }
        let mut structure = Structure::new(StructureKind::Cloister);
        structure.add(position, Spot::Center);
        structure.complete = self.surrounding_count(position) == 8;
        Ok(structure)
    }

    /// Distinct cities bordering a farm
    pub fn cities_touching_farm(&self, farm: &Structure) -> Result<Vec<Structure>, StructureError> {
        let mut cities: Vec<Structure> = Vec::new();
        let mut keys = HashSet::new();

        for node in &farm.nodes {
            let tile = self.tile(node.position).ok_or(StructureError::NoTile(node.position))?;
            let region: Vec<FarmSide> = node
                .spots
                .iter()
                .filter_map(|spot| match spot {
                    Spot::Farm(farm_side) => Some(*farm_side),
                    _ => None,
                })
                .collect();
            for side in tile.cities_touching(&region) {
                if cities.iter().any(|c| c.contains(node.position, Spot::Edge(side))) {
                    continue;
                }
                let city = self.generate_city(node.position, side)?;
                if keys.insert(city.key()) {
                    cities.push(city);
                }
            }
        }

        Ok(cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{CenterKind, TileFace};
    use EdgeKind::{City as C, Farm as F, Road as R};

    fn tile(top: EdgeKind, right: EdgeKind, bottom: EdgeKind, left: EdgeKind) -> Tile {
        Tile::new(TileFace::new(top, right, bottom, left, CenterKind::Nil, false, false))
    }

    fn cloister() -> Tile {
        Tile::new(TileFace::new(F, F, F, F, CenterKind::Cloister, false, false))
    }

    #[test]
    fn test_road_through_start_is_open() {
        let board = Board::new();
        let road = board.generate_road(Position::ORIGIN, Side::Left).unwrap();
        assert_eq!(road.kind, StructureKind::Road);
        assert_eq!(road.tile_count(), 1);
        assert!(!road.complete);
        assert!(road.contains(Position::ORIGIN, Spot::Edge(Side::Right)));
    }

    #[test]
    fn test_road_between_junctions_is_complete() {
        let mut board = Board::new();
        board.place(tile(R, R, R, R), Position::new(1, 0)).unwrap();
        board.place(tile(R, R, F, R), Position::new(-1, 0)).unwrap();

        let road = board.generate_road(Position::new(-1, 0), Side::Right).unwrap();
        assert!(road.complete);
        assert_eq!(road.tile_count(), 3);
        assert_eq!(
            road.positions().collect::<Vec<_>>(),
            vec![Position::new(-1, 0), Position::ORIGIN, Position::new(1, 0)]
        );

        // Each crossroads arm is its own road
        let arm = board.generate_road(Position::new(1, 0), Side::Top).unwrap();
        assert_eq!(arm.tile_count(), 1);
        assert!(!arm.complete);
    }

    #[test]
    fn test_small_city_completes() {
        let mut board = Board::new();
        let cap = Position::new(0, 1);
        assert!(!board.generate_city(Position::ORIGIN, Side::Top).unwrap().complete);

        board.place(tile(F, F, C, F), cap).unwrap();
        let city = board.generate_city(Position::ORIGIN, Side::Top).unwrap();
        assert!(city.complete);
        assert_eq!(city.tile_count(), 2);
        assert_eq!(city.key(), board.generate_city(cap, Side::Bottom).unwrap().key());
    }

    #[test]
    fn test_wrong_edge_is_rejected() {
        let board = Board::new();
        assert_eq!(
            board.generate_city(Position::ORIGIN, Side::Bottom),
            Err(StructureError::NotOnTile {
                position: Position::ORIGIN,
                kind: StructureKind::City,
                spot: Spot::Edge(Side::Bottom),
            })
        );
        assert_eq!(
            board.generate_road(Position::new(3, 3), Side::Top),
            Err(StructureError::NoTile(Position::new(3, 3)))
        );
        assert!(board
            .generate(StructureKind::Road, Position::ORIGIN, Spot::Center)
            .is_err());
    }

    #[test]
    fn test_farm_crosses_road_tiles() {
        let mut board = Board::new();
        board.place(tile(R, R, R, R), Position::new(1, 0)).unwrap();

        let farm = board
            .generate_farm(Position::new(1, 0), FarmSide::LEFT_B)
            .unwrap();
        assert!(!farm.complete);
        assert!(farm.contains(Position::new(1, 0), Spot::Farm(FarmSide::TOP_A)));
        // Crosses into the start tile above its road
        assert!(farm.contains(Position::ORIGIN, Spot::Farm(FarmSide::RIGHT_A)));
        assert!(farm.contains(Position::ORIGIN, Spot::Farm(FarmSide::LEFT_B)));
        assert!(!farm.contains(Position::ORIGIN, Spot::Farm(FarmSide::BOTTOM_A)));
    }

    #[test]
    fn test_farm_rejects_city_notch() {
        let board = Board::new();
        assert!(board.generate_farm(Position::ORIGIN, FarmSide::TOP_A).is_err());
    }

    #[test]
    fn test_farm_touches_start_city() {
        let mut board = Board::new();
        board.place(tile(F, F, C, F), Position::new(0, 1)).unwrap();

        let upper = board.generate_farm(Position::ORIGIN, FarmSide::RIGHT_A).unwrap();
        let cities = board.cities_touching_farm(&upper).unwrap();
        assert_eq!(cities.len(), 1);
        assert!(cities[0].complete);

        let lower = board.generate_farm(Position::ORIGIN, FarmSide::BOTTOM_A).unwrap();
        assert!(board.cities_touching_farm(&lower).unwrap().is_empty());
    }

    #[test]
    fn test_cloister_completeness() {
        let mut board = Board::new();
        let at = Position::new(0, -1);
        board.place(cloister(), at).unwrap();
        let open = board.generate_cloister(at).unwrap();
        assert!(!open.complete);

        board.place(tile(F, R, F, F), Position::new(-1, 0)).unwrap();
        board.place(tile(F, F, F, R), Position::new(1, 0)).unwrap();
        for cell in [
            Position::new(-1, -1),
            Position::new(1, -1),
            Position::new(-1, -2),
            Position::new(0, -2),
            Position::new(1, -2),
        ] {
            board.place(tile(F, F, F, F), cell).unwrap();
        }
        assert!(board.generate_cloister(at).unwrap().complete);
        assert!(board.generate_cloister(Position::ORIGIN).is_err());
    }
}
