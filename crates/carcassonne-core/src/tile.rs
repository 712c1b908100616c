//! Tiles, their faces and the per-tile topology the structure resolver walks.
//!
//! This module contains:
//! - Edge and center labels
//! - `TileFace`, the printed picture of a tile in its current orientation
//! - `Tile`, a face plus board position and claim coloring
//! - The standard tile supply and the start tile

use crate::grid::{FarmSide, Position, Side};
use crate::team::TeamId;
use serde::{Deserialize, Serialize};

/// Label printed on one edge of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EdgeKind {
    Road,
    Farm,
    City,
    #[default]
    Nil,
}

/// Label printed in the middle of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CenterKind {
    #[default]
    Nil,
    Cloister,
}

/// The picture on a tile in its current orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileFace {
    /// Edges indexed clockwise from the top
    pub edges: [EdgeKind; 4],
    pub center: CenterKind,
    /// All city edges of the tile belong to one city fragment
    pub connected_city_sides: bool,
    /// City tile worth bonus points
    pub banner: bool,
}

impl TileFace {
    pub const fn new(
        top: EdgeKind,
        right: EdgeKind,
        bottom: EdgeKind,
        left: EdgeKind,
        center: CenterKind,
        connected_city_sides: bool,
        banner: bool,
    ) -> Self {
        Self {
            edges: [top, right, bottom, left],
            center,
            connected_city_sides,
            banner,
        }
    }

    pub const fn edge(&self, side: Side) -> EdgeKind {
        self.edges[side.index()]
    }

    /// The face turned a quarter clockwise
    pub fn rotated_right(&self) -> Self {
        let mut edges = self.edges;
        for side in Side::ALL {
            edges[side.clockwise().index()] = self.edge(side);
        }
        Self { edges, ..*self }
    }

    /// The face turned a quarter counter-clockwise
    pub fn rotated_left(&self) -> Self {
        let mut edges = self.edges;
        for side in Side::ALL {
            edges[side.counter_clockwise().index()] = self.edge(side);
        }
        Self { edges, ..*self }
    }
}

/// Teams colored onto a tile once a touching structure has been scored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Indexed like `Side::ALL`
    pub sides: [Vec<TeamId>; 4],
    /// Indexed like `FarmSide::ALL`
    pub farms: [Vec<TeamId>; 8],
    pub center: Option<TeamId>,
}

impl Claims {
    pub fn is_empty(&self) -> bool {
        self.sides.iter().all(Vec::is_empty)
            && self.farms.iter().all(Vec::is_empty)
            && self.center.is_none()
    }

    fn rotated(&self, turn: impl Fn(Side) -> Side) -> Self {
        let mut rotated = Claims {
            center: self.center.clone(),
            ..Claims::default()
        };
        for side in Side::ALL {
            rotated.sides[turn(side).index()] = self.sides[side.index()].clone();
        }
        for farm_side in FarmSide::ALL {
            let target = FarmSide::new(turn(farm_side.side), farm_side.half);
            rotated.farms[target.index()] = self.farms[farm_side.index()].clone();
        }
        rotated
    }
}

/// A physical tile: a face, where it lies (once placed) and its coloring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    position: Option<Position>,
    face: TileFace,
    claims: Claims,
}

impl Tile {
    /// Create an unplaced tile
    pub fn new(face: TileFace) -> Self {
        Self {
            position: None,
            face,
            claims: Claims::default(),
        }
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = Some(position);
    }

    pub fn face(&self) -> &TileFace {
        &self.face
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub(crate) fn claims_mut(&mut self) -> &mut Claims {
        &mut self.claims
    }

    pub fn edge(&self, side: Side) -> EdgeKind {
        self.face.edge(side)
    }

    pub fn center(&self) -> CenterKind {
        self.face.center
    }

    pub fn has_cloister(&self) -> bool {
        self.face.center == CenterKind::Cloister
    }

    pub fn banner(&self) -> bool {
        self.face.banner
    }

    pub fn connected_city_sides(&self) -> bool {
        self.face.connected_city_sides
    }

    /// Whether two tiles show the same picture in the same orientation
    pub fn same_face(&self, other: &Tile) -> bool {
        self.face == other.face
    }

    pub fn rotate_right(&mut self) {
        self.face = self.face.rotated_right();
        self.claims = self.claims.rotated(Side::clockwise);
    }

    pub fn rotate_left(&mut self) {
        self.face = self.face.rotated_left();
        self.claims = self.claims.rotated(Side::counter_clockwise);
    }

    /// Sides carrying the given edge label, clockwise from the top
    pub fn sides_of(&self, kind: EdgeKind) -> Vec<Side> {
        Side::ALL
            .into_iter()
            .filter(|side| self.edge(*side) == kind)
            .collect()
    }

    /// Whether the notch lies on farmland (farm edges and both halves of a road edge)
    pub fn has_farm(&self, farm_side: FarmSide) -> bool {
        matches!(self.edge(farm_side.side), EdgeKind::Farm | EdgeKind::Road)
    }

    /// Road sides joined to `side` on this tile.
    ///
    /// A road runs straight through a tile with exactly two road edges; with
    /// one, three or four road edges every road ends on the tile.
    pub fn road_group(&self, side: Side) -> Vec<Side> {
        let roads = self.sides_of(EdgeKind::Road);
        if roads.len() == 2 && roads.contains(&side) {
            roads
        } else {
            vec![side]
        }
    }

    /// City sides joined to `side` on this tile
    pub fn city_group(&self, side: Side) -> Vec<Side> {
        if self.face.connected_city_sides {
            self.sides_of(EdgeKind::City)
        } else {
            vec![side]
        }
    }

    /// Interior features that cut the farmland, as attachment points on the
    /// perimeter.
    ///
    /// The perimeter is measured in 16 steps clockwise from the top-left
    /// corner: notch `i` sits at `2i + 1` and the middle of side `s` at
    /// `4s + 2`. A feature with fewer than two attachments cuts nothing.
    fn interior_features(&self) -> Vec<Vec<usize>> {
        let midpoint = |side: &Side| 4 * side.index() + 2;
        let roads = self.sides_of(EdgeKind::Road);
        let mut features = Vec::new();

        let mut city: Vec<usize> = if self.face.connected_city_sides {
            self.sides_of(EdgeKind::City).iter().map(midpoint).collect()
        } else {
            Vec::new()
        };

        match roads.len() {
            0 => {}
            // A lone road ends at a cloister or runs into the city wall
            1 => {
                if !self.has_cloister() && !city.is_empty() {
                    city.push(midpoint(&roads[0]));
                }
            }
            _ => features.push(roads.iter().map(midpoint).collect()),
        }

        if city.len() >= 2 {
            city.sort_unstable();
            features.push(city);
        }
        features
    }

    /// Connected farm fragments of this tile.
    ///
    /// Two notches share a region when no interior feature separates them.
    /// Two disconnected city caps do not cut the tile, so the farm between
    /// them stays in one piece.
    pub fn farm_regions(&self) -> Vec<Vec<FarmSide>> {
        let features = self.interior_features();
        let mut regions: Vec<(Vec<usize>, Vec<FarmSide>)> = Vec::new();

        for farm_side in FarmSide::ALL {
            if !self.has_farm(farm_side) {
                continue;
            }
            let at = 2 * farm_side.index() + 1;
            let key: Vec<usize> = features
                .iter()
                .map(|points| points.iter().filter(|p| **p < at).count() % points.len())
                .collect();
            match regions.iter_mut().find(|(k, _)| *k == key) {
                Some((_, sides)) => sides.push(farm_side),
                None => regions.push((key, vec![farm_side])),
            }
        }

        regions.into_iter().map(|(_, sides)| sides).collect()
    }

    /// The farm fragment containing `farm_side`, if it lies on farmland
    pub fn farm_region(&self, farm_side: FarmSide) -> Option<Vec<FarmSide>> {
        self.farm_regions()
            .into_iter()
            .find(|region| region.contains(&farm_side))
    }

    /// City sides bordering a farm fragment of this tile
    pub fn cities_touching(&self, region: &[FarmSide]) -> Vec<Side> {
        let mut sides = Vec::new();
        for farm_side in region {
            for neighbor in farm_side.perimeter_neighbors() {
                if self.edge(neighbor.side) == EdgeKind::City && !sides.contains(&neighbor.side) {
                    sides.push(neighbor.side);
                }
            }
        }
        sides.sort();
        sides
    }
}

impl From<TileFace> for Tile {
    fn from(face: TileFace) -> Self {
        Tile::new(face)
    }
}

use CenterKind::{Cloister as M, Nil as N};
use EdgeKind::{City as C, Farm as F, Road as R};

/// The tile at 0,0 at the start of the game
pub const START_TILE: TileFace = TileFace::new(C, R, F, R, N, false, false);

/// The drawable supply: each face with the number of copies in the deck
pub const STANDARD_TILES: [(TileFace, usize); 24] = [
    (TileFace::new(F, F, F, F, M, false, false), 4),
    (TileFace::new(F, F, R, F, M, false, false), 2),
    (TileFace::new(C, C, C, C, N, true, true), 1),
    (TileFace::new(C, C, F, C, N, true, false), 3),
    (TileFace::new(C, C, F, C, N, true, true), 1),
    (TileFace::new(C, C, R, C, N, true, false), 1),
    (TileFace::new(C, C, R, C, N, true, true), 2),
    (TileFace::new(C, F, F, C, N, true, false), 3),
    (TileFace::new(C, F, F, C, N, true, true), 2),
    (TileFace::new(C, R, R, C, N, true, false), 3),
    (TileFace::new(C, R, R, C, N, true, true), 2),
    (TileFace::new(F, C, F, C, N, true, false), 1),
    (TileFace::new(F, C, F, C, N, true, true), 2),
    (TileFace::new(C, F, F, C, N, false, false), 2),
    (TileFace::new(C, F, C, F, N, false, false), 3),
    (TileFace::new(C, F, F, F, N, false, false), 5),
    (TileFace::new(C, F, R, R, N, false, false), 3),
    (TileFace::new(C, R, R, F, N, false, false), 3),
    (TileFace::new(C, R, R, R, N, false, false), 3),
    (TileFace::new(C, R, F, R, N, false, false), 3),
    (TileFace::new(R, F, R, F, N, false, false), 8),
    (TileFace::new(F, F, R, R, N, false, false), 9),
    (TileFace::new(F, R, R, R, N, false, false), 4),
    (TileFace::new(R, R, R, R, N, false, false), 1),
];

/// Number of tiles in a standard game, the start tile included
pub fn standard_tile_count() -> usize {
    STANDARD_TILES.iter().map(|(_, count)| count).sum::<usize>() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(
        top: EdgeKind,
        right: EdgeKind,
        bottom: EdgeKind,
        left: EdgeKind,
        center: CenterKind,
        connected: bool,
    ) -> Tile {
        Tile::new(TileFace::new(top, right, bottom, left, center, connected, false))
    }

    fn sorted(mut regions: Vec<Vec<FarmSide>>) -> Vec<Vec<FarmSide>> {
        for region in &mut regions {
            region.sort();
        }
        regions.sort();
        regions
    }

    #[test]
    fn test_standard_supply_has_72_tiles() {
        assert_eq!(standard_tile_count(), 72);
    }

    #[test]
    fn test_rotate_right_moves_top_to_right() {
        let mut t = Tile::new(START_TILE);
        t.rotate_right();
        assert_eq!(t.edge(Side::Right), EdgeKind::City);
        assert_eq!(t.edge(Side::Bottom), EdgeKind::Road);
        assert_eq!(t.edge(Side::Left), EdgeKind::Farm);
        assert_eq!(t.edge(Side::Top), EdgeKind::Road);
    }

    #[test]
    fn test_rotations_are_inverse() {
        for (face, _) in STANDARD_TILES {
            let mut t = Tile::new(face);
            t.rotate_right();
            t.rotate_left();
            assert_eq!(*t.face(), face);

            let mut spun = Tile::new(face);
            for _ in 0..4 {
                spun.rotate_left();
            }
            assert_eq!(*spun.face(), face);
        }
    }

    #[test]
    fn test_same_face_depends_on_rotation() {
        let a = Tile::new(START_TILE);
        let mut b = Tile::new(START_TILE);
        assert!(a.same_face(&b));

        b.rotate_right();
        assert!(!a.same_face(&b));
        b.rotate_right();
        b.rotate_right();
        b.rotate_right();
        assert!(a.same_face(&b));

        // Position and claims are not part of the picture
        let mut placed = Tile::new(START_TILE);
        placed.set_position(Position::new(3, -2));
        assert!(a.same_face(&placed));
    }

    #[test]
    fn test_rotation_carries_farm_claims() {
        let mut t = Tile::new(START_TILE);
        t.claims_mut().farms[FarmSide::LEFT_B.index()] = vec!["red".to_string()];
        t.rotate_right();
        assert_eq!(t.claims().farms[FarmSide::TOP_B.index()], vec!["red".to_string()]);
        assert!(t.claims().farms[FarmSide::LEFT_B.index()].is_empty());
    }

    #[test]
    fn test_road_groups() {
        let straight = tile(R, F, R, F, N, false);
        assert_eq!(straight.road_group(Side::Top), vec![Side::Top, Side::Bottom]);

        let junction = tile(F, R, R, R, N, false);
        assert_eq!(junction.road_group(Side::Right), vec![Side::Right]);

        let cloister = tile(F, F, R, F, M, false);
        assert_eq!(cloister.road_group(Side::Bottom), vec![Side::Bottom]);
    }

    #[test]
    fn test_city_groups_follow_connection_flag() {
        let band = tile(C, F, C, F, N, true);
        assert_eq!(band.city_group(Side::Top), vec![Side::Top, Side::Bottom]);

        let caps = tile(C, F, C, F, N, false);
        assert_eq!(caps.city_group(Side::Top), vec![Side::Top]);
    }

    #[test]
    fn test_start_tile_farm_splits_along_road() {
        let start = Tile::new(START_TILE);
        assert_eq!(
            sorted(start.farm_regions()),
            vec![
                vec![FarmSide::RIGHT_A, FarmSide::LEFT_B],
                vec![
                    FarmSide::RIGHT_B,
                    FarmSide::BOTTOM_A,
                    FarmSide::BOTTOM_B,
                    FarmSide::LEFT_A
                ],
            ]
        );
        assert_eq!(
            start.cities_touching(&[FarmSide::RIGHT_A, FarmSide::LEFT_B]),
            vec![Side::Top]
        );
        assert!(start
            .cities_touching(&[FarmSide::RIGHT_B, FarmSide::BOTTOM_A])
            .is_empty());
    }

    #[test]
    fn test_crossroads_has_four_farms() {
        let crossroads = tile(R, R, R, R, N, false);
        let regions = crossroads.farm_regions();
        assert_eq!(regions.len(), 4);
        assert_eq!(
            crossroads.farm_region(FarmSide::LEFT_B),
            Some(vec![FarmSide::TOP_A, FarmSide::LEFT_B])
        );
    }

    #[test]
    fn test_disconnected_cities_share_one_farm() {
        let caps = tile(C, F, C, F, N, false);
        let regions = caps.farm_regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(caps.cities_touching(&regions[0]), vec![Side::Top, Side::Bottom]);

        let band = tile(C, F, C, F, N, true);
        assert_eq!(band.farm_regions().len(), 2);
    }

    #[test]
    fn test_curved_road_beside_diagonal_city() {
        let t = tile(C, R, R, C, N, true);
        assert_eq!(
            sorted(t.farm_regions()),
            vec![
                vec![FarmSide::RIGHT_A, FarmSide::BOTTOM_B],
                vec![FarmSide::RIGHT_B, FarmSide::BOTTOM_A],
            ]
        );
    }

    #[test]
    fn test_road_into_city_splits_farm() {
        let gate = tile(C, C, R, C, N, true);
        assert_eq!(
            sorted(gate.farm_regions()),
            vec![vec![FarmSide::BOTTOM_A], vec![FarmSide::BOTTOM_B]]
        );

        let cloister = tile(F, F, R, F, M, false);
        assert_eq!(cloister.farm_regions().len(), 1);
    }

    #[test]
    fn test_city_only_tile_has_no_farm() {
        let full = tile(C, C, C, C, N, true);
        assert!(full.farm_regions().is_empty());
        assert_eq!(full.farm_region(FarmSide::TOP_A), None);
    }
}
