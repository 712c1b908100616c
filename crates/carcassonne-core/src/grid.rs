//! Square grid coordinates and tile sides.
//!
//! This module provides the foundational coordinate types for the board:
//! - `Position`: Identifies a cell of the sparse board
//! - `Side`: One of the four edges of a tile
//! - `FarmSide`: One of the eight farm notches around a tile
//!
//! `y` grows upwards, so the neighbor across the `Top` side of `(x, y)` is
//! `(x, y + 1)`.

use serde::{Deserialize, Serialize};

/// One of the four edges of a square tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides in clockwise order starting from the top
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Index into per-side arrays (clockwise from the top)
    pub const fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Left => 3,
        }
    }

    pub const fn from_index(index: usize) -> Side {
        Side::ALL[index % 4]
    }

    /// The side reached by turning a quarter clockwise
    pub const fn clockwise(self) -> Side {
        match self {
            Side::Top => Side::Right,
            Side::Right => Side::Bottom,
            Side::Bottom => Side::Left,
            Side::Left => Side::Top,
        }
    }

    /// The side reached by turning a quarter counter-clockwise
    pub const fn counter_clockwise(self) -> Side {
        match self {
            Side::Top => Side::Left,
            Side::Left => Side::Bottom,
            Side::Bottom => Side::Right,
            Side::Right => Side::Top,
        }
    }

    /// The side facing this one on the neighboring tile
    pub const fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Both farm notches of this side, in clockwise order
    pub const fn farm_sides(self) -> [FarmSide; 2] {
        [FarmSide::new(self, Half::A), FarmSide::new(self, Half::B)]
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Top => "Top",
            Side::Right => "Right",
            Side::Bottom => "Bottom",
            Side::Left => "Left",
        }
    }

    pub fn from_name(name: &str) -> Option<Side> {
        match name {
            "Top" => Some(Side::Top),
            "Right" => Some(Side::Right),
            "Bottom" => Some(Side::Bottom),
            "Left" => Some(Side::Left),
            _ => None,
        }
    }
}

/// Which half of a side a farm notch covers.
///
/// Walking clockwise around a tile, `A` is reached first: the left half of
/// the top, the upper half of the right, the right half of the bottom and
/// the lower half of the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Half {
    A,
    B,
}

impl Half {
    pub const fn other(self) -> Half {
        match self {
            Half::A => Half::B,
            Half::B => Half::A,
        }
    }
}

/// One of the eight farm notches around a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FarmSide {
    pub side: Side,
    pub half: Half,
}

impl FarmSide {
    pub const TOP_A: FarmSide = FarmSide::new(Side::Top, Half::A);
    pub const TOP_B: FarmSide = FarmSide::new(Side::Top, Half::B);
    pub const RIGHT_A: FarmSide = FarmSide::new(Side::Right, Half::A);
    pub const RIGHT_B: FarmSide = FarmSide::new(Side::Right, Half::B);
    pub const BOTTOM_A: FarmSide = FarmSide::new(Side::Bottom, Half::A);
    pub const BOTTOM_B: FarmSide = FarmSide::new(Side::Bottom, Half::B);
    pub const LEFT_A: FarmSide = FarmSide::new(Side::Left, Half::A);
    pub const LEFT_B: FarmSide = FarmSide::new(Side::Left, Half::B);

    /// All notches in clockwise order starting from the top-left corner
    pub const ALL: [FarmSide; 8] = [
        FarmSide::TOP_A,
        FarmSide::TOP_B,
        FarmSide::RIGHT_A,
        FarmSide::RIGHT_B,
        FarmSide::BOTTOM_A,
        FarmSide::BOTTOM_B,
        FarmSide::LEFT_A,
        FarmSide::LEFT_B,
    ];

    pub const fn new(side: Side, half: Half) -> Self {
        Self { side, half }
    }

    /// Position on the perimeter, 0..8 clockwise from the top-left corner
    pub const fn index(self) -> usize {
        self.side.index() * 2
            + match self.half {
                Half::A => 0,
                Half::B => 1,
            }
    }

    pub const fn from_index(index: usize) -> FarmSide {
        FarmSide::ALL[index % 8]
    }

    pub const fn clockwise(self) -> FarmSide {
        FarmSide::new(self.side.clockwise(), self.half)
    }

    pub const fn counter_clockwise(self) -> FarmSide {
        FarmSide::new(self.side.counter_clockwise(), self.half)
    }

    /// The notch touching this one on the neighboring tile.
    ///
    /// The clockwise order flips across a shared edge, so `A` meets `B`.
    pub const fn across(self) -> FarmSide {
        FarmSide::new(self.side.opposite(), self.half.other())
    }

    /// The two notches next to this one on the same tile's perimeter
    pub const fn perimeter_neighbors(self) -> [FarmSide; 2] {
        [
            FarmSide::from_index(self.index() + 7),
            FarmSide::from_index(self.index() + 1),
        ]
    }

    pub fn name(self) -> &'static str {
        match (self.side, self.half) {
            (Side::Top, Half::A) => "TopA",
            (Side::Top, Half::B) => "TopB",
            (Side::Right, Half::A) => "RightA",
            (Side::Right, Half::B) => "RightB",
            (Side::Bottom, Half::A) => "BottomA",
            (Side::Bottom, Half::B) => "BottomB",
            (Side::Left, Half::A) => "LeftA",
            (Side::Left, Half::B) => "LeftB",
        }
    }

    pub fn from_name(name: &str) -> Option<FarmSide> {
        match name {
            "TopA" => Some(FarmSide::TOP_A),
            "TopB" => Some(FarmSide::TOP_B),
            "RightA" => Some(FarmSide::RIGHT_A),
            "RightB" => Some(FarmSide::RIGHT_B),
            "BottomA" => Some(FarmSide::BOTTOM_A),
            "BottomB" => Some(FarmSide::BOTTOM_B),
            "LeftA" => Some(FarmSide::LEFT_A),
            "LeftB" => Some(FarmSide::LEFT_B),
            _ => None,
        }
    }
}

/// Integer board coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get the neighbor across a specific side
    pub const fn neighbor(&self, side: Side) -> Position {
        match side {
            Side::Top => Position::new(self.x, self.y + 1),
            Side::Right => Position::new(self.x + 1, self.y),
            Side::Bottom => Position::new(self.x, self.y - 1),
            Side::Left => Position::new(self.x - 1, self.y),
        }
    }

    /// The four edge neighbors, indexed like `Side::ALL`
    pub fn neighbors(&self) -> [Position; 4] {
        Side::ALL.map(|side| self.neighbor(side))
    }

    /// The eight cells around this one (edge and corner neighbors)
    pub fn surrounding(&self) -> [Position; 8] {
        let (x, y) = (self.x, self.y);
        [
            Position::new(x - 1, y + 1),
            Position::new(x, y + 1),
            Position::new(x + 1, y + 1),
            Position::new(x + 1, y),
            Position::new(x + 1, y - 1),
            Position::new(x, y - 1),
            Position::new(x - 1, y - 1),
            Position::new(x - 1, y),
        ]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
