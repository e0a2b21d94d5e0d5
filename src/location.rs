use std::fmt::{Display, Formatter};
use std::ops::Add;

use strum::VariantArray;

pub(crate) type Coord = usize;
pub(crate) type Dimension = Coord;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A cell `(col, row)` on a board, 1-indexed. The top left cell is `Location(1, 1)`.
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// Index into a row-major `ndarray` layout.
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1 - 1, self.0 - 1)
    }

    /// The lattice point at the middle of this cell.
    pub fn center(&self) -> Point {
        Point(2 * self.0 as i64 - 1, 2 * self.1 as i64 - 1)
    }
}

impl From<(Coord, Coord)> for Location {
    /// Converts a zero-based `(row, col)` array index.
    fn from(value: (Coord, Coord)) -> Self {
        Self(value.1 + 1, value.0 + 1)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// A point `(x, y)` on the doubled lattice where rays travel and block edges sit.
///
/// `y` grows downward, so the top edge of a cell has the smaller `y`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
pub struct Point(pub i64, pub i64);

impl Point {
    pub(crate) fn offset_by(self, rhs: (i64, i64)) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1)
    }

    /// Parity of `x + y`. Every diagonal step keeps it, so a ray never reaches a point of the other parity.
    pub fn parity(&self) -> bool {
        (self.0 + self.1).rem_euclid(2) == 1
    }
}

impl Add<Direction> for Point {
    type Output = Point;

    fn add(self, rhs: Direction) -> Self::Output {
        self.offset_by(rhs.delta())
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// One of the four 45° headings a ray can have.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Direction {
    /// `(-1, -1)`
    UpLeft,
    /// `(+1, -1)`
    UpRight,
    /// `(-1, +1)`
    DownLeft,
    /// `(+1, +1)`
    DownRight,
}

impl Direction {
    /// Build a direction from `(dx, dy)`. Both components must be `-1` or `+1`.
    pub fn from_delta(dx: i64, dy: i64) -> Option<Self> {
        match (dx, dy) {
            (-1, -1) => Some(Self::UpLeft),
            (1, -1) => Some(Self::UpRight),
            (-1, 1) => Some(Self::DownLeft),
            (1, 1) => Some(Self::DownRight),
            _ => None,
        }
    }

    /// The `(dx, dy)` step of this direction.
    pub fn delta(&self) -> (i64, i64) {
        match self {
            Self::UpLeft => (-1, -1),
            Self::UpRight => (1, -1),
            Self::DownLeft => (-1, 1),
            Self::DownRight => (1, 1),
        }
    }

    /// Horizontal component, `-1` or `+1`.
    pub fn dx(&self) -> i64 {
        self.delta().0
    }

    /// Vertical component, `-1` (up) or `+1` (down).
    pub fn dy(&self) -> i64 {
        self.delta().1
    }

    /// Negate the horizontal component.
    pub fn flip_x(&self) -> Self {
        match self {
            Self::UpLeft => Self::UpRight,
            Self::UpRight => Self::UpLeft,
            Self::DownLeft => Self::DownRight,
            Self::DownRight => Self::DownLeft,
        }
    }

    /// Negate the vertical component.
    pub fn flip_y(&self) -> Self {
        match self {
            Self::UpLeft => Self::DownLeft,
            Self::UpRight => Self::DownRight,
            Self::DownLeft => Self::UpLeft,
            Self::DownRight => Self::UpRight,
        }
    }
}
