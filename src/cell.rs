use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::block::Variant;

/// One cell of a board layout, as written in the grid of a `.bff` file.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Cell {
    /// `o`: a movable block may be placed here.
    #[default]
    Open,
    /// `x`: nothing may be placed here.
    Blocked,
    /// `A`, `B`, `C`: a block that is part of the puzzle and never moves.
    Fixed(Variant),
}

impl Cell {
    /// Parse a single grid code. Returns `None` for anything unrecognised.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "o" => Some(Self::Open),
            "x" => Some(Self::Blocked),
            other => Variant::from_str(other).ok().map(Self::Fixed),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "o"),
            Self::Blocked => write!(f, "x"),
            Self::Fixed(variant) => write!(f, "{}", variant),
        }
    }
}
