use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use ndarray::Array2;

use crate::block::{Block, Variant};
use crate::cell::Cell;
use crate::location::{Dimension, Location, Point};
use crate::placement::Enumerator;
use crate::ray::Ray;
use crate::solver::{Outcome, Solver, SolverConfig};

/// The order movable kinds are laid out in a [`Placement`](crate::Placement): position `i` of a placement holds kind `i`.
pub(crate) const MOVABLE_ORDER: [Variant; 3] = [Variant::Refract, Variant::Reflect, Variant::Opaque];

/// A puzzle: the grid, the blocks to place, the lasers and the sinks they must reach.
///
/// [`Board`]s should be built using a [`BoardBuilder`](crate::builder::BoardBuilder) or read from a `.bff` file with [`bff::parse`](crate::bff::parse).
/// They are never modified while searching.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) layout: Array2<Cell>,
    // width, height in cells
    pub(crate) dims: (Dimension, Dimension),
    pub(crate) movable: HashMap<Variant, usize>,
    pub(crate) lasers: Vec<Ray>,
    pub(crate) sinks: Vec<Point>,
}

impl Board {
    /// `(width, height)` in cells.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// The cell at `location`, or `None` off the grid.
    pub fn cell(&self, location: Location) -> Option<Cell> {
        if location.0 == 0 || location.1 == 0 {
            return None;
        }
        self.layout.get(location.as_index()).copied()
    }

    /// Whether `point` lies on the lattice: `0 <= x <= 2 * width` and `0 <= y <= 2 * height`.
    pub fn within_bounds(&self, point: Point) -> bool {
        within_lattice(self.dims, point)
    }

    /// Where each laser starts and which way it points.
    pub fn lasers(&self) -> &[Ray] {
        &self.lasers
    }

    /// Points that must all be lit.
    pub fn sinks(&self) -> &[Point] {
        &self.sinks
    }

    /// How many movable blocks of `variant` must be placed.
    pub fn movable_count(&self, variant: Variant) -> usize {
        self.movable.get(&variant).copied().unwrap_or(0)
    }

    /// Every movable block, one entry per block: all refractors, then reflectors, then opaque blocks.
    pub fn movable_kinds(&self) -> Vec<Variant> {
        MOVABLE_ORDER.iter()
            .flat_map(|variant| std::iter::repeat(*variant).take(self.movable_count(*variant)))
            .collect()
    }

    /// Cells a movable block can go in, row by row.
    pub fn open_cells(&self) -> Vec<Location> {
        self.layout.indexed_iter()
            .filter(|(_, cell)| **cell == Cell::Open)
            .map(|(index, _)| Location::from(index))
            .collect()
    }

    /// Blocks that are part of the layout itself.
    pub fn fixed_blocks(&self) -> Vec<Block> {
        self.layout.indexed_iter()
            .filter_map(|(index, cell)| match cell {
                Cell::Fixed(variant) => Some(Block::new(*variant, Location::from(index))),
                _ => None,
            })
            .collect()
    }

    /// The candidate placements for this board, in order.
    pub fn enumerator(&self) -> Enumerator {
        Enumerator::new(self.open_cells(), self.movable_kinds())
    }

    /// Search for a placement that lights every sink, deferring to a [`Solver`].
    pub fn solve(&self, config: SolverConfig) -> Outcome {
        Solver::new(self, config).run()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", print(&self.layout.map(|cell| cell.to_string())))
    }
}

pub(crate) fn within_lattice(dims: (Dimension, Dimension), point: Point) -> bool {
    (0..=2 * dims.0 as i64).contains(&point.0) && (0..=2 * dims.1 as i64).contains(&point.1)
}

/// Lay out a grid of codes one row per line.
pub(crate) fn print(grid: &Array2<String>) -> String {
    let mut out = String::with_capacity(grid.nrows() * (grid.ncols() + 1));

    for row in grid.rows() {
        for col in row {
            out.push_str(col);
        }
        out.push('\n');
    }

    out
}
