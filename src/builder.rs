//! Step by step construction of [`Board`]s.

use std::collections::HashMap;
use std::ops::IndexMut;

use ndarray::{Array2, AssignElem};

use crate::block::Variant;
use crate::board::{within_lattice, Board};
use crate::cell::Cell;
use crate::location::{Dimension, Direction, Location, Point};
use crate::ray::Ray;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A cell was set outside the bounds specified by `dims`.
    CellOutOfBounds,
    /// A laser starts off the lattice.
    LaserOutOfBounds,
    /// A sink lies off the lattice, so it could never be hit.
    SinkOutOfBounds,
    /// The board has no cells at all.
    EmptyGrid,
    /// More movable blocks were requested than there are open cells to put them in.
    TooManyMovableBlocks,
    /// No laser was added.
    NoLasers,
    /// No sink was added.
    NoSinks,
}

/// A builder for [`Board`]s.
///
/// Every cell starts [`Open`](Cell::Open).
/// The builder mutates itself while building but can be [`Clone`]d to save its state at some point.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    // width, height
    dims: (Dimension, Dimension),
    cells: Array2<Cell>,
    movable: HashMap<Variant, usize>,
    lasers: Vec<Ray>,
    sinks: Vec<Point>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::with_dims((3, 3))
    }
}

impl BoardBuilder {
    /// Construct a new [`Self`] with the specified dimensions in cells, specified in `(width, height)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::from_shape_simple_fn((dims.1, dims.0), Cell::default),

            movable: Default::default(),
            lasers: Default::default(),
            sinks: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    /// Overwrite the cell at `location`.
    ///
    /// May cause the builder to enter a [`CellOutOfBounds`](BuilderInvalidReason::CellOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn set_cell(&mut self, location: Location, cell: Cell) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !(1..=self.dims.0).contains(&location.0) || !(1..=self.dims.1).contains(&location.1) {
            self.invalid_reasons.push(BuilderInvalidReason::CellOutOfBounds);
            return self;
        }

        self.cells.index_mut(location.as_index()).assign_elem(cell);
        self
    }

    /// Shorthand for [`Self::set_cell`] with a [`Fixed`](Cell::Fixed) block.
    pub fn add_fixed(&mut self, location: Location, variant: Variant) -> &mut Self {
        self.set_cell(location, Cell::Fixed(variant))
    }

    /// Shorthand for [`Self::set_cell`] with [`Blocked`](Cell::Blocked).
    pub fn block_cell(&mut self, location: Location) -> &mut Self {
        self.set_cell(location, Cell::Blocked)
    }

    /// Add `count` movable blocks of `variant` to be placed by the solver.
    pub fn add_movable(&mut self, variant: Variant, count: usize) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        *self.movable.entry(variant).or_default() += count;
        self
    }

    /// Add a laser starting at `position`.
    ///
    /// May cause the builder to enter a [`LaserOutOfBounds`](BuilderInvalidReason::LaserOutOfBounds) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_laser(&mut self, position: Point, direction: Direction) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !within_lattice(self.dims, position) {
            self.invalid_reasons.push(BuilderInvalidReason::LaserOutOfBounds);
            return self;
        }

        self.lasers.push(Ray::new(position, direction));
        self
    }

    /// Add a sink at `point`.
    ///
    /// May cause the builder to enter a [`SinkOutOfBounds`](BuilderInvalidReason::SinkOutOfBounds) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_sink(&mut self, point: Point) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !within_lattice(self.dims, point) {
            self.invalid_reasons.push(BuilderInvalidReason::SinkOutOfBounds);
            return self;
        }

        self.sinks.push(point);
        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen so far.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    /// Conditions on the board as a whole are only checked by [`Self::build`].
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&mut self) -> Result<Board, &Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            if self.cells.is_empty() {
                self.invalid_reasons.push(BuilderInvalidReason::EmptyGrid);
            }
            if self.lasers.is_empty() {
                self.invalid_reasons.push(BuilderInvalidReason::NoLasers);
            }
            if self.sinks.is_empty() {
                self.invalid_reasons.push(BuilderInvalidReason::NoSinks);
            }

            let open = self.cells.iter().filter(|cell| **cell == Cell::Open).count();
            if self.movable.values().sum::<usize>() > open {
                self.invalid_reasons.push(BuilderInvalidReason::TooManyMovableBlocks);
            }
        }

        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        Ok(Board {
            layout: self.cells.clone(),
            dims: self.dims,
            movable: self.movable.clone(),
            lasers: self.lasers.clone(),
            sinks: self.sinks.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardBuilder, BuilderInvalidReason};
    use crate::block::{Block, Variant};
    use crate::cell::Cell;
    use crate::location::{Direction, Location, Point};

    #[test]
    fn builds_layout() {
        let board = BoardBuilder::with_dims((3, 2))
            .add_fixed(Location(2, 1), Variant::Opaque)
            .block_cell(Location(3, 2))
            .add_movable(Variant::Reflect, 2)
            .add_movable(Variant::Refract, 1)
            .add_movable(Variant::Reflect, 1)
            .add_laser(Point(0, 1), Direction::DownRight)
            .add_sink(Point(6, 3))
            .build()
            .unwrap();

        assert_eq!(format!("{}", board), "oBo
oox
");
        assert_eq!(board.dims(), (3, 2));
        assert_eq!(board.cell(Location(2, 1)), Some(Cell::Fixed(Variant::Opaque)));
        assert_eq!(board.cell(Location(4, 1)), None);
        assert_eq!(board.cell(Location(0, 1)), None);
        assert_eq!(board.open_cells(), vec![Location(1, 1), Location(3, 1), Location(1, 2), Location(2, 2)]);
        assert_eq!(board.fixed_blocks(), vec![Block::new(Variant::Opaque, Location(2, 1))]);
        assert_eq!(board.movable_kinds(), vec![Variant::Refract, Variant::Reflect, Variant::Reflect, Variant::Reflect]);
        assert!(board.within_bounds(Point(6, 4)));
        assert!(!board.within_bounds(Point(7, 4)));
        assert!(!board.within_bounds(Point(0, -1)));
    }

    #[test]
    fn out_of_bounds_features() {
        let mut builder = BoardBuilder::with_dims((2, 2));
        builder.add_fixed(Location(3, 1), Variant::Reflect);
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::CellOutOfBounds]));

        // further changes are ignored once invalid
        builder.add_sink(Point(9, 9));
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::CellOutOfBounds]);

        let mut builder = BoardBuilder::with_dims((2, 2));
        builder.add_laser(Point(-1, 0), Direction::UpLeft);
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::LaserOutOfBounds]));

        let mut builder = BoardBuilder::with_dims((2, 2));
        builder.add_sink(Point(5, 0));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::SinkOutOfBounds]));
    }

    #[test]
    fn builder_and_board_agree_on_bounds() {
        let board = BoardBuilder::with_dims((3, 2))
            .add_laser(Point(0, 0), Direction::DownRight)
            .add_sink(Point(6, 4))
            .build()
            .unwrap();

        for x in -1..=7 {
            for y in -1..=5 {
                let mut builder = BoardBuilder::with_dims((3, 2));
                builder.add_laser(Point(x, y), Direction::UpLeft).add_sink(Point(x, y));
                assert_eq!(builder.is_valid().is_none(), board.within_bounds(Point(x, y)), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn whole_board_checks() {
        let mut builder = BoardBuilder::with_dims((1, 1));
        builder.add_movable(Variant::Opaque, 2);
        assert_eq!(builder.is_valid(), None);
        assert_eq!(builder.build().unwrap_err(), &vec![
            BuilderInvalidReason::NoLasers,
            BuilderInvalidReason::NoSinks,
            BuilderInvalidReason::TooManyMovableBlocks,
        ]);
    }
}
