#![warn(missing_docs)]

//! # `lazor`
//!
//! A solver for Lazor puzzles: place a fixed set of reflecting, refracting and opaque blocks in the open cells of a grid
//! so that the lasers, bouncing and splitting through every block, light all of the target points ("sinks").
//! Begin by building a board with a [`BoardBuilder`] or reading one with [`bff::read`],
//! then call [`solve()`](crate::Board::solve) with a [`SolverConfig`] to get an [`Outcome`].
//!
//! # Internals
//! Rays live on a doubled lattice: cell `(col, row)` is centered on `(2·col − 1, 2·row − 1)` and a block's four edge
//! centers are one step away from its center. Rays always travel diagonally, one lattice step at a time, and interact
//! with a block only when they sit on one of its edge centers while heading into it.
//!
//! A high level overview is as follows:
//!
//! 1. Enumerate every ordered choice of open cells for the movable blocks (see [`Enumerator`]).
//! 2. For each choice, index the edge centers of the fixed and movable blocks, then trace every laser.
//! A refracting block splits a ray in two; the new ray is queued and traced after the current one ends.
//! A ray stops when it leaves the lattice, enters an opaque block, lands on an edge shared by two blocks,
//! or is caught by the [`LoopGuard`].
//! 3. Stop at the first choice whose rays pass through every sink.
//!
//! Choices are independent of one another, so [`Solver`] can spread them over a rayon pool
//! while still returning the first solution in enumeration order.

pub use block::{Block, Edge, Interaction, Variant};
pub use board::Board;
pub use builder::{BoardBuilder, BuilderInvalidReason};
pub use cell::Cell;
pub use location::{Direction, Location, Point};
pub use placement::{Enumerator, Placement};
pub use ray::{BlockSet, LoopGuard, Ray, Termination, Tracer};
pub use sink::SinkTracker;
pub use solver::{Evaluation, Outcome, Solution, Solver, SolverConfig};

pub mod bff;
pub(crate) mod block;
pub(crate) mod board;
pub mod builder;
pub(crate) mod cell;
pub(crate) mod location;
pub(crate) mod placement;
pub(crate) mod ray;
pub(crate) mod sink;
pub(crate) mod solver;
