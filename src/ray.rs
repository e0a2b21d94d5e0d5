use std::collections::{HashMap, HashSet, VecDeque};

use log::trace;

use crate::block::{Block, Edge, Interaction, Variant};
use crate::board::Board;
use crate::location::{Direction, Point};
use crate::sink::SinkTracker;

/// A ray of light: where it is and which way it is heading.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Ray {
    /// Current lattice point.
    pub position: Point,
    /// Heading; the next step moves by its `(dx, dy)`.
    pub direction: Direction,
}

impl Ray {
    /// A ray at `position` heading in `direction`.
    pub fn new(position: Point, direction: Direction) -> Self {
        Self { position, direction }
    }

    fn advance(&mut self) {
        self.position = self.position + self.direction;
    }
}

/// Why a ray stopped travelling.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Termination {
    /// The ray left the lattice.
    OutOfBounds,
    /// The ray entered an opaque block.
    Absorbed,
    /// The ray sat on edge centers of two or more blocks at once.
    /// Which block should act is not resolved; the ray simply stops.
    AmbiguousCollision,
    /// The ray took as many steps as [`LoopGuard::StepLimit`] allows.
    StepLimit,
    /// The ray returned to a position and direction it already had, see [`LoopGuard::CycleDetection`].
    Looped,
    /// Every sink is now hit, so nothing more needs simulating for this placement.
    AllSinksHit,
}

/// How a ray trapped between blocks is stopped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LoopGuard {
    /// Stop every ray after this many steps, looping or not.
    StepLimit(usize),
    /// Remember each `(position, direction)` a ray has had and stop on the first repeat.
    /// Rays are bounded by the finite lattice, so this always terminates.
    CycleDetection,
}

impl Default for LoopGuard {
    fn default() -> Self {
        Self::StepLimit(50)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum EdgeHit {
    One { edge: Edge, variant: Variant },
    Many,
}

/// Every edge center of a full set of blocks, fixed and movable, indexed by lattice point.
#[derive(Clone, Debug, Default)]
pub struct BlockSet {
    edges: HashMap<Point, EdgeHit>,
}

impl BlockSet {
    /// Index the edges of `blocks`.
    pub fn new(blocks: impl IntoIterator<Item = Block>) -> Self {
        let mut set = Self::default();
        set.extend(blocks);
        set
    }

    /// Drop all blocks, keeping the allocation for the next placement.
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Add more blocks. An edge center already taken by another block becomes ambiguous.
    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        for block in blocks {
            for (edge, point) in block.edge_centers() {
                self.edges.entry(point)
                    .and_modify(|hit| *hit = EdgeHit::Many)
                    .or_insert(EdgeHit::One { edge, variant: block.variant });
            }
        }
    }

    fn at(&self, point: Point) -> Option<EdgeHit> {
        self.edges.get(&point).copied()
    }
}

/// Moves single rays across the lattice until they stop.
pub struct Tracer<'a> {
    board: &'a Board,
    blocks: &'a BlockSet,
    guard: LoopGuard,
}

impl<'a> Tracer<'a> {
    /// A tracer over `board`'s lattice with `blocks` in place.
    pub fn new(board: &'a Board, blocks: &'a BlockSet, guard: LoopGuard) -> Self {
        Self { board, blocks, guard }
    }

    /// Run `ray` to termination, marking every sink it passes in `sinks`.
    ///
    /// Rays spawned by refracting blocks are pushed to the back of `pending`; the caller must trace them too.
    pub fn trace(&self, mut ray: Ray, sinks: &mut SinkTracker, pending: &mut VecDeque<Ray>) -> Termination {
        let mut steps = 0;
        let mut visited = HashSet::new();

        loop {
            if self.guard == LoopGuard::CycleDetection && !visited.insert(ray) {
                return Termination::Looped;
            }

            match self.blocks.at(ray.position) {
                Some(EdgeHit::Many) => return Termination::AmbiguousCollision,
                Some(EdgeHit::One { edge, variant }) if edge.is_faced_by(ray.direction) => {
                    match variant.interact(ray, edge) {
                        Interaction::Redirected(next) => ray = next,
                        Interaction::Split { reflected, spawned } => {
                            trace!("ray split at {}, spawned {:?}", ray.position, spawned);
                            // sinks are only checked after a step, so the spawned ray's start is not marked
                            pending.push_back(spawned);
                            ray = reflected;
                        }
                        Interaction::Absorbed => {
                            sinks.mark(ray.position);
                            return if sinks.all_hit() { Termination::AllSinksHit } else { Termination::Absorbed };
                        }
                    }
                }
                _ => ray.advance(),
            }

            if !self.board.within_bounds(ray.position) {
                return Termination::OutOfBounds;
            }

            sinks.mark(ray.position);
            if sinks.all_hit() {
                return Termination::AllSinksHit;
            }

            steps += 1;
            if let LoopGuard::StepLimit(limit) = self.guard {
                if steps >= limit {
                    return Termination::StepLimit;
                }
            }
        }
    }
}
