use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use itertools::{Either, Itertools};
use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::block::{Block, Variant};
use crate::board::{print, Board};
use crate::placement::Placement;
use crate::ray::{BlockSet, LoopGuard, Ray, Termination, Tracer};
use crate::sink::SinkTracker;

/// Settings for a [`Solver`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    /// How rays caught bouncing between blocks are stopped.
    pub loop_guard: LoopGuard,
    /// Shuffle the placements with this seed before trying them.
    /// Only changes how soon a solution turns up, never whether one does.
    pub shuffle_seed: Option<u64>,
    /// Worker threads. `1` searches on the calling thread, `0` uses rayon's default pool.
    pub threads: usize,
    /// Log progress every this many placements.
    pub report_every: Option<NonZero<usize>>,
    /// Placements handed to the workers at a time when searching in parallel.
    /// Only one batch is held in memory, unless the placements are shuffled.
    pub batch_size: NonZero<usize>,
}

const DEFAULT_BATCH: NonZero<usize> = match NonZero::new(4096) {
    Some(size) => size,
    None => unreachable!(),
};

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            loop_guard: LoopGuard::default(),
            shuffle_seed: None,
            threads: 1,
            report_every: None,
            batch_size: DEFAULT_BATCH,
        }
    }
}

impl SolverConfig {
    /// Same as [`Self::default`]: step limit of 50, no shuffle, one thread, no progress reports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how trapped rays are stopped.
    pub fn with_loop_guard(mut self, loop_guard: LoopGuard) -> Self {
        self.loop_guard = loop_guard;
        self
    }

    /// Shorthand for [`LoopGuard::StepLimit`].
    pub fn with_step_limit(self, steps: usize) -> Self {
        self.with_loop_guard(LoopGuard::StepLimit(steps))
    }

    /// Try placements in a random order fixed by `seed`.
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Set the number of worker threads, see [`Self::threads`].
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Log progress every `placements` placements. `0` turns reports off.
    pub fn with_report_every(mut self, placements: usize) -> Self {
        self.report_every = NonZero::new(placements);
        self
    }

    /// Set [`Self::batch_size`]. `0` keeps the current size.
    pub fn with_batch_size(mut self, placements: usize) -> Self {
        if let Some(size) = NonZero::new(placements) {
            self.batch_size = size;
        }
        self
    }
}

/// The first placement found that lights every sink.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Solution {
    /// Cell of each movable block.
    pub placement: Placement,
    /// Kind of each movable block, matching `placement` index for index.
    pub kinds: Vec<Variant>,
    /// Position of `placement` in the order the placements were tried.
    pub index: usize,
}

impl Solution {
    /// The movable blocks, each at its chosen cell.
    pub fn blocks(&self) -> Vec<Block> {
        self.placement.blocks(&self.kinds).collect()
    }

    /// Draw `board` with the movable blocks placed, in lowercase to tell them apart from the fixed ones.
    pub fn render(&self, board: &Board) -> String {
        let mut grid = board.layout.map(|cell| cell.to_string());
        for block in self.blocks() {
            if let Some(code) = grid.get_mut(block.location.as_index()) {
                *code = block.variant.to_string().to_ascii_lowercase();
            }
        }

        print(&grid)
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Place [{}] @ {}", self.kinds.iter().map(|kind| format!("{:?}", kind)).join(", "), self.placement)
    }
}

/// How a search ended. Running out of placements is an ordinary result, not an error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// A placement lit every sink.
    Solved(Solution),
    /// Every placement was tried and none lit every sink.
    Exhausted { tried: usize },
    /// The cancellation handle was set before a solution was found.
    Cancelled { tried: usize },
}

impl Outcome {
    /// The solution, if one was found.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

/// Result of simulating every laser against one placement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Evaluation {
    /// One flag per sink of the board, in order.
    pub hits: Vec<bool>,
    /// Why each ray stopped, in the order the rays were traced.
    pub terminations: Vec<Termination>,
}

impl Evaluation {
    /// Whether every sink was hit.
    pub fn solved(&self) -> bool {
        self.hits.iter().all(|hit| *hit)
    }
}

/// Scratch state for evaluating placements, owned by one worker.
struct Workspace<'a> {
    blocks: BlockSet,
    pending: VecDeque<Ray>,
    sinks: SinkTracker<'a>,
}

impl<'a> Workspace<'a> {
    fn new(board: &'a Board) -> Self {
        Self {
            blocks: BlockSet::default(),
            pending: VecDeque::new(),
            sinks: SinkTracker::new(&board.sinks),
        }
    }
}

/// Tries placements of a board's movable blocks until one lights every sink.
///
/// Placements are independent, so with more than one thread they are spread over a rayon pool.
/// The result is the same either way: the first solving placement in enumeration order.
pub struct Solver<'a> {
    board: &'a Board,
    config: SolverConfig,
    fixed: Vec<Block>,
    kinds: Vec<Variant>,
    cancelled: Arc<AtomicBool>,
}

impl<'a> Solver<'a> {
    /// A solver for `board` with its own cancellation handle.
    pub fn new(board: &'a Board, config: SolverConfig) -> Self {
        Self::with_cancellation(board, config, Arc::new(AtomicBool::new(false)))
    }

    /// Creates a solver with a pre-existing cancellation handle.
    pub fn with_cancellation(board: &'a Board, config: SolverConfig, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            board,
            config,
            fixed: board.fixed_blocks(),
            kinds: board.movable_kinds(),
            cancelled,
        }
    }

    /// Returns a handle to stop the search. Workers check it between placements.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Simulate every laser against `placement`, recording how each ray ended.
    pub fn evaluate(&self, placement: &Placement) -> Evaluation {
        let mut workspace = Workspace::new(self.board);
        let mut terminations = Vec::new();
        self.evaluate_in(placement, &mut workspace, |termination| terminations.push(termination));

        Evaluation {
            hits: workspace.sinks.hits().to_vec(),
            terminations,
        }
    }

    fn evaluate_in(&self, placement: &Placement, workspace: &mut Workspace, mut on_termination: impl FnMut(Termination)) -> bool {
        let Workspace { blocks, pending, sinks } = workspace;

        blocks.clear();
        blocks.extend(self.fixed.iter().copied());
        blocks.extend(placement.blocks(&self.kinds));
        sinks.reset();

        let tracer = Tracer::new(self.board, blocks, self.config.loop_guard);
        for laser in self.board.lasers() {
            // spawned rays are traced in the order they were created
            pending.clear();
            pending.push_back(*laser);

            while let Some(ray) = pending.pop_front() {
                let termination = tracer.trace(ray, sinks, pending);
                on_termination(termination);
                if sinks.all_hit() {
                    return true;
                }
            }
        }

        sinks.all_hit()
    }

    /// Search until a solution is found, every placement has been tried or the search is cancelled.
    pub fn run(&self) -> Outcome {
        let enumerator = self.board.enumerator();
        let total = enumerator.len();
        info!("{} open cells, placing {:?}, {} candidate placements",
            self.board.open_cells().len(), self.kinds, total);

        let placements = match self.config.shuffle_seed {
            Some(seed) => Either::Left(enumerator.shuffled(seed).into_iter()),
            None => Either::Right(enumerator.iter()),
        };
        let outcome = if self.config.threads == 1 {
            self.run_sequential(placements)
        } else {
            self.run_parallel(placements, total)
        };

        match &outcome {
            Outcome::Solved(solution) => {
                info!("all sinks lit at iteration {}: {}", solution.index, solution);
                if total > 0 {
                    info!("{:.3}% of the search space explored", solution.index as f64 / total as f64 * 100.0);
                }
            }
            Outcome::Exhausted { tried } => info!("no solution after {} placements", tried),
            Outcome::Cancelled { tried } => info!("cancelled after {} placements", tried),
        }

        outcome
    }

    fn run_sequential(&self, placements: impl Iterator<Item = Placement>) -> Outcome {
        let mut workspace = Workspace::new(self.board);
        let mut window = Duration::ZERO;
        let mut samples = 0usize;
        let mut tried = 0;

        for (index, placement) in placements.enumerate() {
            if self.cancelled.load(Ordering::Relaxed) {
                return Outcome::Cancelled { tried };
            }

            let start = Instant::now();
            let solved = self.evaluate_in(&placement, &mut workspace, |_| ());
            window += start.elapsed();
            samples += 1;
            tried += 1;

            if let Some(every) = self.config.report_every {
                if index % every.get() == 0 {
                    info!("iteration {}, {:?} per placement", index, window.div_f64(samples as f64));
                    window = Duration::ZERO;
                    samples = 0;
                }
            }

            if solved {
                debug!("placement {} lights every sink", placement);
                return Outcome::Solved(Solution { placement, kinds: self.kinds.clone(), index });
            }
        }

        Outcome::Exhausted { tried }
    }

    /// Search batch after batch, each spread over the pool.
    ///
    /// Every batch is searched to its first solution before the next is started, so the result is
    /// still the first solution in enumeration order.
    fn run_parallel(&self, placements: impl Iterator<Item = Placement>, total: usize) -> Outcome {
        let pool = match self.config.threads {
            0 => None,
            threads => match ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => Some(pool),
                Err(err) => {
                    warn!("could not start {} workers ({}), using the global pool", threads, err);
                    None
                }
            },
        };

        let tried = AtomicUsize::new(0);
        let batch_size = self.config.batch_size.get();
        let batches = placements.chunks(batch_size);

        for (number, batch) in (&batches).into_iter().enumerate() {
            if self.cancelled.load(Ordering::Relaxed) {
                break;
            }

            let batch = batch.collect_vec();
            let offset = number * batch_size;
            let search = || self.search_batch(&batch, offset, &tried, total);
            let found = match &pool {
                Some(pool) => pool.install(search),
                None => search(),
            };

            if let Some(index) = found {
                return Outcome::Solved(Solution {
                    placement: batch[index - offset].clone(),
                    kinds: self.kinds.clone(),
                    index,
                });
            }
        }

        let tried = tried.into_inner();
        if self.cancelled.load(Ordering::Relaxed) {
            Outcome::Cancelled { tried }
        } else {
            Outcome::Exhausted { tried }
        }
    }

    /// Index of the first solving placement in `batch`, counted from the start of the search.
    fn search_batch(&self, batch: &[Placement], offset: usize, tried: &AtomicUsize, total: usize) -> Option<usize> {
        batch.par_iter()
            .enumerate()
            .map_init(|| Workspace::new(self.board), |workspace, (index, placement)| {
                if self.cancelled.load(Ordering::Relaxed) {
                    return None;
                }

                let solved = self.evaluate_in(placement, workspace, |_| ());
                let count = tried.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(every) = self.config.report_every {
                    if count % every.get() == 0 {
                        info!("{} of {} placements tried", count, total);
                    }
                }

                solved.then_some(offset + index)
            })
            .find_first(Option::is_some)
            .flatten()
    }
}
