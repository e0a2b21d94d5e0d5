use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use lazor::{bff, LoopGuard, Outcome, SolverConfig};

/// Solve a Lazor puzzle described by a `.bff` file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Puzzle file to solve.
    file: PathBuf,

    /// Shuffle the placements with this seed before searching.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop each ray after this many steps.
    #[arg(long, default_value_t = 50, conflicts_with = "cycle_detection")]
    step_limit: usize,

    /// Stop a ray when it repeats a position and direction instead of after a fixed number of steps.
    #[arg(long)]
    cycle_detection: bool,

    /// Worker threads; 0 picks one per core.
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Placements handed to the workers at a time.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Log progress every this many placements.
    #[arg(long)]
    report_every: Option<usize>,

    /// Write the solution to `<output>/<name>/<name>.txt`.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> SolverConfig {
        let mut config = SolverConfig::new()
            .with_loop_guard(if self.cycle_detection { LoopGuard::CycleDetection } else { LoopGuard::StepLimit(self.step_limit) })
            .with_threads(self.threads);
        if let Some(seed) = self.seed {
            config = config.with_shuffle(seed);
        }
        if let Some(size) = self.batch_size {
            config = config.with_batch_size(size);
        }
        if let Some(every) = self.report_every {
            config = config.with_report_every(every);
        }
        config
    }
}

fn write_solution(dir: &Path, name: &str, text: &str) -> std::io::Result<PathBuf> {
    let dir = dir.join(name);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{name}.txt"));
    fs::write(&path, text)?;
    Ok(path)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let board = match bff::read(&args.file) {
        Ok(board) => board,
        Err(err) => {
            error!("{}: {}", args.file.display(), err);
            return ExitCode::from(2);
        }
    };
    print!("{}", board);

    match board.solve(args.config()) {
        Outcome::Solved(solution) => {
            let text = format!("{}\n{}", solution, solution.render(&board));
            print!("{}", text);

            if let Some(output) = &args.output {
                let name = args.file.file_stem().map_or("puzzle".into(), |stem| stem.to_string_lossy());
                match write_solution(output, &name, &text) {
                    Ok(path) => info!("solution written to {}", path.display()),
                    Err(err) => {
                        error!("could not write solution: {}", err);
                        return ExitCode::from(2);
                    }
                }
            }

            ExitCode::SUCCESS
        }
        Outcome::Exhausted { .. } | Outcome::Cancelled { .. } => {
            println!("no solution found");
            ExitCode::from(1)
        }
    }
}
