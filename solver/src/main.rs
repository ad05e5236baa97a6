use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lasergrid::{trace, Exhaustive, Grid, Level, OrientationSearch, SearchMonitor, Solver, SolverFailure, Trace, TraceBudget, Unbounded};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "solver")]
#[command(about = "Trace and solve a laser grid puzzle")]
struct Cmd {
    /// ASCII grid to solve in place; the bundled level (with its candidate positions) if omitted
    #[arg(long)]
    grid: Option<PathBuf>,

    /// Give up after this many traces
    #[arg(long)]
    max_traces: Option<usize>,

    /// Try every orientation instead of the path-driven search
    #[arg(long)]
    exhaustive: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();
    let cmd = Cmd::parse();

    match (cmd.exhaustive, cmd.max_traces) {
        (false, None) => run(&cmd, Solver::new()),
        (false, Some(budget)) => run(&cmd, Solver::new().with_monitor(TraceBudget(budget))),
        (true, None) => run(&cmd, Solver::new().with_search(Exhaustive).with_monitor(Unbounded)),
        (true, Some(budget)) => run(&cmd, Solver::new().with_search(Exhaustive).with_monitor(TraceBudget(budget))),
    }
}

fn run<S: OrientationSearch, M: SearchMonitor>(cmd: &Cmd, mut solver: Solver<S, M>) -> Result<()> {
    match &cmd.grid {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let mut grid = text.parse::<Grid>().with_context(|| format!("parsing {}", path.display()))?;
            print!("{}", grid);

            let result = solver.solve_orientations(&mut grid);
            report(&result, &grid);
        }
        None => {
            let mut level = Level::default_level();
            print!("{}", level);

            let result = level.solve_with(&mut solver);
            report(&result, level.grid());
        }
    }

    Ok(())
}

fn report(result: &Result<Trace, SolverFailure>, grid: &Grid) {
    print!("\n{}", grid);
    match result {
        Ok(solved) => println!("You WIN! {}", solved),
        Err(failure) => {
            tracing::warn!(%failure, "unsolved");
            println!("Remaining: {}", trace(grid).unresolved());
        }
    }
}
