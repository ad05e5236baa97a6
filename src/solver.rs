use itertools::Itertools;
use thiserror::Error;

use crate::cell::Cell;
use crate::configuration::{self, CandidateSet};
use crate::direction::Direction;
use crate::grid::{Grid, GridError};
use crate::monitor::{SearchMonitor, Session, Unbounded};
use crate::trace::Trace;

/// Reasons a search may end without destroying every target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum SolverFailure {
    /// The orientation search ran out of redirect nodes to turn.
    /// The grid is left in the last orientation assignment tried.
    #[error("no solution found from this starting point, {unresolved} targets remaining")]
    NoSolutionFromStart { unresolved: usize },
    /// Every assignment of candidate positions was tried without success.
    #[error("no configuration among the candidates solves the grid ({attempts} tried)")]
    ConfigurationExhausted { attempts: usize },
    /// The [`SearchMonitor`] stopped the search.
    #[error("search cancelled after {traces} traces")]
    Cancelled { traces: usize },
    /// The grid refused a write, e.g. a candidate location outside the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A strategy for turning the redirect nodes of a grid, whose positions are fixed, until every target is destroyed.
pub trait OrientationSearch {
    /// Mutate the orientations of the redirect nodes of `grid` in place, tracing through `session`.
    ///
    /// On success the grid holds the winning orientations and the winning trace is returned.
    fn search(&self, grid: &mut Grid, session: &mut Session<'_>) -> Result<Trace, SolverFailure>;
}

/// The path-driven local search.
///
/// After each unsolved trace, the redirect node nearest the end of the traced path turns by 45°.
/// Once it has come back round to [`Direction::East`], the next redirect node further back along the path turns too, and so on,
/// like an odometer whose digits are whichever redirect nodes the latest beam happened to pass.
/// The search fails when every redirect node on the path has come back round, or when the path passes none.
///
/// Because which redirect nodes a beam passes changes as they turn, this search is not exhaustive
/// and may revisit orientation assignments; see [`Exhaustive`] for a complete search.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathDriven;

impl PathDriven {
    // true if some redirect node turned without coming back round
    fn advance_along_path(grid: &mut Grid, trace: &Trace) -> Result<bool, SolverFailure> {
        for step in trace.steps().iter().rev() {
            let Some(Cell::RedirectNode { direction }) = grid.cell_at(step.location) else {
                continue;
            };

            let turned = direction.rotated(1);
            grid.set_cell(step.location, Cell::RedirectNode { direction: turned })?;
            if turned != Direction::East {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl OrientationSearch for PathDriven {
    fn search(&self, grid: &mut Grid, session: &mut Session<'_>) -> Result<Trace, SolverFailure> {
        loop {
            let trace = session.trace(grid)?;
            if trace.is_solved() {
                return Ok(trace);
            }

            if !Self::advance_along_path(grid, &trace)? {
                return Err(SolverFailure::NoSolutionFromStart { unresolved: trace.unresolved() });
            }
        }
    }
}

/// Tries every orientation assignment of every redirect node on the grid, beamed or not.
///
/// Redirect nodes are counted in base 8, the first node in row-major order being the least significant digit,
/// starting from their current orientations. On failure the orientations are back where they started.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exhaustive;

impl OrientationSearch for Exhaustive {
    fn search(&self, grid: &mut Grid, session: &mut Session<'_>) -> Result<Trace, SolverFailure> {
        let nodes = grid.redirect_nodes();
        let start = nodes.iter()
            .map(|location| grid.cell_at(*location).and_then(|cell| cell.facing()).unwrap_or_default())
            .collect_vec();

        loop {
            let trace = session.trace(grid)?;
            if trace.is_solved() {
                return Ok(trace);
            }

            let mut digit = 0;
            loop {
                let (Some(location), Some(first)) = (nodes.get(digit), start.get(digit)) else {
                    return Err(SolverFailure::NoSolutionFromStart { unresolved: trace.unresolved() });
                };

                let turned = grid.cell_at(*location).and_then(|cell| cell.facing()).unwrap_or_default().rotated(1);
                grid.set_cell(*location, Cell::RedirectNode { direction: turned })?;
                if turned != *first {
                    break;
                }
                digit += 1;
            }
        }
    }
}

/// An orientation search strategy paired with a monitor which may report on or cancel it.
///
/// ```
/// use lasergrid::{Grid, Solver, TraceBudget};
///
/// let mut grid: Grid = "0.a\n...\n..O".parse().unwrap();
/// let solved = Solver::new().with_monitor(TraceBudget(100)).solve_orientations(&mut grid).unwrap();
/// assert!(solved.is_solved());
/// assert_eq!(grid.to_string(), "0.c\n...\n..O\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Solver<S = PathDriven, M = Unbounded> {
    search: S,
    monitor: M,
}

impl Solver {
    /// A [`PathDriven`] solver which never gives up early.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, M> Solver<S, M>
where
    S: OrientationSearch,
    M: SearchMonitor,
{
    /// Replace the orientation search strategy.
    pub fn with_search<T: OrientationSearch>(self, search: T) -> Solver<T, M> {
        Solver { search, monitor: self.monitor }
    }

    /// Replace the monitor.
    pub fn with_monitor<N: SearchMonitor>(self, monitor: N) -> Solver<S, N> {
        Solver { search: self.search, monitor }
    }

    /// Give back the monitor, e.g. to inspect what it recorded.
    pub fn into_monitor(self) -> M {
        self.monitor
    }

    /// Search the orientations of the redirect nodes of `grid`, keeping their positions.
    pub fn solve_orientations(&mut self, grid: &mut Grid) -> Result<Trace, SolverFailure> {
        let mut session = Session::new(&mut self.monitor);
        let result = self.search.search(grid, &mut session);
        log_outcome(&result, session.traces());
        result
    }

    /// Search positions and orientations: `candidates[i]` lists where redirect node `i` may be placed.
    ///
    /// Position assignments are tried as a mixed-radix counter, node 0 being the least significant digit.
    /// For each, every node is placed facing [`Direction::East`] at its active candidate, its other candidates are emptied,
    /// and the orientations are searched. Nothing is written if any candidate lies outside the grid.
    pub fn solve_configuration(&mut self, grid: &mut Grid, candidates: &[CandidateSet]) -> Result<Trace, SolverFailure> {
        configuration::check_bounds(grid, candidates)?;

        let mut session = Session::new(&mut self.monitor);
        let mut active = vec![0; candidates.len()];
        let mut attempt = 0;

        let result = loop {
            if let Err(failure) = session.attempt(attempt, &active) {
                break Err(failure);
            }
            configuration::place(grid, candidates, &active)?;

            match self.search.search(grid, &mut session) {
                Err(SolverFailure::NoSolutionFromStart { .. }) => {}
                result => break result,
            }

            attempt += 1;
            if !configuration::advance(&mut active, candidates) {
                break Err(SolverFailure::ConfigurationExhausted { attempts: attempt });
            }
        };

        log_outcome(&result, session.traces());
        result
    }
}

fn log_outcome(result: &Result<Trace, SolverFailure>, traces: usize) {
    match result {
        Ok(_) => tracing::info!(traces, "solved"),
        Err(failure) => tracing::info!(traces, %failure, "unsolved"),
    }
}

/// Search the orientations of the redirect nodes of `grid` with [`PathDriven`], without a budget.
pub fn solve_orientations(grid: &mut Grid) -> Result<Trace, SolverFailure> {
    Solver::new().solve_orientations(grid)
}

/// Search positions and orientations of the redirect nodes of `grid` with [`PathDriven`], without a budget.
pub fn solve_configuration(grid: &mut Grid, candidates: &[CandidateSet]) -> Result<Trace, SolverFailure> {
    Solver::new().solve_configuration(grid, candidates)
}
