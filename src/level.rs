use std::fmt::{Display, Formatter};

use crate::builder::LevelBuilder;
use crate::configuration::CandidateSet;
use crate::direction::Direction;
use crate::grid::Grid;
use crate::location::Location;
use crate::monitor::SearchMonitor;
use crate::solver::{OrientationSearch, Solver, SolverFailure};
use crate::trace::{trace, Trace};

/// A puzzle: a [`Grid`] together with the candidate locations of each of its redirect nodes.
///
/// [`Level`]s should be built using a [`LevelBuilder`].
#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    candidates: Vec<CandidateSet>,
}

impl Level {
    pub(crate) fn new(grid: Grid, candidates: Vec<CandidateSet>) -> Self {
        Self { grid, candidates }
    }

    /// The bundled starter level: a 16×12 board with one emitter, one target and three redirect nodes.
    pub fn default_level() -> Self {
        LevelBuilder::default()
            .add_target(Location(0, 2))
            .add_emitter(Location(1, 1), Direction::East)
            .add_redirect_node(vec![Location(15, 1)])
            .add_redirect_node(vec![Location(15, 11)])
            .add_redirect_node(vec![Location(0, 11)])
            .build()
            .expect("the default level fits the default board")
    }

    /// The current board.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The current board, e.g. to turn a node by hand.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Candidate locations of each redirect node.
    pub fn candidates(&self) -> &[CandidateSet] {
        &self.candidates
    }

    /// Trace the current board.
    pub fn trace(&self) -> Trace {
        trace(&self.grid)
    }

    /// Search positions and orientations of the redirect nodes with the default [`Solver`].
    ///
    /// On success the board holds the solution.
    pub fn solve(&mut self) -> Result<Trace, SolverFailure> {
        self.solve_with(&mut Solver::new())
    }

    /// Search positions and orientations of the redirect nodes with `solver`.
    pub fn solve_with<S, M>(&mut self, solver: &mut Solver<S, M>) -> Result<Trace, SolverFailure>
    where
        S: OrientationSearch,
        M: SearchMonitor,
    {
        solver.solve_configuration(&mut self.grid, &self.candidates)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.grid)
    }
}
