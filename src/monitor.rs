use std::ops::ControlFlow;

use itertools::Itertools;
use tracing::Level;

use crate::grid::Grid;
use crate::solver::SolverFailure;
use crate::trace::{trace, Trace};

/// Progress reported to a [`SearchMonitor`] while a search runs.
#[derive(Clone, Copy, Debug)]
pub enum SearchEvent<'a> {
    /// The grid was traced; `traces` counts every trace of this search so far, this one included.
    Traced { trace: &'a Trace, traces: usize },
    /// The configuration search is about to try its `attempt`th position assignment (counting from 0).
    /// `active[i]` is the index of the active candidate of redirect node `i`.
    ConfigurationAttempt { attempt: usize, active: &'a [usize] },
}

/// Observes a running search and decides whether it may continue.
///
/// Returning [`ControlFlow::Break`] aborts the search with [`SolverFailure::Cancelled`],
/// unless the trace just reported already solves the grid.
pub trait SearchMonitor {
    /// Inspect `event`.
    fn observe(&mut self, event: &SearchEvent<'_>) -> ControlFlow<()>;
}

/// Never interrupts a search.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbounded;

impl SearchMonitor for Unbounded {
    fn observe(&mut self, _: &SearchEvent<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Stops a search once it has traced the grid a fixed number of times.
#[derive(Clone, Copy, Debug)]
pub struct TraceBudget(pub usize);

impl SearchMonitor for TraceBudget {
    fn observe(&mut self, event: &SearchEvent<'_>) -> ControlFlow<()> {
        match event {
            SearchEvent::Traced { traces, .. } if *traces >= self.0 => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }
}

/// A [`SearchMonitor`] calling a closure; see [`from_fn`].
pub struct FnMonitor<F>(F);

impl<F> SearchMonitor for FnMonitor<F>
where
    F: FnMut(&SearchEvent<'_>) -> ControlFlow<()>,
{
    fn observe(&mut self, event: &SearchEvent<'_>) -> ControlFlow<()> {
        (self.0)(event)
    }
}

/// Monitor a search with a closure, e.g. to report progress to a host or to cancel from outside.
pub fn from_fn<F>(f: F) -> FnMonitor<F>
where
    F: FnMut(&SearchEvent<'_>) -> ControlFlow<()>,
{
    FnMonitor(f)
}

/// One search run: the monitor plus the count of traces performed so far.
pub struct Session<'m> {
    monitor: &'m mut dyn SearchMonitor,
    traces: usize,
}

impl<'m> Session<'m> {
    pub(crate) fn new(monitor: &'m mut dyn SearchMonitor) -> Self {
        Self { monitor, traces: 0 }
    }

    /// Traces performed so far.
    pub fn traces(&self) -> usize {
        self.traces
    }

    /// Trace `grid` and report the trace, failing with [`SolverFailure::Cancelled`] if the monitor stops an unsolved search.
    pub fn trace(&mut self, grid: &Grid) -> Result<Trace, SolverFailure> {
        let trace = trace(grid);
        self.traces += 1;

        if tracing::enabled!(Level::DEBUG) {
            let redirects = trace.redirects_on_path(grid).iter()
                .map(|step| format!("{},{}", step.location, step.direction.index()))
                .join(" > ");
            tracing::debug!(traces = self.traces, unresolved = trace.unresolved(), %redirects, "traced");
        }

        let flow = self.monitor.observe(&SearchEvent::Traced { trace: &trace, traces: self.traces });
        if flow.is_break() && !trace.is_solved() {
            return Err(SolverFailure::Cancelled { traces: self.traces });
        }

        Ok(trace)
    }

    pub(crate) fn attempt(&mut self, attempt: usize, active: &[usize]) -> Result<(), SolverFailure> {
        tracing::debug!(attempt, ?active, "trying configuration");

        match self.monitor.observe(&SearchEvent::ConfigurationAttempt { attempt, active }) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(SolverFailure::Cancelled { traces: self.traces }),
        }
    }
}
