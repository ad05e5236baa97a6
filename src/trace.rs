use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::cell::Cell;
use crate::direction::Direction;
use crate::grid::Grid;
use crate::location::Location;

/// A beam at `location`, departing in `direction`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct BeamStep {
    /// Where the beam is.
    pub location: Location,
    /// The direction it leaves that location in.
    pub direction: Direction,
}

impl BeamStep {
    pub(crate) fn new(location: Location, direction: Direction) -> Self {
        Self { location, direction }
    }
}

/// The combined path of every emitter's beam over one grid state, and the targets no beam reached.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trace {
    unresolved: usize,
    steps: Vec<BeamStep>,
}

impl Trace {
    /// Number of targets no beam reached.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    /// Whether every target was reached.
    pub fn is_solved(&self) -> bool {
        self.unresolved == 0
    }

    /// Every beam's steps, one beam after another in emitter scan order.
    pub fn steps(&self) -> &[BeamStep] {
        &self.steps
    }

    /// The steps along the path which currently hold a redirect node in `grid`, in path order.
    pub fn redirects_on_path(&self, grid: &Grid) -> Vec<BeamStep> {
        self.steps.iter()
            .filter(|step| matches!(grid.cell_at(step.location), Some(Cell::RedirectNode { .. })))
            .copied()
            .collect_vec()
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unresolved)?;
        for step in &self.steps {
            write!(f, " > {},{}", step.location, step.direction.index())?;
        }
        Ok(())
    }
}

// positions seen so far by any beam, plus the ordered path they were seen on
struct PathAccumulator {
    visited: HashSet<Location>,
    steps: Vec<BeamStep>,
    unresolved: usize,
}

impl PathAccumulator {
    fn push(&mut self, step: BeamStep) {
        self.visited.insert(step.location);
        self.steps.push(step);
    }

    fn follow_beam(&mut self, grid: &Grid, origin: BeamStep) {
        self.push(origin);

        let BeamStep { mut location, mut direction } = origin;
        loop {
            location = location.step(direction);
            let Some(cell) = grid.cell_at(location) else {
                tracing::trace!(%location, "beam left the grid");
                return;
            };
            let visited = self.visited.contains(&location);

            if let Some(facing) = cell.facing() {
                direction = facing;
            }

            match cell {
                Cell::Target => {
                    if !visited {
                        self.unresolved -= 1;
                    }
                    self.push(BeamStep::new(location, direction));
                }
                Cell::Empty => self.push(BeamStep::new(location, direction)),
                Cell::Emitter { .. } | Cell::RedirectNode { .. } => {
                    if visited {
                        // joins an already traced segment; the duplicate step is not recorded
                        tracing::trace!(%location, "beam absorbed into traced path");
                        return;
                    }
                    self.push(BeamStep::new(location, direction));
                }
            }
        }
    }
}

/// Propagate every emitter's beam through `grid`.
///
/// Emitters are scanned row by row. All beams share one visited set: a beam that reaches an emitter or redirect node
/// already on the path ends there, and a target counts as reached the first time any beam passes it.
/// Empty cells and targets never end a beam, so a beam crossing an earlier one continues through the crossing.
pub fn trace(grid: &Grid) -> Trace {
    let origins = grid.cells()
        .filter_map(|(location, cell)| match cell {
            Cell::Emitter { direction } => Some(BeamStep::new(location, direction)),
            _ => None,
        })
        .collect_vec();

    let mut accumulator = PathAccumulator {
        visited: HashSet::new(),
        steps: Vec::new(),
        unresolved: grid.count_targets(),
    };

    for origin in origins {
        accumulator.follow_beam(grid, origin);
    }

    Trace {
        unresolved: accumulator.unresolved,
        steps: accumulator.steps,
    }
}
