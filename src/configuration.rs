use thiserror::Error;

use crate::cell::Cell;
use crate::direction::Direction;
use crate::grid::{Grid, GridError};
use crate::location::Location;

/// A redirect node was given no candidate positions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error("a redirect node needs at least one candidate location")]
pub struct EmptyCandidateSet;

/// The ordered, non-empty list of locations one redirect node may occupy.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CandidateSet(Vec<Location>);

impl CandidateSet {
    /// Wrap `locations`, which must not be empty.
    pub fn new(locations: Vec<Location>) -> Result<Self, EmptyCandidateSet> {
        match locations.is_empty() {
            true => Err(EmptyCandidateSet),
            false => Ok(Self(locations)),
        }
    }

    /// All candidates, the first being where the node starts out.
    pub fn locations(&self) -> &[Location] {
        &self.0
    }

    /// Number of candidates; never 0.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl TryFrom<Vec<Location>> for CandidateSet {
    type Error = EmptyCandidateSet;

    fn try_from(value: Vec<Location>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

pub(crate) fn check_bounds(grid: &Grid, candidates: &[CandidateSet]) -> Result<(), GridError> {
    match candidates.iter()
        .flat_map(CandidateSet::locations)
        .find(|location| !grid.contains(**location)) {
        Some(location) => Err(GridError::OutOfBounds(*location)),
        None => Ok(()),
    }
}

// candidates[i].locations()[active[i]] holds a fresh redirect node, the rest of candidates[i] is emptied
pub(crate) fn place(grid: &mut Grid, candidates: &[CandidateSet], active: &[usize]) -> Result<(), GridError> {
    for (set, chosen) in candidates.iter().zip(active) {
        for (index, location) in set.locations().iter().enumerate() {
            let cell = if index == *chosen {
                Cell::RedirectNode { direction: Direction::East }
            } else {
                Cell::Empty
            };
            grid.set_cell(*location, cell)?;
        }
    }

    Ok(())
}

// mixed-radix increment, digit 0 least significant; false once every digit has wrapped back to 0
pub(crate) fn advance(active: &mut [usize], candidates: &[CandidateSet]) -> bool {
    for (digit, set) in active.iter_mut().zip(candidates) {
        *digit = (*digit + 1) % set.len();
        if *digit != 0 {
            return true;
        }
    }

    false
}
