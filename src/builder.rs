use std::num::NonZero;

use thiserror::Error;

use crate::cell::Cell;
use crate::configuration::{self, CandidateSet};
use crate::direction::Direction;
use crate::grid::{Dimension, Grid};
use crate::level::Level;
use crate::location::Location;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum BuilderInvalidReason {
    /// A feature was placed outside the bounds specified by `dims` on a builder.
    #[error("feature placed outside the board")]
    FeatureOutOfBounds,
    /// A redirect node was added with no candidate locations.
    #[error("redirect node without candidate locations")]
    EmptyCandidateSet,
}

/// A builder for [`Level`]s: a board of emitters and targets, plus redirect nodes which may each occupy one of several candidate locations.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
#[derive(Clone, Debug)]
pub struct LevelBuilder {
    grid: Grid,
    candidates: Vec<CandidateSet>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::new(16).unwrap(), NonZero::new(12).unwrap()))
    }
}

impl LevelBuilder {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(x, y)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            grid: Grid::with_dims(dims),
            candidates: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    fn place(&mut self, location: Location, cell: Cell) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.grid.set_cell(location, cell).is_err() {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
        }

        self
    }

    /// Add an emitter at `location` sending its beam in `direction`.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_emitter(&mut self, location: Location, direction: Direction) -> &mut Self {
        self.place(location, Cell::Emitter { direction })
    }

    /// Add a target at `location`.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_target(&mut self, location: Location) -> &mut Self {
        self.place(location, Cell::Target)
    }

    /// Add a redirect node which may stand at any of `candidates`. The built level places it at the first one.
    ///
    /// Redirect nodes are placed after every other feature, so they replace whatever else shares their first candidate.
    /// May cause the builder to enter an [`EmptyCandidateSet`](BuilderInvalidReason::EmptyCandidateSet) invalid state if `candidates` is empty,
    /// or a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if any candidate is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_redirect_node(&mut self, candidates: Vec<Location>) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if candidates.iter().any(|location| !self.grid.contains(*location)) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        match CandidateSet::new(candidates) {
            Ok(set) => self.candidates.push(set),
            Err(_) => self.invalid_reasons.push(BuilderInvalidReason::EmptyCandidateSet),
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Level`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Level, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let mut grid = self.grid.clone();
        // every candidate was bounds checked on insertion
        if configuration::place(&mut grid, &self.candidates, &vec![0; self.candidates.len()]).is_err() {
            return Err(&self.invalid_reasons);
        }

        Ok(Level::new(grid, self.candidates.clone()))
    }
}
