#![warn(missing_docs)]

//! # `lasergrid`
//!
//! Light propagation and a solver for laser grid puzzles: emitters send beams across a rectangular board in one of eight directions,
//! redirect nodes turn any beam entering them to face their own direction, and the puzzle is won once every target has been struck.
//!
//! Begin by building a [`Level`] with a [`LevelBuilder`], or parse a bare [`Grid`] from its ASCII form.
//! Call [`trace()`] to follow every beam, then [`solve_orientations()`] to turn the redirect nodes in place, or
//! [`solve_configuration()`] (or [`Level::solve`]) to also choose where each redirect node stands among its [`CandidateSet`].
//!
//! # Internals
//! All beams share one visited set. A beam ends when it leaves the board or reaches an emitter or redirect node some beam has
//! already passed, so a trace always halts, even on boards where beams loop.
//!
//! The default orientation search, [`PathDriven`], is a local search: after each failed trace it turns the redirect node closest to
//! the end of the path, carrying to the node before it once that one has been round all eight directions.
//! It is deliberately incomplete, and a [`SearchMonitor`] such as [`TraceBudget`] bounds how long it may run.
//! [`Exhaustive`] is a complete alternative, implementing the same [`OrientationSearch`] trait.
//!
//! ```
//! use lasergrid::{trace, Level};
//!
//! let mut level = Level::default_level();
//! assert_eq!(trace(level.grid()).unresolved(), 1);
//!
//! level.solve().unwrap();
//! assert!(level.trace().is_solved());
//! ```

pub use builder::{BuilderInvalidReason, LevelBuilder};
pub use cell::Cell;
pub use configuration::{CandidateSet, EmptyCandidateSet};
pub use direction::Direction;
pub use grid::{Grid, GridError, ParseGridError};
pub use level::Level;
pub use location::Location;
pub use monitor::{from_fn, FnMonitor, SearchEvent, SearchMonitor, Session, TraceBudget, Unbounded};
pub use solver::{solve_configuration, solve_orientations, Exhaustive, OrientationSearch, PathDriven, Solver, SolverFailure};
pub use trace::{trace, BeamStep, Trace};

pub mod builder;
pub(crate) mod cell;
pub(crate) mod configuration;
pub(crate) mod direction;
pub(crate) mod grid;
pub(crate) mod level;
pub(crate) mod location;
pub(crate) mod monitor;
pub(crate) mod solver;
mod tests;
pub(crate) mod trace;
#[cfg(feature = "wasm")]
pub mod wasm;
