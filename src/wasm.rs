use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::builder::LevelBuilder;
use crate::direction::Direction;
use crate::grid::Dimension;
use crate::level::Level;
use crate::location::Location;
use crate::monitor::TraceBudget;
use crate::solver::{Solver, SolverFailure};

/// A level under construction or in play, for a browser host which does its own drawing and storage.
#[wasm_bindgen]
pub struct Puzzle {
    builder: LevelBuilder,
    level: Option<Level>,
}

fn location(x: u32, y: u32) -> Location {
    Location(x as usize, y as usize)
}

impl Puzzle {
    fn check_builder(&self) -> Result<(), JsError> {
        match self.builder.is_valid().and_then(|reasons| reasons.first()) {
            Some(reason) => Err(JsError::from(*reason)),
            None => Ok(()),
        }
    }

    fn level(&self) -> Result<&Level, JsError> {
        self.level.as_ref().ok_or_else(|| JsError::new("the puzzle has not been built"))
    }

    fn level_mut(&mut self) -> Result<&mut Level, JsError> {
        self.level.as_mut().ok_or_else(|| JsError::new("the puzzle has not been built"))
    }
}

#[wasm_bindgen]
impl Puzzle {
    /// An empty board of `cols` × `rows`.
    #[wasm_bindgen(constructor)]
    pub fn new(cols: u32, rows: u32) -> Result<Puzzle, JsError> {
        let (Some(cols), Some(rows)) = (Dimension::new(cols as usize), Dimension::new(rows as usize)) else {
            return Err(JsError::new("board dimensions must be positive"));
        };

        Ok(Self {
            builder: LevelBuilder::with_dims((cols, rows)),
            level: None,
        })
    }

    /// The bundled level, already built.
    pub fn bundled() -> Puzzle {
        Self {
            builder: LevelBuilder::default(),
            level: Some(Level::default_level()),
        }
    }

    /// Add an emitter at `(x, y)` facing `direction` (0-7).
    #[wasm_bindgen(js_name = addEmitter)]
    pub fn add_emitter(&mut self, x: u32, y: u32, direction: u8) -> Result<(), JsError> {
        let direction = Direction::from_index(direction).ok_or_else(|| JsError::new("direction must be in 0..8"))?;
        self.builder.add_emitter(location(x, y), direction);
        self.check_builder()
    }

    /// Add a target at `(x, y)`.
    #[wasm_bindgen(js_name = addTarget)]
    pub fn add_target(&mut self, x: u32, y: u32) -> Result<(), JsError> {
        self.builder.add_target(location(x, y));
        self.check_builder()
    }

    /// Add a redirect node whose candidate locations are given as flattened `x, y` pairs.
    #[wasm_bindgen(js_name = addRedirect)]
    pub fn add_redirect(&mut self, coords: Vec<u32>) -> Result<(), JsError> {
        if coords.len() % 2 != 0 {
            return Err(JsError::new("candidate coordinates must come in x, y pairs"));
        }

        self.builder.add_redirect_node(coords.chunks_exact(2).map(|pair| location(pair[0], pair[1])).collect());
        self.check_builder()
    }

    /// Freeze the features added so far into a playable board, replacing any previous one.
    pub fn build(&mut self) -> Result<(), JsError> {
        let level = self.builder.build().map_err(|reasons| match reasons.first() {
            Some(reason) => JsError::from(*reason),
            None => JsError::new("invalid puzzle"),
        })?;
        self.level = Some(level);
        Ok(())
    }

    /// The traced path as an array of `[x, y, direction]` triples.
    pub fn trace(&self) -> Result<Array, JsError> {
        Ok(self.level()?.trace().steps().iter()
            .map(|step| Array::of3(
                &JsValue::from(step.location.0 as u32),
                &JsValue::from(step.location.1 as u32),
                &JsValue::from(step.direction.index()),
            ))
            .collect())
    }

    /// Targets no beam currently reaches; 0 means the puzzle is won.
    pub fn remaining(&self) -> Result<usize, JsError> {
        Ok(self.level()?.trace().unresolved())
    }

    /// Turn the emitter or redirect node at `(x, y)` as a click would.
    pub fn rotate(&mut self, x: u32, y: u32) -> Result<(), JsError> {
        self.level_mut()?.grid_mut().rotate_at(location(x, y))?;
        Ok(())
    }

    /// Search for a winning configuration, giving up after `max_traces` traces if given.
    ///
    /// Returns whether one was found; the board holds it if so.
    pub fn solve(&mut self, max_traces: Option<u32>) -> Result<bool, JsError> {
        let level = self.level_mut()?;
        let result = match max_traces {
            Some(budget) => level.solve_with(&mut Solver::new().with_monitor(TraceBudget(budget as usize))),
            None => level.solve(),
        };

        match result {
            Ok(_) => Ok(true),
            Err(SolverFailure::NoSolutionFromStart { .. } | SolverFailure::ConfigurationExhausted { .. } | SolverFailure::Cancelled { .. }) => Ok(false),
            Err(failure) => Err(failure.into()),
        }
    }

    /// The board in its ASCII form.
    pub fn render(&self) -> Result<String, JsError> {
        Ok(self.level()?.to_string())
    }
}
