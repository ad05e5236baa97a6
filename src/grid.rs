use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;
use thiserror::Error;

use crate::cell::Cell;
use crate::location::{Coord, Location};

pub(crate) type Dimension = NonZero<Coord>;

/// Reasons a write to a [`Grid`] may be refused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum GridError {
    /// The location lies outside `[0, cols) × [0, rows)`.
    #[error("location {0} is outside the grid")]
    OutOfBounds(Location),
}

/// Reasons the ASCII form of a grid may fail to parse.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseGridError {
    /// No rows, or a row with no cells.
    #[error("a grid needs at least one row and one column")]
    Empty,
    /// A row whose width differs from the first row.
    #[error("row {row} has a different width than row 0")]
    RaggedRow { row: usize },
    /// A character which does not encode any [`Cell`].
    #[error("unknown glyph {glyph:?} at {location}")]
    UnknownGlyph { glyph: char, location: Location },
}

/// A fixed-size rectangular array of [`Cell`]s.
///
/// Rendered and parsed one row per line: `.` empty, `O` target, `0`-`7` an emitter facing that direction,
/// `a`-`h` a redirect node facing direction 0-7.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    // width, height
    dims: (Dimension, Dimension),
    // row major
    cells: Array2<Cell>,
}

impl Grid {
    /// An empty grid with the specified dimensions, specified in `(x, y)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::from_shape_simple_fn((dims.1.get(), dims.0.get()), Cell::default),
        }
    }

    /// Width and height.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// Whether `location` lies on this grid.
    #[inline]
    pub fn contains(&self, location: Location) -> bool {
        location.0 < self.dims.0.get() && location.1 < self.dims.1.get()
    }

    /// The cell at `location`, or [`None`] outside the grid.
    pub fn cell_at(&self, location: Location) -> Option<Cell> {
        self.cells.get(location.as_index()).copied()
    }

    /// Overwrite the cell at `location`.
    ///
    /// Writing outside the grid is refused with [`GridError::OutOfBounds`] and leaves the grid untouched.
    pub fn set_cell(&mut self, location: Location, cell: Cell) -> Result<(), GridError> {
        match self.cells.get_mut(location.as_index()) {
            Some(slot) => {
                *slot = cell;
                Ok(())
            }
            None => Err(GridError::OutOfBounds(location)),
        }
    }

    /// Number of cells currently holding a [`Cell::Target`].
    pub fn count_targets(&self) -> usize {
        self.cells.iter().filter(|cell| **cell == Cell::Target).count()
    }

    /// Every cell with its location, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Location, Cell)> + '_ {
        self.cells.indexed_iter().map(|(index, cell)| (Location::from(index), *cell))
    }

    /// Locations of all redirect nodes, row by row.
    pub fn redirect_nodes(&self) -> Vec<Location> {
        self.cells()
            .filter(|(_, cell)| matches!(cell, Cell::RedirectNode { .. }))
            .map(|(location, _)| location)
            .collect_vec()
    }

    /// Turn the emitter or redirect node at `location` as a player click would, returning the new cell.
    ///
    /// See [`Cell::rotated`]; other cells are left as they are.
    pub fn rotate_at(&mut self, location: Location) -> Result<Cell, GridError> {
        let slot = self.cells.get_mut(location.as_index()).ok_or(GridError::OutOfBounds(location))?;
        *slot = slot.rotated();
        Ok(*slot)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.cells.nrows() * (self.cells.ncols() + 1));

        for row in self.cells.rows() {
            out.extend(row.iter().map(Cell::glyph));
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}

impl FromStr for Grid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect_vec())
            .collect_vec();

        let width = rows.first().map(Vec::len).and_then(NonZero::new).ok_or(ParseGridError::Empty)?;
        let height = NonZero::new(rows.len()).ok_or(ParseGridError::Empty)?;

        if let Some((row, _)) = rows.iter().find_position(|row| row.len() != width.get()) {
            return Err(ParseGridError::RaggedRow { row });
        }

        let mut grid = Self::with_dims((width, height));
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.iter().enumerate() {
                let location = Location(x, y);
                let cell = Cell::from_glyph(*glyph).ok_or(ParseGridError::UnknownGlyph { glyph: *glyph, location })?;
                grid.cells[location.as_index()] = cell;
            }
        }

        Ok(grid)
    }
}
