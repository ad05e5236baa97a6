use std::fmt::{Display, Formatter};

use ndarray::Ix;

use crate::direction::Direction;

pub(crate) type Coord = usize;

/// A location `(x, y)` on a grid. The top left corner is `Location(0, 0)`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Ix, Ix) {
        (self.1, self.0)
    }

    /// Offset this location, wrapping on underflow so that stepping off the low edge yields a location no grid contains.
    pub fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// The neighboring location one step away in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        self.offset_by(direction.delta())
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}
