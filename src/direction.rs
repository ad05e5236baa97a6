use strum::{FromRepr, VariantArray};

/// One of the eight unit steps a beam may travel along.
///
/// Consecutive discriminants rotate by 45°, so direction arithmetic is modulo [`Direction::COUNT`].
/// The `y` axis grows downward, matching the row order of a [`Grid`](crate::Grid).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, FromRepr)]
#[repr(u8)]
pub enum Direction {
    #[default]
    East = 0,
    SouthEast = 1,
    South = 2,
    SouthWest = 3,
    West = 4,
    NorthWest = 5,
    North = 6,
    NorthEast = 7,
}

impl Direction {
    /// Number of distinct directions.
    pub const COUNT: u8 = 8;

    /// The `(dx, dy)` offset of a single step in this direction.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
        }
    }

    /// The integer in `0..8` identifying this direction.
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Decode a direction from its integer, or [`None`] if `index` is not in `0..8`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }

    /// Turn clockwise (with `y` pointing down) by `steps` eighths of a circle.
    pub fn rotated(&self, steps: u8) -> Self {
        Self::VARIANTS[((self.index() + steps % Self::COUNT) % Self::COUNT) as usize]
    }
}
