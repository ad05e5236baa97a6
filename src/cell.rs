use crate::direction::Direction;

/// The contents of one grid location as seen by the tracer.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Cell {
    /// Light passes straight through.
    #[default]
    Empty,
    /// Light passes straight through, destroying the target the first time any beam reaches it.
    Target,
    /// A beam origin. Re-entering an emitter mid-path turns the beam to the emitter's direction.
    Emitter { direction: Direction },
    /// Light entering this cell leaves travelling in the node's own direction.
    RedirectNode { direction: Direction },
}

impl Cell {
    /// The direction a beam leaves this cell in, if the cell turns beams at all.
    pub fn facing(&self) -> Option<Direction> {
        match self {
            Cell::Emitter { direction } | Cell::RedirectNode { direction } => Some(*direction),
            Cell::Empty | Cell::Target => None,
        }
    }

    /// The cell after one interactive turn: emitters turn 90°, redirect nodes 45°.
    pub fn rotated(&self) -> Self {
        match self {
            Cell::Emitter { direction } => Cell::Emitter { direction: direction.rotated(2) },
            Cell::RedirectNode { direction } => Cell::RedirectNode { direction: direction.rotated(1) },
            other => *other,
        }
    }

    pub(crate) fn glyph(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Target => 'O',
            Cell::Emitter { direction } => (b'0' + direction.index()) as char,
            Cell::RedirectNode { direction } => (b'a' + direction.index()) as char,
        }
    }

    pub(crate) fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Cell::Empty),
            'O' => Some(Cell::Target),
            '0'..='7' => Direction::from_index(glyph as u8 - b'0').map(|direction| Cell::Emitter { direction }),
            'a'..='h' => Direction::from_index(glyph as u8 - b'a').map(|direction| Cell::RedirectNode { direction }),
            _ => None,
        }
    }
}
