//! Board coordinates and compass directions.
//!
//! Cells are addressed by `(row, col)` with row 0 at the top. The 9 cells
//! map to arena indices `row * 3 + col`:
//!
//! ```text
//! 0 1 2
//! 3 4 5
//! 6 7 8
//! ```
//!
//! A `Position` may be constructed out of range; board operations reject it
//! with `BoardError::OutOfBounds`.

use serde::{Deserialize, Serialize};

use super::grid::BoardError;

/// Cells per side.
pub const BOARD_SIDE: u8 = 3;

/// Total cells.
pub const BOARD_CELLS: usize = 9;

/// Orthogonal direction from one cell to its neighbor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The direction pointing back.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    const fn offset(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
}

/// A cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Create a position. Not bounds-checked.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Is this position on the board?
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.row < BOARD_SIDE && self.col < BOARD_SIDE
    }

    /// Arena index of this position.
    pub fn index(self) -> Result<usize, BoardError> {
        if self.in_bounds() {
            Ok(usize::from(self.row) * usize::from(BOARD_SIDE) + usize::from(self.col))
        } else {
            Err(BoardError::OutOfBounds(self))
        }
    }

    /// Position for an arena index, if the index is on the board.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_CELLS {
            let side = usize::from(BOARD_SIDE);
            Some(Self::new((index / side) as u8, (index % side) as u8))
        } else {
            None
        }
    }

    /// The adjacent position in `direction`, if it is on the board.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        if !self.in_bounds() {
            return None;
        }
        let (dr, dc) = direction.offset();
        let row = i16::from(self.row) + i16::from(dr);
        let col = i16::from(self.col) + i16::from(dc);
        let side = i16::from(BOARD_SIDE);
        if (0..side).contains(&row) && (0..side).contains(&col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// All 9 positions in arena order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_CELLS).filter_map(Position::from_index)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
