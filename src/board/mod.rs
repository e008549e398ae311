//! Board system: the fixed 3×3 grid.
//!
//! - `Position` / `Direction`: coordinates and compass directions
//! - `Board`: occupancy, neighbor lookup, optional cell elements
//! - `BoardSnapshot`: immutable copy handed to observers

pub mod grid;
pub mod position;

pub use grid::{Board, BoardError, BoardSnapshot, Neighbor};
pub use position::{Direction, Position, BOARD_CELLS, BOARD_SIDE};
