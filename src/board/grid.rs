//! The 3×3 board.
//!
//! `Board` tracks cell occupancy and, when the elemental rule is enabled,
//! each cell's elemental affinity. Cells are only ever filled, never
//! emptied; captures reassign the occupant's owner in place.
//!
//! Mutation is reserved to the match engine. Everyone else reads a
//! `BoardSnapshot`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;
use thiserror::Error;

use super::position::{Direction, Position, BOARD_CELLS};
use crate::cards::{CardInstance, Element};
use crate::core::Seat;

/// Board operation failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
    #[error("cell {0} is already occupied")]
    CellOccupied(Position),
}

/// An orthogonal neighbor of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighbor {
    /// Direction from the queried cell to this neighbor.
    pub direction: Direction,
    /// The neighbor's position.
    pub position: Position,
}

/// Fixed 9-cell grid.
///
/// ## Example
///
/// ```
/// use grid_duel::board::{Board, BoardError, Position};
/// use grid_duel::cards::{Card, CardId, CardInstance, CardValues, InstanceId};
/// use grid_duel::core::Seat;
///
/// let mut board = Board::new();
/// let card = Card::new(CardId::new(1), "Wisp", CardValues::uniform(2));
///
/// board.place(Position::new(1, 1), CardInstance::new(InstanceId(0), card.clone(), Seat::One))?;
/// assert!(!board.is_empty(Position::new(1, 1))?);
///
/// let again = board.place(Position::new(1, 1), CardInstance::new(InstanceId(1), card, Seat::Two));
/// assert_eq!(again, Err(BoardError::CellOccupied(Position::new(1, 1))));
/// # Ok::<(), BoardError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<CardInstance>; BOARD_CELLS],
    elements: [Option<Element>; BOARD_CELLS],
}

impl Board {
    /// Create an empty board with plain cells.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty board with the given cell affinities, in arena order.
    #[must_use]
    pub fn with_elements(elements: [Option<Element>; BOARD_CELLS]) -> Self {
        Self {
            cells: Default::default(),
            elements,
        }
    }

    /// Is the cell empty?
    pub fn is_empty(&self, pos: Position) -> Result<bool, BoardError> {
        Ok(self.cells[pos.index()?].is_none())
    }

    /// The occupant of a cell.
    pub fn get(&self, pos: Position) -> Result<Option<&CardInstance>, BoardError> {
        Ok(self.cells[pos.index()?].as_ref())
    }

    /// Elemental affinity of a cell.
    pub fn cell_element(&self, pos: Position) -> Result<Option<Element>, BoardError> {
        Ok(self.elements[pos.index()?])
    }

    /// Affinity of every cell, in arena order.
    #[must_use]
    pub fn elements(&self) -> [Option<Element>; BOARD_CELLS] {
        self.elements
    }

    /// Put a card into an empty cell.
    pub fn place(&mut self, pos: Position, instance: CardInstance) -> Result<(), BoardError> {
        let index = pos.index()?;
        let cell = &mut self.cells[index];
        if cell.is_some() {
            return Err(BoardError::CellOccupied(pos));
        }
        *cell = Some(instance);
        Ok(())
    }

    /// Orthogonal neighbors that exist on the grid, clockwise from north.
    pub fn neighbors(&self, pos: Position) -> Result<SmallVec<[Neighbor; 4]>, BoardError> {
        pos.index()?;
        Ok(Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                pos.step(direction)
                    .map(|position| Neighbor { direction, position })
            })
            .collect())
    }

    /// Reassign the owner of an occupied cell.
    ///
    /// Returns the previous owner, or `None` if the cell is empty.
    pub(crate) fn set_owner(&mut self, pos: Position, owner: Seat) -> Result<Option<Seat>, BoardError> {
        let index = pos.index()?;
        Ok(self.cells[index].as_mut().map(|instance| {
            let previous = instance.current_owner;
            instance.set_owner(owner);
            previous
        }))
    }

    /// Current owner of each cell, in arena order.
    #[must_use]
    pub fn owners(&self) -> [Option<Seat>; BOARD_CELLS] {
        let mut owners = [None; BOARD_CELLS];
        for (owner, cell) in owners.iter_mut().zip(self.cells.iter()) {
            *owner = cell.as_ref().map(|instance| instance.current_owner);
        }
        owners
    }

    /// Iterate over (position, occupant) in arena order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<&CardInstance>)> {
        Position::all().zip(self.cells.iter().map(Option::as_ref))
    }

    /// Iterate over placed cards.
    pub fn occupants(&self) -> impl Iterator<Item = (Position, &CardInstance)> {
        self.cells()
            .filter_map(|(pos, cell)| cell.map(|instance| (pos, instance)))
    }

    /// Number of cells a seat controls.
    #[must_use]
    pub fn owned_by(&self, seat: Seat) -> usize {
        self.occupants()
            .filter(|(_, instance)| instance.current_owner == seat)
            .count()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        BOARD_CELLS - self.occupied_count()
    }

    /// Are all cells occupied?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupied_count() == BOARD_CELLS
    }

    /// Empty positions in arena order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells()
            .filter(|(_, cell)| cell.is_none())
            .map(|(pos, _)| pos)
    }

    /// Immutable copy for history and observers.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot(Arc::new(self.clone()))
    }
}

/// Read-only, cheaply clonable board copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot(Arc<Board>);

impl std::ops::Deref for BoardSnapshot {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
