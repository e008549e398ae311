//! Capture resolution.
//!
//! Given a board on which a card was just placed, compute every cell the
//! placing seat captures:
//!
//! 1. **Direct**: each opponent-owned neighbor whose facing value is
//!    strictly lower than the placed card's facing value flips.
//! 2. **Chain**: cards flipped at one level become attackers for the next.
//!    A level compares against ownership as it stood when the previous
//!    level finished, so the result does not depend on evaluation order.
//!    Propagation stops at the first level that flips nothing.
//!
//! Ties never capture. A cell flipped earlier in the move is never a target
//! again. The resolver only reads the board; the engine applies the
//! returned `CaptureDiff` afterwards in one step.
//!
//! ## Elemental cells
//!
//! On a cell with an affinity, a card of the same element gets +1 on every
//! side and any other card (including element-less ones) gets -1. Plain
//! cells leave values untouched. Boards built without elements therefore
//! compare declared values only.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use tracing::debug;

use crate::board::{Board, BoardError, Direction, Position, BOARD_CELLS};
use crate::cards::CardInstance;
use crate::core::Seat;

/// One flipped cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capture {
    /// The flipped cell.
    pub position: Position,
    /// Owner before the flip.
    pub previous_owner: Seat,
    /// Owner after the flip (the placing seat).
    pub new_owner: Seat,
    /// Propagation level: 1 for direct captures, 2+ for chain captures.
    pub level: u8,
}

/// Every capture caused by one placement, ordered by level then arena index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureDiff {
    captures: SmallVec<[Capture; 8]>,
}

impl CaptureDiff {
    /// No captures.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// All captures.
    #[must_use]
    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    /// Captured positions in resolution order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.captures.iter().map(|c| c.position)
    }

    /// Does the diff flip `pos`?
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.captures.iter().any(|c| c.position == pos)
    }

    /// Captures made directly by the placed card.
    pub fn direct(&self) -> impl Iterator<Item = &Capture> {
        self.captures.iter().filter(|c| c.level == 1)
    }

    /// Captures made by chain propagation.
    pub fn chained(&self) -> impl Iterator<Item = &Capture> {
        self.captures.iter().filter(|c| c.level > 1)
    }

    /// Deepest propagation level reached (0 when nothing flipped).
    #[must_use]
    pub fn depth(&self) -> u8 {
        self.captures.iter().map(|c| c.level).max().unwrap_or(0)
    }

    /// Write the new owners onto `board`.
    pub(crate) fn apply_to(&self, board: &mut Board) -> Result<(), BoardError> {
        for capture in &self.captures {
            board.set_owner(capture.position, capture.new_owner)?;
        }
        Ok(())
    }
}

/// Stateless capture resolver.
pub struct CaptureResolver;

impl CaptureResolver {
    /// Resolve the captures caused by the card at `placed`.
    ///
    /// An empty or out-of-range `placed` cell yields an empty diff.
    #[must_use]
    pub fn resolve(board: &Board, placed: Position) -> CaptureDiff {
        let captor = match occupant(board, placed) {
            Some(instance) => instance.current_owner,
            None => return CaptureDiff::empty(),
        };
        let defender_seat = captor.opponent();

        let mut owners: [Option<Seat>; BOARD_CELLS] = board.owners();
        let mut frontier: SmallVec<[Position; 8]> = smallvec![placed];
        let mut diff = CaptureDiff::empty();
        let mut level: u8 = 1;

        while !frontier.is_empty() {
            let mut flipped: SmallVec<[Position; 8]> = SmallVec::new();

            for &source in &frontier {
                let Some(attacker) = occupant(board, source) else {
                    continue;
                };
                let Ok(neighbors) = board.neighbors(source) else {
                    continue;
                };

                for neighbor in neighbors {
                    let Ok(index) = neighbor.position.index() else {
                        continue;
                    };
                    if owners[index] != Some(defender_seat) || flipped.contains(&neighbor.position) {
                        continue;
                    }
                    let Some(defender) = occupant(board, neighbor.position) else {
                        continue;
                    };

                    let attack = Self::effective_value(board, source, attacker, neighbor.direction);
                    let defense = Self::effective_value(
                        board,
                        neighbor.position,
                        defender,
                        neighbor.direction.opposite(),
                    );
                    if attack > defense {
                        flipped.push(neighbor.position);
                    }
                }
            }

            flipped.sort_unstable();
            for &pos in &flipped {
                if let Ok(index) = pos.index() {
                    owners[index] = Some(captor);
                }
                diff.captures.push(Capture {
                    position: pos,
                    previous_owner: defender_seat,
                    new_owner: captor,
                    level,
                });
            }

            frontier = flipped;
            level = level.saturating_add(1);
        }

        debug!(
            placed = %placed,
            captor = %captor,
            captures = diff.len(),
            depth = diff.depth(),
            "resolved captures"
        );

        diff
    }

    /// The value `instance` at `pos` fights with on its `side`.
    ///
    /// Declared value plus the cell's elemental modifier, never below 0.
    #[must_use]
    pub fn effective_value(
        board: &Board,
        pos: Position,
        instance: &CardInstance,
        side: Direction,
    ) -> i16 {
        let declared = i16::from(instance.card.values.facing(side));
        let modifier = match board.cell_element(pos).ok().flatten() {
            None => 0,
            Some(cell) if instance.card.element == Some(cell) => 1,
            Some(_) => -1,
        };
        (declared + modifier).max(0)
    }
}

fn occupant(board: &Board, pos: Position) -> Option<&CardInstance> {
    board.get(pos).ok().flatten()
}
