//! Match engine errors.
//!
//! Every rejected call leaves the match exactly as it was.

use thiserror::Error;

use super::state::MatchStatus;
use crate::board::BoardError;
use crate::cards::InstanceId;
use crate::core::{ConfigError, PlayerId, Seat};
use crate::deck::DeckId;

/// Why a placement was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMove {
    #[error("card {0} is not in the player's hand")]
    CardNotInHand(InstanceId),
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("cannot {operation} a match that is {status}")]
    IllegalState {
        operation: &'static str,
        status: MatchStatus,
    },

    #[error("{player} moved out of turn ({expected} is to move)")]
    NotYourTurn { player: PlayerId, expected: Seat },

    #[error("invalid move: {0}")]
    InvalidMove(#[from] InvalidMove),

    #[error("{0} is not playing in this match")]
    NotAParticipant(PlayerId),

    #[error("deck {deck} for {seat} belongs to {owner}, expected {expected}")]
    DeckOwnerMismatch {
        seat: Seat,
        deck: DeckId,
        owner: PlayerId,
        expected: PlayerId,
    },

    #[error("{0} cannot occupy both seats")]
    DuplicatePlayer(PlayerId),

    #[error("invalid match configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl From<BoardError> for MatchError {
    fn from(err: BoardError) -> Self {
        MatchError::InvalidMove(InvalidMove::Board(err))
    }
}
