//! Persistable match record.
//!
//! `MatchRecord` is the complete state of a match, written to the store on
//! every status transition and after every applied move. Bytes are bincode,
//! prefixed in-struct by a format version.

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{MatchId, MatchOutcome, MatchStatus, MoveRecord};
use crate::board::Board;
use crate::cards::HandCard;
use crate::core::{ConfigError, MatchConfig, PlayerId, PlayerMap, Seat};

/// Current record format.
pub const RECORD_VERSION: u16 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to encode match record: {0}")]
    Encode(bincode::Error),
    #[error("failed to decode match record: {0}")]
    Decode(bincode::Error),
    #[error("unsupported record version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("inconsistent match record: {0}")]
    Inconsistent(String),
    #[error("invalid match configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Full state of one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub version: u16,
    pub id: MatchId,
    pub players: PlayerMap<PlayerId>,
    pub config: MatchConfig,
    pub status: MatchStatus,
    pub board: Board,
    pub hands: PlayerMap<Vector<HandCard>>,
    pub turn: Seat,
    pub history: Vector<MoveRecord>,
    pub outcome: Option<MatchOutcome>,
    /// Caller-supplied start and end times, milliseconds since the Unix epoch.
    pub started_at: Option<u64>,
    pub ended_at: Option<u64>,
}

impl MatchRecord {
    /// Encode for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        bincode::serialize(self).map_err(RecordError::Encode)
    }

    /// Decode stored bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        let record: Self = bincode::deserialize(bytes).map_err(RecordError::Decode)?;
        if record.version != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion {
                found: record.version,
                expected: RECORD_VERSION,
            });
        }
        Ok(record)
    }

    /// Check the structural invariants a live match always satisfies.
    pub fn check(&self) -> Result<(), RecordError> {
        self.config.validate()?;

        let placed = self.board.occupied_count();
        if placed != self.history.len() {
            return Err(RecordError::Inconsistent(format!(
                "{placed} cards on the board but {} moves in history",
                self.history.len()
            )));
        }
        if self.players[Seat::One] == self.players[Seat::Two] {
            return Err(RecordError::Inconsistent(format!(
                "{} occupies both seats",
                self.players[Seat::One]
            )));
        }
        match (self.status, self.outcome) {
            (MatchStatus::Completed, None) => {
                return Err(RecordError::Inconsistent("completed without an outcome".into()));
            }
            (MatchStatus::Pending | MatchStatus::Active | MatchStatus::Abandoned, Some(_)) => {
                return Err(RecordError::Inconsistent(format!(
                    "{} match carries an outcome",
                    self.status
                )));
            }
            _ => {}
        }
        if self.ended_at.is_some() && !self.status.is_terminal() {
            return Err(RecordError::Inconsistent(format!(
                "{} match carries an end time",
                self.status
            )));
        }
        if self.status == MatchStatus::Pending && placed > 0 {
            return Err(RecordError::Inconsistent("pending match has cards on the board".into()));
        }
        if self.status == MatchStatus::Active && self.hands[self.turn].is_empty() {
            return Err(RecordError::Inconsistent(format!(
                "{} is to move with an empty hand",
                self.turn
            )));
        }
        Ok(())
    }
}
