//! Notifications for the transport collaborator.
//!
//! The engine returns a `MoveApplied` from every successful move; the
//! registry wraps it and the lifecycle transitions in `MatchEvent`s and
//! hands them to an `EventSink` in the order they happened.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::mpsc::Sender;
use tracing::debug;

use super::state::{MatchId, MatchOutcome, MatchStatus, MoveRecord};
use crate::board::{Position, BOARD_CELLS};
use crate::cards::{CardId, Element, InstanceId};
use crate::core::{PlayerId, PlayerMap, Seat};

/// One successful placement, as seen by other participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveApplied {
    pub match_id: MatchId,
    pub sequence: u32,
    pub player: PlayerId,
    pub seat: Seat,
    pub position: Position,
    pub instance_id: InstanceId,
    pub placed_card: CardId,
    pub captured_positions: SmallVec<[Position; 8]>,
    pub new_owners: SmallVec<[(Position, Seat); 8]>,
    /// Seat to move next; `None` once the match is over.
    pub next_turn: Option<Seat>,
    pub status: MatchStatus,
    pub played_at: Option<u64>,
}

impl MoveApplied {
    pub(crate) fn from_record(
        match_id: MatchId,
        record: &MoveRecord,
        next_turn: Option<Seat>,
        status: MatchStatus,
    ) -> Self {
        Self {
            match_id,
            sequence: record.sequence,
            player: record.player.clone(),
            seat: record.seat,
            position: record.position,
            instance_id: record.instance_id,
            placed_card: record.placed_card,
            captured_positions: record.captured_positions(),
            new_owners: record.new_owners(),
            next_turn,
            status,
            played_at: record.played_at,
        }
    }
}

/// Everything a match announces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    Started {
        match_id: MatchId,
        players: PlayerMap<PlayerId>,
        first_turn: Option<Seat>,
        cell_elements: [Option<Element>; BOARD_CELLS],
    },
    MoveApplied(MoveApplied),
    Completed {
        match_id: MatchId,
        outcome: MatchOutcome,
        scores: PlayerMap<usize>,
    },
    Abandoned {
        match_id: MatchId,
    },
}

impl MatchEvent {
    /// The match this event belongs to.
    #[must_use]
    pub fn match_id(&self) -> &MatchId {
        match self {
            MatchEvent::Started { match_id, .. }
            | MatchEvent::Completed { match_id, .. }
            | MatchEvent::Abandoned { match_id } => match_id,
            MatchEvent::MoveApplied(applied) => &applied.match_id,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            MatchEvent::Started { .. } => "started",
            MatchEvent::MoveApplied(_) => "move_applied",
            MatchEvent::Completed { .. } => "completed",
            MatchEvent::Abandoned { .. } => "abandoned",
        }
    }
}

/// Outbound channel to the transport layer.
///
/// Publishing must not fail the move that produced the event; sinks that
/// can fail log and drop.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: MatchEvent);
}

impl EventSink for Sender<MatchEvent> {
    fn publish(&self, event: MatchEvent) {
        let kind = event.kind();
        let match_id = event.match_id().clone();
        if self.send(event).is_err() {
            debug!(match_id = %match_id, kind, "event receiver dropped");
        }
    }
}
