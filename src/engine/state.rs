//! Match state values: identity, lifecycle, outcome, history, snapshots.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{BoardSnapshot, Position};
use crate::capture::CaptureDiff;
use crate::cards::{CardId, HandCard, InstanceId};
use crate::core::{PlayerId, PlayerMap, Seat};

/// Match identifier, assigned by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub String);

impl MatchId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match({})", self.0)
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Lifecycle status.
///
/// `Pending → Active → {Completed, Abandoned}`. Both terminal states are
/// frozen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Pending,
    Active,
    Completed,
    Abandoned,
}

impl MatchStatus {
    /// Is the match over?
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Abandoned)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Active => "active",
            MatchStatus::Completed => "completed",
            MatchStatus::Abandoned => "abandoned",
        };
        f.write_str(name)
    }
}

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Single winner.
    Winner(Seat),
    /// Equal cell counts.
    Draw,
}

impl MatchOutcome {
    /// Decide the outcome from cell counts.
    #[must_use]
    pub fn from_scores(scores: &PlayerMap<usize>) -> Self {
        let one = scores[Seat::One];
        let two = scores[Seat::Two];
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => MatchOutcome::Winner(Seat::One),
            std::cmp::Ordering::Less => MatchOutcome::Winner(Seat::Two),
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }

    /// Check if a seat won.
    #[must_use]
    pub fn is_winner(&self, seat: Seat) -> bool {
        matches!(self, MatchOutcome::Winner(s) if *s == seat)
    }

    /// The winning seat, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Seat> {
        match self {
            MatchOutcome::Winner(seat) => Some(*seat),
            MatchOutcome::Draw => None,
        }
    }
}

/// One applied move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based move number.
    pub sequence: u32,
    pub player: PlayerId,
    pub seat: Seat,
    pub position: Position,
    pub instance_id: InstanceId,
    pub placed_card: CardId,
    /// Everything the placement flipped.
    pub captures: CaptureDiff,
    /// Caller-supplied time of the move, in milliseconds since the Unix epoch.
    pub played_at: Option<u64>,
}

impl MoveRecord {
    /// Positions flipped by this move, in resolution order.
    #[must_use]
    pub fn captured_positions(&self) -> SmallVec<[Position; 8]> {
        self.captures.positions().collect()
    }

    /// New owner of every flipped position.
    #[must_use]
    pub fn new_owners(&self) -> SmallVec<[(Position, Seat); 8]> {
        self.captures
            .captures()
            .iter()
            .map(|c| (c.position, c.new_owner))
            .collect()
    }
}

/// Frozen view of a match for observers.
///
/// Cloning is cheap: the board sits behind an `Arc` and the hands and
/// history are persistent vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchSnapshot {
    pub id: MatchId,
    pub players: PlayerMap<PlayerId>,
    pub status: MatchStatus,
    /// Seat to move, while the match is active.
    pub turn: Option<Seat>,
    pub board: BoardSnapshot,
    pub hands: PlayerMap<Vector<HandCard>>,
    pub scores: PlayerMap<usize>,
    pub history: Vector<MoveRecord>,
    pub outcome: Option<MatchOutcome>,
    pub started_at: Option<u64>,
    pub ended_at: Option<u64>,
}

impl MatchSnapshot {
    /// Number of moves applied so far.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Cards left in a seat's hand.
    #[must_use]
    pub fn hand_size(&self, seat: Seat) -> usize {
        self.hands[seat].len()
    }
}
