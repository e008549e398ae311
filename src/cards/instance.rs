//! Card instances - a card dealt into a match.
//!
//! Every card dealt into a hand receives an `InstanceId` when the match
//! starts. Placing it on the board creates the `CardInstance`, which keeps
//! that id for the rest of the match.
//!
//! ## Ownership
//!
//! - `original_owner`: the seat that placed the card. Never changes.
//! - `current_owner`: the seat that controls the cell. Reassigned by captures.

use serde::{Deserialize, Serialize};

use super::definition::Card;
use crate::core::player::Seat;

/// Identifier of a card copy within one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// A card that has not been placed yet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandCard {
    /// Id the placed instance will carry.
    pub instance_id: InstanceId,

    /// The card itself.
    pub card: Card,
}

impl HandCard {
    /// Create a hand entry.
    #[must_use]
    pub fn new(instance_id: InstanceId, card: Card) -> Self {
        Self { instance_id, card }
    }
}

/// A card on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique id within the match.
    pub id: InstanceId,

    /// The card definition.
    pub card: Card,

    /// Seat that placed the card.
    pub original_owner: Seat,

    /// Seat that currently controls the card.
    pub current_owner: Seat,
}

impl CardInstance {
    /// Create a freshly placed instance owned by `owner`.
    #[must_use]
    pub fn new(id: InstanceId, card: Card, owner: Seat) -> Self {
        Self {
            id,
            card,
            original_owner: owner,
            current_owner: owner,
        }
    }

    /// Place a hand card for `owner`.
    #[must_use]
    pub fn from_hand(hand_card: HandCard, owner: Seat) -> Self {
        Self::new(hand_card.instance_id, hand_card.card, owner)
    }

    /// Has this card changed hands since it was placed?
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.original_owner != self.current_owner
    }

    /// Reassign control. Only capture application calls this.
    pub(crate) fn set_owner(&mut self, owner: Seat) {
        self.current_owner = owner;
    }
}
