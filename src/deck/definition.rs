//! Decks and deck records.
//!
//! A `DeckRecord` is what the collection store hands over: an owner and an
//! ordered list of card references. `CardRegistry::resolve_deck` turns it
//! into a `Deck` holding the cards themselves.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::core::PlayerId;

/// Deck identifier assigned by the collection store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckId(pub String);

impl DeckId {
    /// Create a new deck ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for DeckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deck({})", self.0)
    }
}

/// Deck as stored by the collection collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    pub id: DeckId,
    pub owner: PlayerId,
    pub name: String,
    /// Ordered card references. Repeats mean multiple copies.
    pub card_ids: Vec<CardId>,
}

/// An ordered collection of cards owned by one player.
///
/// ```
/// use grid_duel::cards::{Card, CardId, CardValues};
/// use grid_duel::core::PlayerId;
/// use grid_duel::deck::{Deck, DeckId};
///
/// let cards = vec![
///     Card::new(CardId::new(1), "A", CardValues::uniform(2)),
///     Card::new(CardId::new(2), "B", CardValues::uniform(3)),
/// ];
/// let deck = Deck::new(DeckId::new("d1"), PlayerId::new("alice"), cards);
///
/// assert_eq!(deck.len(), 2);
/// assert_eq!(deck.power_rating(), 8 + 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    id: DeckId,
    owner: PlayerId,
    name: String,
    cards: Vec<Card>,
}

impl Deck {
    /// Create a deck. The name defaults to the id.
    #[must_use]
    pub fn new(id: DeckId, owner: PlayerId, cards: Vec<Card>) -> Self {
        let name = id.0.clone();
        Self {
            id,
            owner,
            name,
            cards,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> &DeckId {
        &self.id
    }

    #[must_use]
    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cards in deck order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Sum of the cards' power ratings.
    ///
    /// Widened to `u64`: collection records may rate a single card anywhere
    /// in `u32`.
    #[must_use]
    pub fn power_rating(&self) -> u64 {
        self.cards.iter().map(|card| u64::from(card.power_rating())).sum()
    }
}
