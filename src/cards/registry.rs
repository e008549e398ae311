//! Card registry for definition lookup.
//!
//! The `CardRegistry` holds the card records handed over by the collection
//! store and turns deck records (lists of card references) into `Deck`s.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use super::definition::{Card, CardId};
use crate::deck::{Deck, DeckId, DeckRecord};

/// Registry lookup failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardRegistryError {
    #[error("{0} is already registered")]
    DuplicateCard(CardId),
    #[error("{card} referenced by {deck} is not registered")]
    UnknownCard { deck: DeckId, card: CardId },
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use grid_duel::cards::{Card, CardId, CardRegistry, CardValues};
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(Card::new(CardId::new(1), "Ashen Knight", CardValues::uniform(4)))
///     .unwrap();
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Ashen Knight");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Card>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    pub fn register(&mut self, card: Card) -> Result<(), CardRegistryError> {
        if self.cards.contains_key(&card.id) {
            return Err(CardRegistryError::DuplicateCard(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Register every card from an iterator, stopping at the first duplicate.
    pub fn register_all(
        &mut self,
        cards: impl IntoIterator<Item = Card>,
    ) -> Result<(), CardRegistryError> {
        cards.into_iter().try_for_each(|card| self.register(card))
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Resolve a deck record's card references, preserving their order.
    pub fn resolve_deck(&self, record: &DeckRecord) -> Result<Deck, CardRegistryError> {
        let cards = record
            .card_ids
            .iter()
            .map(|&id| {
                self.get(id).cloned().ok_or_else(|| CardRegistryError::UnknownCard {
                    deck: record.id.clone(),
                    card: id,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(deck = %record.id, cards = cards.len(), "resolved deck record");

        Ok(Deck::new(record.id.clone(), record.owner.clone(), cards).with_name(record.name.clone()))
    }
}
