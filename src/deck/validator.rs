//! Deck legality checks.
//!
//! `DeckValidator::validate` never fails: it evaluates every rule and
//! returns the complete list of violations and warnings so a deck builder
//! can show all problems at once. Only errors block match entry.
//!
//! `DeckValidator::accept` is the only way to obtain a `ValidatedDeck`,
//! which is what `MatchEngine::start` requires.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::definition::Deck;
use crate::cards::{CardId, Element, Rarity};

/// Limits a deck must respect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConstraints {
    /// Fewest cards allowed.
    pub min_cards: usize,

    /// Most cards allowed.
    pub max_cards: usize,

    /// Ceiling on the summed power rating.
    pub max_power_rating: u32,

    /// Copies of a single card id allowed in one deck.
    pub max_copies_per_card: usize,

    /// Elements a card may carry. `None` allows every element.
    /// Element-less cards are always allowed.
    pub allowed_elements: Option<Vec<Element>>,

    /// Rarities a card may have. `None` allows every rarity.
    pub allowed_rarities: Option<Vec<Rarity>>,
}

impl Default for DeckConstraints {
    fn default() -> Self {
        Self {
            min_cards: 5,
            max_cards: 8,
            max_power_rating: 1000,
            max_copies_per_card: 2,
            allowed_elements: None,
            allowed_rarities: None,
        }
    }
}

impl DeckConstraints {
    /// Set the allowed card count range.
    #[must_use]
    pub fn with_card_range(mut self, min: usize, max: usize) -> Self {
        self.min_cards = min;
        self.max_cards = max;
        self
    }

    #[must_use]
    pub fn with_max_power_rating(mut self, max: u32) -> Self {
        self.max_power_rating = max;
        self
    }

    #[must_use]
    pub fn with_max_copies(mut self, max: usize) -> Self {
        self.max_copies_per_card = max;
        self
    }

    #[must_use]
    pub fn with_allowed_elements(mut self, elements: impl Into<Vec<Element>>) -> Self {
        self.allowed_elements = Some(elements.into());
        self
    }

    #[must_use]
    pub fn with_allowed_rarities(mut self, rarities: impl Into<Vec<Rarity>>) -> Self {
        self.allowed_rarities = Some(rarities.into());
        self
    }
}

/// A rule the deck breaks. Blocks match entry.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckViolation {
    #[error("Minimum {min} cards required (deck has {count})")]
    TooFewCards { count: usize, min: usize },
    #[error("Maximum {max} cards allowed (deck has {count})")]
    TooManyCards { count: usize, max: usize },
    #[error("Maximum {max} copies of each card allowed ({card} appears {count} times)")]
    TooManyCopies { card: CardId, count: usize, max: usize },
    #[error("Deck power rating ({total}) exceeds maximum ({max})")]
    PowerRatingExceeded { total: u64, max: u32 },
    #[error("{card} has element {element}, which is not allowed")]
    ElementNotAllowed { card: CardId, element: Element },
    #[error("{card} has rarity {rarity}, which is not allowed")]
    RarityNotAllowed { card: CardId, rarity: Rarity },
}

/// Advice that never blocks match entry.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckWarning {
    #[error("Consider including cards of different elements for better synergy ({distinct} distinct)")]
    LowElementDiversity { distinct: usize },
}

/// Complete validation outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckValidation {
    pub errors: Vec<DeckViolation>,
    pub warnings: Vec<DeckWarning>,
}

impl DeckValidation {
    /// True iff there are no errors. Warnings do not count.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A deck that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedDeck {
    deck: Deck,
    warnings: Vec<DeckWarning>,
}

impl ValidatedDeck {
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Warnings produced during validation.
    #[must_use]
    pub fn warnings(&self) -> &[DeckWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn into_deck(self) -> Deck {
        self.deck
    }
}

/// Stateless deck validator.
pub struct DeckValidator;

impl DeckValidator {
    /// Check a deck against every constraint.
    #[must_use]
    pub fn validate(deck: &Deck, constraints: &DeckConstraints) -> DeckValidation {
        let mut result = DeckValidation::default();
        let count = deck.len();

        if count < constraints.min_cards {
            result.errors.push(DeckViolation::TooFewCards {
                count,
                min: constraints.min_cards,
            });
        }
        if count > constraints.max_cards {
            result.errors.push(DeckViolation::TooManyCards {
                count,
                max: constraints.max_cards,
            });
        }

        // Copies, reported in order of first appearance
        let mut copies: FxHashMap<CardId, usize> = FxHashMap::default();
        let mut order = Vec::new();
        for card in deck.cards() {
            let entry = copies.entry(card.id).or_insert(0);
            if *entry == 0 {
                order.push(card.id);
            }
            *entry += 1;
        }
        for id in &order {
            let n = copies[id];
            if n > constraints.max_copies_per_card {
                result.errors.push(DeckViolation::TooManyCopies {
                    card: *id,
                    count: n,
                    max: constraints.max_copies_per_card,
                });
            }
        }

        let total = deck.power_rating();
        if total > u64::from(constraints.max_power_rating) {
            result.errors.push(DeckViolation::PowerRatingExceeded {
                total,
                max: constraints.max_power_rating,
            });
        }

        let mut reported: FxHashSet<CardId> = FxHashSet::default();
        if let Some(allowed) = &constraints.allowed_elements {
            for card in deck.cards() {
                if let Some(element) = card.element {
                    if !allowed.contains(&element) && reported.insert(card.id) {
                        result.errors.push(DeckViolation::ElementNotAllowed {
                            card: card.id,
                            element,
                        });
                    }
                }
            }
        }

        reported.clear();
        if let Some(allowed) = &constraints.allowed_rarities {
            for card in deck.cards() {
                if !allowed.contains(&card.rarity) && reported.insert(card.id) {
                    result.errors.push(DeckViolation::RarityNotAllowed {
                        card: card.id,
                        rarity: card.rarity,
                    });
                }
            }
        }

        let distinct: FxHashSet<Element> = deck.cards().iter().filter_map(|c| c.element).collect();
        if count >= 3 && distinct.len() < 2 {
            result.warnings.push(DeckWarning::LowElementDiversity {
                distinct: distinct.len(),
            });
        }

        debug!(
            deck = %deck.id(),
            cards = count,
            power = total,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated deck"
        );

        result
    }

    /// Validate and, if legal, wrap the deck for match entry.
    pub fn accept(deck: Deck, constraints: &DeckConstraints) -> Result<ValidatedDeck, DeckValidation> {
        let validation = Self::validate(&deck, constraints);
        if validation.is_valid() {
            Ok(ValidatedDeck {
                deck,
                warnings: validation.warnings,
            })
        } else {
            Err(validation)
        }
    }
}
