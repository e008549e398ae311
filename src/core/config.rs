//! Match configuration.
//!
//! `MatchConfig` is fixed when a match is created and persisted with it:
//! - `HandRule`: how each seat's hand is built from its deck
//! - `ElementalRule`: whether cells carry elemental affinities
//! - `seed`: root of every random choice the match makes
//!
//! Defaults reproduce the plain game: full-deck hands, no elements.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rng::GameRng;
use crate::board::BOARD_CELLS;
use crate::cards::Element;

/// How a seat's hand is built at `start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandRule {
    /// The hand is the whole deck, in deck order.
    #[default]
    FullDeck,
    /// The hand is `size` cards dealt from a seeded shuffle of the deck.
    /// Decks smaller than `size` are dealt in full.
    Deal { size: usize },
}

/// Elemental cell affinities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ElementalRule {
    /// Plain cells only.
    #[default]
    Off,
    /// Explicit affinity per cell, in arena order.
    Fixed([Option<Element>; BOARD_CELLS]),
    /// Each cell independently gets a random element with probability `density`.
    Random { density: f64 },
}

impl ElementalRule {
    /// Is any cell able to carry an element?
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ElementalRule::Off)
    }

    /// Cell affinities for a new board.
    ///
    /// Only `Random` draws from `rng`.
    pub fn layout(&self, rng: &mut GameRng) -> [Option<Element>; BOARD_CELLS] {
        match self {
            ElementalRule::Off => [None; BOARD_CELLS],
            ElementalRule::Fixed(cells) => *cells,
            ElementalRule::Random { density } => {
                let mut cells = [None; BOARD_CELLS];
                for cell in &mut cells {
                    if rng.gen_bool(*density) {
                        *cell = rng.choose(&Element::ALL).copied();
                    }
                }
                cells
            }
        }
    }
}

/// A configuration no match can be played with.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("hand size must be at least 1")]
    EmptyHand,
    #[error("element density {0} is outside [0, 1]")]
    DensityOutOfRange(f64),
}

/// Complete match configuration.
///
/// ## Example
///
/// ```
/// use grid_duel::core::{ElementalRule, HandRule, MatchConfig};
///
/// let config = MatchConfig::default()
///     .with_hand_rule(HandRule::Deal { size: 5 })
///     .with_elemental(ElementalRule::Random { density: 0.3 })
///     .with_seed(7);
///
/// assert_eq!(config.hand_rule, HandRule::Deal { size: 5 });
/// assert!(config.elemental.is_enabled());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub hand_rule: HandRule,
    pub elemental: ElementalRule,
    /// Seed for dealing and random elements.
    pub seed: u64,
}

impl MatchConfig {
    /// Default configuration with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hand_rule(mut self, hand_rule: HandRule) -> Self {
        self.hand_rule = hand_rule;
        self
    }

    #[must_use]
    pub fn with_elemental(mut self, elemental: ElementalRule) -> Self {
        self.elemental = elemental;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that a match can be started with this configuration.
    ///
    /// Runs on creation and again on every recovered record.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let HandRule::Deal { size: 0 } = self.hand_rule {
            return Err(ConfigError::EmptyHand);
        }
        if let ElementalRule::Random { density } = self.elemental {
            // NaN fails `contains` too
            if !(0.0..=1.0).contains(&density) {
                return Err(ConfigError::DensityOutOfRange(density));
            }
        }
        Ok(())
    }
}
