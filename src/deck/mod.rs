//! Decks and deck legality.
//!
//! - `DeckRecord`: card references as stored by the collection collaborator
//! - `Deck`: resolved cards with an owner
//! - `DeckValidator`: pure legality check returning every violation
//! - `ValidatedDeck`: the only deck type a match accepts

pub mod definition;
pub mod validator;

pub use definition::{Deck, DeckId, DeckRecord};
pub use validator::{
    DeckConstraints, DeckValidation, DeckValidator, DeckViolation, DeckWarning, ValidatedDeck,
};
