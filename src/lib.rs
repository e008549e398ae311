//! # grid-duel
//!
//! A two-player card battle engine on a 3×3 board.
//!
//! Players take turns placing cards from validated decks. Every card has a
//! strength on each of its four sides; a placed card flips adjacent enemy
//! cards whose facing side is weaker, and flipped cards go on to flip their
//! own weaker neighbors in a chain. When no placement is left, the seat
//! owning more cells wins.
//!
//! ## Design Principles
//!
//! 1. **Pure rules**: deck validation and capture resolution are plain
//!    functions over values. Only `MatchEngine` holds mutable state.
//!
//! 2. **All or nothing**: a rejected call leaves the match unchanged.
//!
//! 3. **Deterministic**: the same decks, seed and moves always produce the
//!    same match.
//!
//! ## Architecture
//!
//! - **Single writer per match**: `MatchRegistry` gives every match its own
//!   lock and publishes an immutable `MatchSnapshot` after each write.
//!
//! - **Persistent data structures**: hands and history are `im` vectors, so
//!   snapshots and records are cheap to take.
//!
//! - **Collaborator seams**: persistence (`MatchStore`) and transport
//!   (`EventSink`) are traits; the crate ships in-process implementations.
//!
//! ## Modules
//!
//! - `core`: players, seats, RNG, match configuration
//! - `cards`: card definitions, instances, registry
//! - `deck`: decks and the deck validator
//! - `board`: positions, directions, the grid
//! - `capture`: direct and chain capture resolution
//! - `engine`: the match state machine, records and events
//! - `registry`: concurrent access, persistence and event delivery

pub mod board;
pub mod capture;
pub mod cards;
pub mod core;
pub mod deck;
pub mod engine;
pub mod registry;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, ElementalRule, GameRng, HandRule, MatchConfig, PlayerId, PlayerMap, Seat,
};

pub use crate::cards::{
    Card, CardId, CardInstance, CardRegistry, CardRegistryError, CardValues, Element, HandCard,
    InstanceId, Rarity,
};

pub use crate::deck::{
    Deck, DeckConstraints, DeckId, DeckRecord, DeckValidation, DeckValidator, DeckViolation,
    DeckWarning, ValidatedDeck,
};

pub use crate::board::{Board, BoardError, BoardSnapshot, Direction, Neighbor, Position};

pub use crate::capture::{Capture, CaptureDiff, CaptureResolver};

pub use crate::engine::{
    EventSink, InvalidMove, MatchEngine, MatchError, MatchEvent, MatchId, MatchOutcome,
    MatchRecord, MatchSnapshot, MatchStatus, MoveApplied, MoveRecord, RecordError,
};

pub use crate::registry::{MatchRegistry, MatchStore, MemoryStore, RegistryError, StoreError};
