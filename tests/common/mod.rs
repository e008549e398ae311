//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use grid_duel::board::{Board, Position};
use grid_duel::cards::{Card, CardId, CardInstance, CardValues, InstanceId};
use grid_duel::core::{PlayerId, Seat};
use grid_duel::deck::{Deck, DeckConstraints, DeckId, DeckValidator, ValidatedDeck};

static TRACING: Once = Once::new();

/// Route engine logs to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn card(id: u32, values: CardValues) -> Card {
    Card::new(CardId::new(id), format!("Card {id}"), values)
}

/// `count` distinct cards with the same value on every side.
pub fn uniform_cards(base: u32, count: u32, value: u8) -> Vec<Card> {
    (0..count)
        .map(|i| card(base + i, CardValues::uniform(value)))
        .collect()
}

pub fn deck(owner: &str, cards: Vec<Card>) -> Deck {
    Deck::new(DeckId::new(format!("{owner}-deck")), PlayerId::new(owner), cards)
}

/// A deck accepted under default constraints.
pub fn validated(owner: &str, cards: Vec<Card>) -> ValidatedDeck {
    DeckValidator::accept(deck(owner, cards), &DeckConstraints::default())
        .expect("fixture deck should be valid")
}

/// Place a card directly on a board.
pub fn put(board: &mut Board, row: u8, col: u8, values: CardValues, owner: Seat) -> Position {
    let pos = Position::new(row, col);
    let id = u32::from(row) * 3 + u32::from(col);
    board
        .place(pos, CardInstance::new(InstanceId::new(id), card(id, values), owner))
        .expect("fixture cell should be free");
    pos
}
