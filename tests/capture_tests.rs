//! Capture resolution tests over hand-built boards.

mod common;

use common::put;
use grid_duel::board::{Board, Position, BOARD_CELLS};
use grid_duel::capture::CaptureResolver;
use grid_duel::cards::{CardValues, Element};
use grid_duel::core::Seat;

// =============================================================================
// Direct Captures
// =============================================================================

/// A 5 facing a 3 flips it.
#[test]
fn test_stronger_side_captures() {
    let mut board = Board::new();
    put(&mut board, 1, 2, CardValues::new(1, 1, 1, 3), Seat::Two);
    let placed = put(&mut board, 1, 1, CardValues::new(1, 5, 1, 1), Seat::One);

    let diff = CaptureResolver::resolve(&board, placed);

    assert_eq!(diff.positions().collect::<Vec<_>>(), vec![Position::new(1, 2)]);
    assert_eq!(diff.captures()[0].new_owner, Seat::One);
    assert_eq!(diff.captures()[0].previous_owner, Seat::Two);
}

/// A 3 facing a 3 does not.
#[test]
fn test_tie_never_captures() {
    let mut board = Board::new();
    put(&mut board, 1, 2, CardValues::new(1, 1, 1, 3), Seat::Two);
    let placed = put(&mut board, 1, 1, CardValues::new(1, 3, 1, 1), Seat::One);

    assert!(CaptureResolver::resolve(&board, placed).is_empty());
}

/// Only the sides that face each other are compared.
#[test]
fn test_only_facing_sides_compared() {
    let mut board = Board::new();
    // strong everywhere except its bottom
    put(&mut board, 0, 0, CardValues::new(9, 9, 2, 9), Seat::Two);
    // weak everywhere except its top
    let placed = put(&mut board, 1, 0, CardValues::new(3, 1, 1, 1), Seat::One);

    let diff = CaptureResolver::resolve(&board, placed);
    assert!(diff.contains(Position::new(0, 0)));
}

/// Out-of-range or empty positions resolve to nothing.
#[test]
fn test_no_card_no_captures() {
    let mut board = Board::new();
    put(&mut board, 0, 0, CardValues::uniform(1), Seat::Two);

    assert!(CaptureResolver::resolve(&board, Position::new(0, 1)).is_empty());
    assert!(CaptureResolver::resolve(&board, Position::new(4, 4)).is_empty());
}

// =============================================================================
// Chain Captures
// =============================================================================

/// One placement flips two cards through a chain and leaves a third,
/// non-adjacent opponent card alone.
#[test]
fn test_chain_flips_two_leaves_third() {
    let mut board = Board::new();
    put(&mut board, 0, 0, CardValues::new(1, 2, 1, 1), Seat::Two);
    put(&mut board, 0, 1, CardValues::new(1, 1, 1, 6), Seat::Two);
    put(&mut board, 2, 2, CardValues::uniform(1), Seat::Two);
    let placed = put(&mut board, 1, 1, CardValues::new(4, 1, 1, 1), Seat::One);

    let diff = CaptureResolver::resolve(&board, placed);

    assert_eq!(diff.len(), 2);
    let levels: Vec<_> = diff.captures().iter().map(|c| (c.position, c.level)).collect();
    assert_eq!(levels, vec![(Position::new(0, 1), 1), (Position::new(0, 0), 2)]);
    assert!(!diff.contains(Position::new(2, 2)));
    assert_eq!(diff.chained().count(), 1);

    // resolving does not flip anything by itself
    assert_eq!(board.owned_by(Seat::Two), 3);
}

/// A chain keeps going until a level flips nothing.
#[test]
fn test_long_chain_around_the_rim() {
    let mut board = Board::new();
    // Each opponent card is weak on the side facing the previous one in the
    // clockwise walk (0,1) -> (0,2) -> (1,2) -> (2,2) -> (2,1).
    put(&mut board, 0, 1, CardValues::new(1, 9, 1, 1), Seat::Two);
    put(&mut board, 0, 2, CardValues::new(1, 1, 9, 1), Seat::Two);
    put(&mut board, 1, 2, CardValues::new(1, 1, 9, 1), Seat::Two);
    put(&mut board, 2, 2, CardValues::new(1, 1, 1, 9), Seat::Two);
    put(&mut board, 2, 1, CardValues::new(1, 1, 1, 1), Seat::Two);
    let placed = put(&mut board, 0, 0, CardValues::new(1, 5, 1, 1), Seat::One);

    let diff = CaptureResolver::resolve(&board, placed);

    assert_eq!(diff.len(), 5);
    assert_eq!(diff.depth(), 5);
    let order: Vec<_> = diff.positions().collect();
    assert_eq!(
        order,
        vec![
            Position::new(0, 1),
            Position::new(0, 2),
            Position::new(1, 2),
            Position::new(2, 2),
            Position::new(2, 1),
        ]
    );
}

/// Cards of the placing seat never become targets, even mid-chain.
#[test]
fn test_chain_skips_own_cards() {
    let mut board = Board::new();
    put(&mut board, 0, 1, CardValues::new(1, 9, 1, 1), Seat::Two);
    put(&mut board, 0, 2, CardValues::uniform(1), Seat::One);
    let placed = put(&mut board, 0, 0, CardValues::new(1, 5, 1, 1), Seat::One);

    let diff = CaptureResolver::resolve(&board, placed);
    assert_eq!(diff.positions().collect::<Vec<_>>(), vec![Position::new(0, 1)]);
}

// =============================================================================
// Determinism and Purity
// =============================================================================

/// Same board, same diff, board untouched.
#[test]
fn test_resolver_is_deterministic_and_pure() {
    let mut board = Board::new();
    put(&mut board, 0, 1, CardValues::new(1, 9, 1, 1), Seat::Two);
    put(&mut board, 1, 2, CardValues::new(9, 1, 1, 1), Seat::Two);
    put(&mut board, 0, 2, CardValues::uniform(1), Seat::Two);
    let placed = put(&mut board, 1, 1, CardValues::uniform(5), Seat::One);
    let before = board.clone();

    let first = CaptureResolver::resolve(&board, placed);
    let second = CaptureResolver::resolve(&board, placed);
    let third = CaptureResolver::resolve(&board.clone(), placed);

    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_eq!(board, before);
}

// =============================================================================
// Elemental Cells
// =============================================================================

/// A mismatched cell weakens the defender enough to lose a tie.
#[test]
fn test_elemental_penalty_on_defender() {
    let mut elements = [None; BOARD_CELLS];
    elements[1] = Some(Element::Water);
    let mut board = Board::with_elements(elements);

    put(&mut board, 0, 1, CardValues::uniform(3), Seat::Two);
    let placed = put(&mut board, 1, 1, CardValues::uniform(3), Seat::One);

    let diff = CaptureResolver::resolve(&board, placed);
    assert!(diff.contains(Position::new(0, 1)));
}
