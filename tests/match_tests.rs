//! Match lifecycle tests driven through `MatchEngine`.

mod common;

use common::{card, init_tracing, uniform_cards, validated};
use grid_duel::board::{BoardError, Position};
use grid_duel::cards::{Card, CardId, CardValues, InstanceId};
use grid_duel::core::{ElementalRule, HandRule, MatchConfig, PlayerId, Seat};
use grid_duel::engine::{
    InvalidMove, MatchEngine, MatchError, MatchId, MatchOutcome, MatchStatus,
};

fn alice() -> PlayerId {
    PlayerId::new("alice")
}

fn bob() -> PlayerId {
    PlayerId::new("bob")
}

fn new_match(config: MatchConfig) -> MatchEngine {
    init_tracing();
    MatchEngine::new(MatchId::new("match-1"), alice(), bob(), config).unwrap()
}

/// Instance id of a card still in a seat's hand.
fn in_hand(engine: &MatchEngine, seat: Seat, card: u32) -> InstanceId {
    engine
        .hand(seat)
        .iter()
        .find(|c| c.card.id == CardId::new(card))
        .map(|c| c.instance_id)
        .expect("card should be in hand")
}

fn play(engine: &mut MatchEngine, player: &PlayerId, card: u32, row: u8, col: u8) {
    let seat = engine.seat_of(player).unwrap();
    let instance = in_hand(engine, seat, card);
    engine
        .apply_move(player, instance, Position::new(row, col))
        .unwrap();
}

// =============================================================================
// Full Games
// =============================================================================

/// Five identical cards each: nothing is ever captured, player 1 fills five
/// cells and player 2 four, and the full board ends the match 5-4.
#[test]
fn test_full_game_without_captures() {
    let mut engine = new_match(MatchConfig::default());
    engine
        .start(
            validated("alice", uniform_cards(0, 5, 1)),
            validated("bob", uniform_cards(100, 5, 1)),
        )
        .unwrap();

    for (i, pos) in Position::all().enumerate() {
        let seat = engine.turn().unwrap();
        assert_eq!(seat, if i % 2 == 0 { Seat::One } else { Seat::Two });

        let instance = engine.hand(seat)[0].instance_id;
        let player = engine.player(seat).clone();
        let applied = engine.apply_move(&player, instance, pos).unwrap();
        assert!(applied.captured_positions.is_empty());

        let scores = engine.scores();
        assert_eq!(
            scores[Seat::One] + scores[Seat::Two] + engine.board().empty_count(),
            9
        );
    }

    assert_eq!(engine.status(), MatchStatus::Completed);
    assert_eq!(engine.scores()[Seat::One], 5);
    assert_eq!(engine.scores()[Seat::Two], 4);
    assert_eq!(engine.outcome(), Some(MatchOutcome::Winner(Seat::One)));
    assert_eq!(engine.turn(), None);
    assert_eq!(engine.history().len(), 9);
    // player 2 keeps one card that never found a cell
    assert_eq!(engine.hand(Seat::Two).len(), 1);
}

/// A game where one placement flips two cards through a chain while a third
/// opponent card stays put.
#[test]
fn test_chain_capture_in_match() {
    let mut engine = new_match(MatchConfig::default());

    let attacker = card(13, CardValues::new(4, 1, 1, 1));
    let mut p1: Vec<Card> = uniform_cards(10, 3, 1);
    p1.push(attacker);
    p1.push(card(14, CardValues::uniform(1)));

    let p2 = vec![
        card(20, CardValues::new(1, 2, 1, 1)),
        card(21, CardValues::new(1, 1, 1, 6)),
        card(22, CardValues::uniform(1)),
        card(23, CardValues::uniform(1)),
        card(24, CardValues::uniform(1)),
    ];
    engine.start(validated("alice", p1), validated("bob", p2)).unwrap();

    let (a, b) = (alice(), bob());
    play(&mut engine, &a, 10, 1, 0);
    play(&mut engine, &b, 20, 0, 0);
    play(&mut engine, &a, 11, 1, 2);
    play(&mut engine, &b, 21, 0, 1);
    play(&mut engine, &a, 12, 2, 0);
    play(&mut engine, &b, 22, 2, 2);
    assert_eq!(engine.scores()[Seat::Two], 3);

    let instance = in_hand(&engine, Seat::One, 13);
    let applied = engine.apply_move(&a, instance, Position::new(1, 1)).unwrap();

    assert_eq!(
        applied.captured_positions.as_slice(),
        &[Position::new(0, 1), Position::new(0, 0)]
    );
    assert_eq!(
        applied.new_owners.as_slice(),
        &[(Position::new(0, 1), Seat::One), (Position::new(0, 0), Seat::One)]
    );
    assert_eq!(applied.next_turn, Some(Seat::Two));

    let board = engine.board();
    let corner = board.get(Position::new(2, 2)).unwrap().unwrap();
    assert_eq!(corner.current_owner, Seat::Two);
    let flipped = board.get(Position::new(0, 0)).unwrap().unwrap();
    assert_eq!(flipped.original_owner, Seat::Two);
    assert!(flipped.is_captured());

    assert_eq!(engine.scores()[Seat::One], 6);
    assert_eq!(engine.scores()[Seat::Two], 1);

    let last = engine.history().back().unwrap();
    assert_eq!(last.sequence, 7);
    assert_eq!(last.placed_card, CardId::new(13));
    assert_eq!(last.captures.depth(), 2);
}

/// A captured card can be captured back later.
#[test]
fn test_recapture() {
    let mut engine = new_match(MatchConfig::default());
    let mut p1 = uniform_cards(10, 4, 1);
    p1.push(card(14, CardValues::uniform(9)));
    let mut p2 = uniform_cards(20, 4, 1);
    p2.push(card(24, CardValues::uniform(5)));
    engine.start(validated("alice", p1), validated("bob", p2)).unwrap();

    let (a, b) = (alice(), bob());
    play(&mut engine, &a, 10, 0, 0);
    play(&mut engine, &b, 24, 0, 1); // takes (0,0)
    assert_eq!(engine.board().get(Position::new(0, 0)).unwrap().unwrap().current_owner, Seat::Two);

    play(&mut engine, &a, 14, 1, 0); // takes (0,0) back; (0,1) is not adjacent
    let cell = engine.board().get(Position::new(0, 0)).unwrap().unwrap();
    assert_eq!(cell.current_owner, Seat::One);
    assert!(!cell.is_captured());
}

// =============================================================================
// Rejections
// =============================================================================

/// Moving out of turn is rejected and changes nothing.
#[test]
fn test_not_your_turn_leaves_state_unchanged() {
    let mut engine = new_match(MatchConfig::default());
    engine
        .start(
            validated("alice", uniform_cards(0, 5, 1)),
            validated("bob", uniform_cards(100, 5, 1)),
        )
        .unwrap();
    let before = engine.snapshot();

    let instance = engine.hand(Seat::Two)[0].instance_id;
    let err = engine
        .apply_move(&bob(), instance, Position::new(0, 0))
        .unwrap_err();

    assert_eq!(
        err,
        MatchError::NotYourTurn {
            player: bob(),
            expected: Seat::One
        }
    );
    assert_eq!(engine.snapshot(), before);
}

/// Invalid placements are rejected with the cause.
#[test]
fn test_invalid_moves() {
    let mut engine = new_match(MatchConfig::default());
    engine
        .start(
            validated("alice", uniform_cards(0, 5, 1)),
            validated("bob", uniform_cards(100, 5, 1)),
        )
        .unwrap();

    let mine = engine.hand(Seat::One)[0].instance_id;
    let theirs = engine.hand(Seat::Two)[0].instance_id;

    assert_eq!(
        engine.apply_move(&alice(), theirs, Position::new(0, 0)),
        Err(MatchError::InvalidMove(InvalidMove::CardNotInHand(theirs)))
    );
    assert_eq!(
        engine.apply_move(&alice(), mine, Position::new(0, 9)),
        Err(MatchError::InvalidMove(InvalidMove::Board(BoardError::OutOfBounds(
            Position::new(0, 9)
        ))))
    );
    assert_eq!(
        engine.apply_move(&PlayerId::new("carol"), mine, Position::new(0, 0)),
        Err(MatchError::NotAParticipant(PlayerId::new("carol")))
    );

    engine.apply_move(&alice(), mine, Position::new(0, 0)).unwrap();

    // the played card is gone from the hand
    let other = engine.hand(Seat::Two)[0].instance_id;
    assert_eq!(
        engine.apply_move(&bob(), other, Position::new(0, 0)),
        Err(MatchError::InvalidMove(InvalidMove::Board(BoardError::CellOccupied(
            Position::new(0, 0)
        ))))
    );
    assert_eq!(engine.history().len(), 1);
}

/// Once a card is played it cannot be played again.
#[test]
fn test_card_cannot_be_played_twice() {
    let mut engine = new_match(MatchConfig::default());
    engine
        .start(
            validated("alice", uniform_cards(0, 5, 1)),
            validated("bob", uniform_cards(100, 5, 1)),
        )
        .unwrap();

    let card = engine.hand(Seat::One)[0].instance_id;
    engine.apply_move(&alice(), card, Position::new(0, 0)).unwrap();
    let reply = engine.hand(Seat::Two)[0].instance_id;
    engine.apply_move(&bob(), reply, Position::new(2, 2)).unwrap();

    assert_eq!(
        engine.apply_move(&alice(), card, Position::new(1, 1)),
        Err(MatchError::InvalidMove(InvalidMove::CardNotInHand(card)))
    );
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Moves before `start` are lifecycle misuse.
#[test]
fn test_move_before_start() {
    let mut engine = new_match(MatchConfig::default());
    let err = engine
        .apply_move(&alice(), InstanceId::new(0), Position::new(0, 0))
        .unwrap_err();
    assert!(matches!(
        err,
        MatchError::IllegalState {
            status: MatchStatus::Pending,
            ..
        }
    ));
}

/// Decks must belong to the seated players.
#[test]
fn test_start_with_foreign_deck() {
    let mut engine = new_match(MatchConfig::default());
    let err = engine
        .start(
            validated("alice", uniform_cards(0, 5, 1)),
            validated("mallory", uniform_cards(100, 5, 1)),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        MatchError::DeckOwnerMismatch {
            seat: Seat::Two,
            ..
        }
    ));
    assert_eq!(engine.status(), MatchStatus::Pending);
}

/// Abandoning freezes the match without a winner.
#[test]
fn test_abandon_freezes_match() {
    let mut engine = new_match(MatchConfig::default());
    engine
        .start(
            validated("alice", uniform_cards(0, 5, 1)),
            validated("bob", uniform_cards(100, 5, 1)),
        )
        .unwrap();
    play(&mut engine, &alice(), 0, 1, 1);

    engine.abandon().unwrap();

    assert_eq!(engine.status(), MatchStatus::Abandoned);
    assert_eq!(engine.outcome(), None);
    assert!(matches!(engine.abandon(), Err(MatchError::IllegalState { .. })));
    assert!(matches!(engine.forfeit(&bob()), Err(MatchError::IllegalState { .. })));
    assert!(matches!(
        engine.start(
            validated("alice", uniform_cards(0, 5, 1)),
            validated("bob", uniform_cards(100, 5, 1)),
        ),
        Err(MatchError::IllegalState { .. })
    ));
}

/// Forfeiting hands the win to the other seat regardless of the board.
#[test]
fn test_forfeit_mid_game() {
    let mut engine = new_match(MatchConfig::default());
    engine
        .start(
            validated("alice", uniform_cards(0, 5, 9)),
            validated("bob", uniform_cards(100, 5, 1)),
        )
        .unwrap();
    play(&mut engine, &alice(), 0, 1, 1);

    assert_eq!(engine.forfeit(&alice()), Ok(MatchOutcome::Winner(Seat::Two)));
    assert_eq!(engine.status(), MatchStatus::Completed);
    assert_eq!(engine.outcome(), Some(MatchOutcome::Winner(Seat::Two)));

    let instance = engine.hand(Seat::Two)[0].instance_id;
    assert!(matches!(
        engine.apply_move(&bob(), instance, Position::new(0, 0)),
        Err(MatchError::IllegalState { .. })
    ));
}

/// Equal cell counts are a draw.
#[test]
fn test_draw() {
    let mut engine = new_match(MatchConfig::default().with_hand_rule(HandRule::Deal { size: 2 }));
    engine
        .start(
            validated("alice", uniform_cards(0, 5, 1)),
            validated("bob", uniform_cards(100, 5, 1)),
        )
        .unwrap();

    for pos in [(0, 0), (2, 2), (0, 2), (2, 0)] {
        let seat = engine.turn().unwrap();
        let instance = engine.hand(seat)[0].instance_id;
        let player = engine.player(seat).clone();
        engine
            .apply_move(&player, instance, Position::new(pos.0, pos.1))
            .unwrap();
    }

    assert_eq!(engine.status(), MatchStatus::Completed);
    assert_eq!(engine.outcome(), Some(MatchOutcome::Draw));
    assert_eq!(engine.board().empty_count(), 5);
}

// =============================================================================
// Configuration
// =============================================================================

/// Same seed, same dealt hands and cell elements.
#[test]
fn test_seeded_configuration_is_reproducible() {
    let config = MatchConfig::new(2024)
        .with_hand_rule(HandRule::Deal { size: 4 })
        .with_elemental(ElementalRule::Random { density: 0.5 });

    let build = || {
        let mut engine = new_match(config);
        engine
            .start(
                validated("alice", uniform_cards(0, 8, 1)),
                validated("bob", uniform_cards(100, 8, 1)),
            )
            .unwrap();
        engine
    };

    let first = build();
    let second = build();
    assert_eq!(first.record(), second.record());
    assert_eq!(first.hand(Seat::One).len(), 4);
}

/// Fixed elements land on the board as given.
#[test]
fn test_fixed_elements() {
    use grid_duel::cards::Element;

    let mut cells = [None; 9];
    cells[4] = Some(Element::Holy);
    let mut engine = new_match(MatchConfig::default().with_elemental(ElementalRule::Fixed(cells)));
    engine
        .start(
            validated("alice", uniform_cards(0, 5, 3)),
            validated("bob", uniform_cards(100, 5, 3)),
        )
        .unwrap();

    assert_eq!(engine.board().elements(), cells);

    // Bob's element-less card on the holy center fights at 2, so Alice's
    // neighbor at 3 takes it on her next move.
    play(&mut engine, &alice(), 0, 0, 0);
    play(&mut engine, &bob(), 100, 1, 1);
    play(&mut engine, &alice(), 1, 0, 1);
    assert_eq!(
        engine.board().get(Position::new(1, 1)).unwrap().unwrap().current_owner,
        Seat::One
    );
}
