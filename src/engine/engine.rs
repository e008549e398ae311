//! The match state machine.
//!
//! `MatchEngine` owns one match: the board, both hands, the turn holder and
//! the move history. It is single-writer; `MatchRegistry` serializes access
//! when several callers share a match.
//!
//! ## Lifecycle
//!
//! ```text
//! Pending --start--> Active --last placement / forfeit--> Completed
//!                      |
//!                      +--abandon--> Abandoned
//! ```
//!
//! ## Moves
//!
//! `apply_move` validates everything against the current state before
//! touching it. Placement and capture application run on a working copy of
//! the board that replaces the live one only when the whole move succeeded,
//! so a rejected move is never partially applied.
//!
//! ## Turn order
//!
//! Seat One moves first. After a move the turn passes to the opponent,
//! unless the opponent has no cards left, in which case the mover keeps it.
//! The match completes when the board is full or both hands are empty.
//!
//! ## Timestamps
//!
//! The engine has no clock. The `*_at` variants of the lifecycle calls take
//! a caller-supplied time (milliseconds since the Unix epoch) and stamp it
//! on the match and its move records; the plain calls leave it unset.

use im::Vector;
use tracing::{debug, info, instrument, warn};

use super::error::{InvalidMove, MatchError};
use super::events::MoveApplied;
use super::record::{MatchRecord, RecordError, RECORD_VERSION};
use super::state::{MatchId, MatchOutcome, MatchSnapshot, MatchStatus, MoveRecord};
use crate::board::{Board, BoardError, Position};
use crate::capture::CaptureResolver;
use crate::cards::{Card, CardInstance, HandCard, InstanceId};
use crate::core::{GameRng, HandRule, MatchConfig, PlayerId, PlayerMap, Seat};
use crate::deck::{Deck, ValidatedDeck};

/// One match between two players.
///
/// ## Example
///
/// ```
/// use grid_duel::board::Position;
/// use grid_duel::cards::{Card, CardId, CardValues};
/// use grid_duel::core::{MatchConfig, PlayerId, Seat};
/// use grid_duel::deck::{Deck, DeckConstraints, DeckId, DeckValidator};
/// use grid_duel::engine::{MatchEngine, MatchId, MatchStatus};
///
/// let deck = |owner: &str, base: u32| {
///     let cards = (0..5)
///         .map(|i| Card::new(CardId::new(base + i), "Imp", CardValues::uniform(1)))
///         .collect();
///     let deck = Deck::new(DeckId::new(owner), PlayerId::new(owner), cards);
///     DeckValidator::accept(deck, &DeckConstraints::default()).unwrap()
/// };
///
/// let alice = PlayerId::new("alice");
/// let bob = PlayerId::new("bob");
/// let mut engine = MatchEngine::new(MatchId::new("m"), alice.clone(), bob, MatchConfig::default())?;
/// engine.start(deck("alice", 0), deck("bob", 100))?;
///
/// let card = engine.hand(Seat::One)[0].instance_id;
/// let applied = engine.apply_move(&alice, card, Position::new(1, 1))?;
///
/// assert_eq!(applied.next_turn, Some(Seat::Two));
/// assert_eq!(engine.status(), MatchStatus::Active);
/// # Ok::<(), grid_duel::engine::MatchError>(())
/// ```
#[derive(Clone, Debug)]
pub struct MatchEngine {
    id: MatchId,
    players: PlayerMap<PlayerId>,
    config: MatchConfig,
    status: MatchStatus,
    board: Board,
    hands: PlayerMap<Vector<HandCard>>,
    turn: Seat,
    history: Vector<MoveRecord>,
    outcome: Option<MatchOutcome>,
    started_at: Option<u64>,
    ended_at: Option<u64>,
}

impl MatchEngine {
    /// Create a pending match.
    pub fn new(
        id: MatchId,
        player1: PlayerId,
        player2: PlayerId,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        if player1 == player2 {
            return Err(MatchError::DuplicatePlayer(player1));
        }
        config.validate()?;

        debug!(match_id = %id, player1 = %player1, player2 = %player2, "match created");

        Ok(Self {
            id,
            players: PlayerMap::from_pair(player1, player2),
            config,
            status: MatchStatus::Pending,
            board: Board::new(),
            hands: PlayerMap::default(),
            turn: Seat::One,
            history: Vector::new(),
            outcome: None,
            started_at: None,
            ended_at: None,
        })
    }

    /// Rebuild a match from its persisted record.
    pub fn from_record(record: MatchRecord) -> Result<Self, RecordError> {
        if record.version != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion {
                found: record.version,
                expected: RECORD_VERSION,
            });
        }
        record.check()?;

        Ok(Self {
            id: record.id,
            players: record.players,
            config: record.config,
            status: record.status,
            board: record.board,
            hands: record.hands,
            turn: record.turn,
            history: record.history,
            outcome: record.outcome,
            started_at: record.started_at,
            ended_at: record.ended_at,
        })
    }

    // === Lifecycle ===

    /// Deal hands, lay out the board and hand the first turn to seat One.
    ///
    /// `deck1` must belong to player 1 and `deck2` to player 2.
    pub fn start(&mut self, deck1: ValidatedDeck, deck2: ValidatedDeck) -> Result<(), MatchError> {
        self.begin(deck1, deck2, None)
    }

    /// `start`, stamping the match with `at`.
    pub fn start_at(
        &mut self,
        deck1: ValidatedDeck,
        deck2: ValidatedDeck,
        at: u64,
    ) -> Result<(), MatchError> {
        self.begin(deck1, deck2, Some(at))
    }

    #[instrument(skip(self, deck1, deck2), fields(match_id = %self.id))]
    pub(crate) fn begin(
        &mut self,
        deck1: ValidatedDeck,
        deck2: ValidatedDeck,
        at: Option<u64>,
    ) -> Result<(), MatchError> {
        self.require(MatchStatus::Pending, "start")?;

        let decks = PlayerMap::from_pair(deck1, deck2);
        for (seat, deck) in decks.iter() {
            let owner = deck.deck().owner();
            let expected = &self.players[seat];
            if owner != expected {
                warn!(seat = %seat, deck = %deck.deck().id(), owner = %owner, "deck owner mismatch");
                return Err(MatchError::DeckOwnerMismatch {
                    seat,
                    deck: deck.deck().id().clone(),
                    owner: owner.clone(),
                    expected: expected.clone(),
                });
            }
        }

        let root = GameRng::new(self.config.seed);
        let mut deal_rng = root.for_context("deal");
        let mut next_id = 0u32;
        let mut hands: PlayerMap<Vector<HandCard>> = PlayerMap::default();
        for seat in Seat::ALL {
            for card in dealt_cards(self.config.hand_rule, decks[seat].deck(), &mut deal_rng) {
                hands[seat].push_back(HandCard::new(InstanceId::new(next_id), card));
                next_id += 1;
            }
        }

        let mut element_rng = root.for_context("elements");
        self.board = Board::with_elements(self.config.elemental.layout(&mut element_rng));
        self.hands = hands;
        self.status = MatchStatus::Active;
        self.started_at = at;

        info!(
            hand_one = self.hands[Seat::One].len(),
            hand_two = self.hands[Seat::Two].len(),
            elemental = self.config.elemental.is_enabled(),
            "match started"
        );

        // Seat One moves first unless it was dealt nothing.
        match self.turn_after(Seat::Two) {
            Some(seat) => self.turn = seat,
            None => self.complete(at),
        }
        Ok(())
    }

    /// Place a card from `player`'s hand.
    ///
    /// On error the match is unchanged.
    pub fn apply_move(
        &mut self,
        player: &PlayerId,
        instance_id: InstanceId,
        position: Position,
    ) -> Result<MoveApplied, MatchError> {
        self.place(player, instance_id, position, None)
    }

    /// `apply_move`, stamping the move record with `at`.
    pub fn apply_move_at(
        &mut self,
        player: &PlayerId,
        instance_id: InstanceId,
        position: Position,
        at: u64,
    ) -> Result<MoveApplied, MatchError> {
        self.place(player, instance_id, position, Some(at))
    }

    #[instrument(skip(self), fields(match_id = %self.id))]
    pub(crate) fn place(
        &mut self,
        player: &PlayerId,
        instance_id: InstanceId,
        position: Position,
        at: Option<u64>,
    ) -> Result<MoveApplied, MatchError> {
        let result = self.try_place(player, instance_id, position, at);
        if let Err(err) = &result {
            warn!(error = %err, "move rejected");
        }
        result
    }

    fn try_place(
        &mut self,
        player: &PlayerId,
        instance_id: InstanceId,
        position: Position,
        at: Option<u64>,
    ) -> Result<MoveApplied, MatchError> {
        self.require(MatchStatus::Active, "play in")?;

        let seat = self
            .seat_of(player)
            .ok_or_else(|| MatchError::NotAParticipant(player.clone()))?;
        if seat != self.turn {
            return Err(MatchError::NotYourTurn {
                player: player.clone(),
                expected: self.turn,
            });
        }

        if !self.board.is_empty(position)? {
            return Err(BoardError::CellOccupied(position).into());
        }
        let slot = self.hands[seat]
            .iter()
            .position(|c| c.instance_id == instance_id)
            .ok_or(InvalidMove::CardNotInHand(instance_id))?;
        let hand_card = self.hands[seat][slot].clone();

        let mut board = self.board.clone();
        board.place(position, CardInstance::from_hand(hand_card.clone(), seat))?;
        let captures = CaptureResolver::resolve(&board, position);
        captures.apply_to(&mut board)?;

        // Commit.
        self.board = board;
        self.hands[seat].remove(slot);

        let record = MoveRecord {
            sequence: self.history.len() as u32 + 1,
            player: player.clone(),
            seat,
            position,
            instance_id,
            placed_card: hand_card.card.id,
            captures,
            played_at: at,
        };
        debug!(
            seat = %seat,
            card = %record.placed_card,
            position = %position,
            captured = record.captures.len(),
            "card placed"
        );
        self.history.push_back(record.clone());

        match self.turn_after(seat) {
            Some(next) => self.turn = next,
            None => self.complete(at),
        }

        Ok(MoveApplied::from_record(
            self.id.clone(),
            &record,
            self.turn(),
            self.status,
        ))
    }

    /// End an active match without a winner.
    pub fn abandon(&mut self) -> Result<(), MatchError> {
        self.close(None)
    }

    /// `abandon`, stamping the end of the match with `at`.
    pub fn abandon_at(&mut self, at: u64) -> Result<(), MatchError> {
        self.close(Some(at))
    }

    #[instrument(skip(self), fields(match_id = %self.id))]
    pub(crate) fn close(&mut self, at: Option<u64>) -> Result<(), MatchError> {
        self.require(MatchStatus::Active, "abandon")?;
        self.status = MatchStatus::Abandoned;
        self.ended_at = at;
        info!(moves = self.history.len(), "match abandoned");
        Ok(())
    }

    /// Concede an active match; the other seat wins.
    pub fn forfeit(&mut self, player: &PlayerId) -> Result<MatchOutcome, MatchError> {
        self.concede(player, None)
    }

    /// `forfeit`, stamping the end of the match with `at`.
    pub fn forfeit_at(&mut self, player: &PlayerId, at: u64) -> Result<MatchOutcome, MatchError> {
        self.concede(player, Some(at))
    }

    #[instrument(skip(self), fields(match_id = %self.id))]
    pub(crate) fn concede(&mut self, player: &PlayerId, at: Option<u64>) -> Result<MatchOutcome, MatchError> {
        self.require(MatchStatus::Active, "forfeit")?;
        let seat = self
            .seat_of(player)
            .ok_or_else(|| MatchError::NotAParticipant(player.clone()))?;

        let outcome = MatchOutcome::Winner(seat.opponent());
        self.outcome = Some(outcome);
        self.status = MatchStatus::Completed;
        self.ended_at = at;
        info!(seat = %seat, outcome = ?outcome, "match forfeited");
        Ok(outcome)
    }

    fn require(&self, expected: MatchStatus, operation: &'static str) -> Result<(), MatchError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(MatchError::IllegalState {
                operation,
                status: self.status,
            })
        }
    }

    /// Who moves after `mover`, or `None` when no placement is left.
    fn turn_after(&self, mover: Seat) -> Option<Seat> {
        if self.board.is_full() {
            return None;
        }
        let opponent = mover.opponent();
        if !self.hands[opponent].is_empty() {
            Some(opponent)
        } else if !self.hands[mover].is_empty() {
            Some(mover)
        } else {
            None
        }
    }

    fn complete(&mut self, at: Option<u64>) {
        let scores = self.scores();
        let outcome = MatchOutcome::from_scores(&scores);
        self.outcome = Some(outcome);
        self.status = MatchStatus::Completed;
        self.ended_at = at;
        info!(
            match_id = %self.id,
            outcome = ?outcome,
            score_one = scores[Seat::One],
            score_two = scores[Seat::Two],
            "match completed"
        );
    }

    // === Queries ===

    #[must_use]
    pub fn id(&self) -> &MatchId {
        &self.id
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerId> {
        &self.players
    }

    /// The player in a seat.
    #[must_use]
    pub fn player(&self, seat: Seat) -> &PlayerId {
        &self.players[seat]
    }

    /// The seat a player occupies.
    #[must_use]
    pub fn seat_of(&self, player: &PlayerId) -> Option<Seat> {
        self.players.find_seat(|p| p == player)
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Seat to move. `None` unless the match is active.
    #[must_use]
    pub fn turn(&self) -> Option<Seat> {
        (self.status == MatchStatus::Active).then_some(self.turn)
    }

    /// Cards a seat can still play.
    #[must_use]
    pub fn hand(&self, seat: Seat) -> &Vector<HandCard> {
        &self.hands[seat]
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Cells owned per seat.
    #[must_use]
    pub fn scores(&self) -> PlayerMap<usize> {
        PlayerMap::new(|seat| self.board.owned_by(seat))
    }

    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// Final result. `Some` only once completed.
    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Caller-supplied start time, if the match was started with `start_at`.
    #[must_use]
    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    /// Caller-supplied end time, if the finishing call carried one.
    #[must_use]
    pub fn ended_at(&self) -> Option<u64> {
        self.ended_at
    }

    /// Every placement the seat to move could make.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<(InstanceId, Position)> {
        let Some(seat) = self.turn() else {
            return Vec::new();
        };
        self.hands[seat]
            .iter()
            .flat_map(|card| {
                self.board
                    .empty_positions()
                    .map(move |pos| (card.instance_id, pos))
            })
            .collect()
    }

    /// Cheap frozen copy for observers.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            id: self.id.clone(),
            players: self.players.clone(),
            status: self.status,
            turn: self.turn(),
            board: self.board.snapshot(),
            hands: self.hands.clone(),
            scores: self.scores(),
            history: self.history.clone(),
            outcome: self.outcome,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    /// Complete persistable state.
    #[must_use]
    pub fn record(&self) -> MatchRecord {
        MatchRecord {
            version: RECORD_VERSION,
            id: self.id.clone(),
            players: self.players.clone(),
            config: self.config,
            status: self.status,
            board: self.board.clone(),
            hands: self.hands.clone(),
            turn: self.turn,
            history: self.history.clone(),
            outcome: self.outcome,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }
}

/// The cards a deck contributes to its owner's hand.
fn dealt_cards(rule: HandRule, deck: &Deck, rng: &mut GameRng) -> Vec<Card> {
    let mut cards = deck.cards().to_vec();
    if let HandRule::Deal { size } = rule {
        rng.shuffle(&mut cards);
        cards.truncate(size);
    }
    cards
}
