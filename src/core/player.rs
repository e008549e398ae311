//! Player identification and per-seat data storage.
//!
//! ## PlayerId
//!
//! External identity of a player, as handed over by the account/collection
//! collaborator. The engine never interprets it beyond equality.
//!
//! ## Seat
//!
//! Position at the table: `Seat::One` is player1 (moves first),
//! `Seat::Two` is player2. Board ownership is expressed in seats.
//!
//! ## PlayerMap
//!
//! Per-seat data storage backed by a fixed array for O(1) access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// External player identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player({})", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A seat at the table. Exactly two exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Seat {
    /// Player 1. Always holds the first turn.
    One,
    /// Player 2.
    Two,
}

impl Seat {
    /// Both seats in turn order.
    pub const ALL: [Seat; 2] = [Seat::One, Seat::Two];

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// 0-based index (`One` = 0).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::One => write!(f, "Seat 1"),
            Seat::Two => write!(f, "Seat 2"),
        }
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use grid_duel::core::{PlayerMap, Seat};
///
/// let mut cells: PlayerMap<usize> = PlayerMap::with_value(0);
/// cells[Seat::Two] += 3;
///
/// assert_eq!(cells[Seat::One], 0);
/// assert_eq!(cells[Seat::Two], 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(mut factory: impl FnMut(Seat) -> T) -> Self {
        Self {
            data: [factory(Seat::One), factory(Seat::Two)],
        }
    }

    /// Create a map from the two values, in seat order.
    pub fn from_pair(one: T, two: T) -> Self {
        Self { data: [one, two] }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_pair(value.clone(), value)
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        Seat::ALL.into_iter().zip(self.data.iter())
    }

    /// Find the seat whose value matches a predicate.
    pub fn find_seat(&self, predicate: impl Fn(&T) -> bool) -> Option<Seat> {
        self.iter().find(|(_, v)| predicate(v)).map(|(seat, _)| seat)
    }

    /// Map every entry to a new value.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> PlayerMap<U> {
        PlayerMap::from_pair(f(&self.data[0]), f(&self.data[1]))
    }
}

impl<T> Index<Seat> for PlayerMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for PlayerMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}
