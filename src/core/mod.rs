//! Core types shared by every module: players and seats, RNG, configuration.

pub mod config;
pub mod player;
pub mod rng;

pub use config::{ConfigError, ElementalRule, HandRule, MatchConfig};
pub use player::{PlayerId, PlayerMap, Seat};
pub use rng::GameRng;
