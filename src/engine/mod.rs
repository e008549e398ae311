//! Match lifecycle.
//!
//! - `MatchEngine`: the per-match state machine
//! - `MatchSnapshot`: frozen read view
//! - `MatchRecord`: persisted form, bincode encoded
//! - `MatchEvent` / `EventSink`: notifications for the transport layer

pub mod engine;
pub mod error;
pub mod events;
pub mod record;
pub mod state;

pub use engine::MatchEngine;
pub use error::{InvalidMove, MatchError};
pub use events::{EventSink, MatchEvent, MoveApplied};
pub use record::{MatchRecord, RecordError, RECORD_VERSION};
pub use state::{MatchId, MatchOutcome, MatchSnapshot, MatchStatus, MoveRecord};
