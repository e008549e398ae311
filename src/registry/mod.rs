//! Many matches behind one handle, with persistence and event delivery.

pub mod registry;
pub mod store;

pub use registry::{MatchRegistry, RegistryError};
pub use store::{MatchStore, MemoryStore, StoreError};
