//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `Card`: Static card data (directional values, element, rarity)
//! - `HandCard`: A card dealt into a hand, not yet placed
//! - `CardInstance`: A placed card with original and current owner
//! - `CardRegistry`: Card record lookup and deck resolution

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{Card, CardId, CardValues, Element, Rarity};
pub use instance::{CardInstance, HandCard, InstanceId};
pub use registry::{CardRegistry, CardRegistryError};
