//! State persistence
//!
//! Moves the engine's state blob between the fusion engine and
//! non-volatile storage.

pub mod memory;
pub mod store;

pub use memory::MemoryStorage;
pub use store::{PersistError, StatePersistence};
