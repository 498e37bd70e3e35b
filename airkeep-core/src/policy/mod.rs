//! Persistence policy
//!
//! Decides when the engine state is worth writing to storage.

pub mod trigger;

pub use trigger::{PersistencePolicy, PersistenceTriggerState, StoreTrigger};
