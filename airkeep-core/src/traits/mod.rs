//! Hardware abstraction traits
//!
//! These traits define the interface between the persistence logic
//! and hardware-specific implementations or external collaborators.

pub mod clock;
pub mod fusion;
pub mod storage;

pub use clock::Clock;
pub use fusion::{FusionEngine, MAX_ACCURACY, RAW_STATE_SIZE, STATE_SIZE};
pub use storage::{DeviceSession, NvStorage, StorageError};
