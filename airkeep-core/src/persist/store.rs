//! Load/store orchestration for the engine state
//!
//! Every operation acquires the storage device for its own duration and
//! releases it afterwards, so other users of the bus can run between calls.

use crate::config::PersistConfig;
use crate::state::StateBlob;
use crate::traits::fusion::{FusionEngine, RAW_STATE_SIZE, STATE_SIZE};
use crate::traits::storage::{DeviceSession, NvStorage, StorageError};

/// Errors from state persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Storage device failed
    Storage(StorageError),
    /// Stored checksum does not match the stored state
    ChecksumMismatch,
}

impl From<StorageError> for PersistError {
    fn from(e: StorageError) -> Self {
        PersistError::Storage(e)
    }
}

/// Persists the fusion engine's state blob on a storage device
pub struct StatePersistence<S> {
    storage: S,
    config: PersistConfig,
}

impl<S: NvStorage> StatePersistence<S> {
    /// Create a new persistence layer
    ///
    /// The device is expected to be released; it is only initialized
    /// for the duration of each `store`/`load`.
    pub fn new(storage: S, config: PersistConfig) -> Self {
        Self { storage, config }
    }

    /// Get the active configuration
    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// Get the storage device
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get mutable access to the storage device
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Consume the persistence layer and return the storage device
    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Save the engine's current state
    pub fn store<E: FusionEngine + ?Sized>(&mut self, engine: &mut E) -> Result<(), PersistError> {
        let mut state = [0u8; STATE_SIZE];
        engine.state(&mut state);
        let raw = StateBlob::seal(state).to_bytes();

        let mut session = DeviceSession::acquire(&mut self.storage)?;
        session.write(&raw, self.config.state_address)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Stored {} bytes of engine state at {:#x}",
            raw.len(),
            self.config.state_address
        );

        Ok(())
    }

    /// Read saved state back into the engine
    ///
    /// The engine is left untouched unless the stored blob is intact.
    pub fn load<E: FusionEngine + ?Sized>(&mut self, engine: &mut E) -> Result<(), PersistError> {
        let mut raw = [0u8; RAW_STATE_SIZE];
        {
            let mut session = DeviceSession::acquire(&mut self.storage)?;
            session.read(&mut raw, self.config.state_address)?;
        }

        let blob = StateBlob::from_bytes(&raw);
        if !blob.is_valid() {
            return Err(PersistError::ChecksumMismatch);
        }

        engine.set_state(blob.state());
        Ok(())
    }

    /// Restore state at boot
    ///
    /// Returns true if saved state was applied. On false the engine keeps
    /// its defaults; whether that is acceptable is up to the caller.
    pub fn restore<E: FusionEngine + ?Sized>(&mut self, engine: &mut E) -> bool {
        match self.load(engine) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("Restored engine state from storage");
                true
            }
            Err(PersistError::ChecksumMismatch) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("No valid engine state stored, using defaults");
                false
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Failed to load engine state: {:?}, using defaults", _e);
                false
            }
        }
    }
}
