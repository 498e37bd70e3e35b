//! Persistence configuration
//!
//! Where the state blob lives and how often it is refreshed.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default periodic store interval: every 12 hours
pub const DEFAULT_STORE_INTERVAL_MS: u32 = 12 * 60 * 60 * 1000;

/// Default address of the state blob in non-volatile memory
pub const DEFAULT_STATE_ADDRESS: u32 = 0;

/// Persistence settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PersistConfig {
    /// Store the state at least this often (ms)
    pub store_interval_ms: u32,
    /// Linear address of the first payload byte
    ///
    /// The layout must stay stable between firmware versions, so this is
    /// only changed when the storage device is shared with other data.
    pub state_address: u32,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistConfig {
    /// Create the default configuration
    pub const fn new() -> Self {
        Self {
            store_interval_ms: DEFAULT_STORE_INTERVAL_MS,
            state_address: DEFAULT_STATE_ADDRESS,
        }
    }

    /// Override the store interval
    pub const fn with_store_interval_ms(mut self, store_interval_ms: u32) -> Self {
        self.store_interval_ms = store_interval_ms;
        self
    }

    /// Override the state address
    pub const fn with_state_address(mut self, state_address: u32) -> Self {
        self.state_address = state_address;
        self
    }
}
