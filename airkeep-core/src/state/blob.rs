//! Checksum-guarded state blob
//!
//! Persisted layout:
//! ```text
//! ┌──────────────────────────┬──────────┐
//! │ STATE (opaque)           │ CHECKSUM │
//! │ STATE_SIZE bytes         │ 1B       │
//! └──────────────────────────┴──────────┘
//! ```
//!
//! CHECKSUM is the XOR of all state bytes, seeded with [`CHECKSUM_SEED`].
//! The layout is shared with already-deployed devices and must not change.

use crate::traits::fusion::{RAW_STATE_SIZE, STATE_SIZE};

/// Initial value of the XOR fold
pub const CHECKSUM_SEED: u8 = 0xBB;

/// Fold `payload` into a one-byte checksum
///
/// Catches any single-bit corruption. Multi-bit flips that cancel under
/// XOR go unnoticed, so this is an integrity hint rather than a CRC.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(CHECKSUM_SEED, |acc, &byte| acc ^ byte)
}

/// Engine state plus its checksum, as stored on the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBlob {
    /// Opaque engine state
    state: [u8; STATE_SIZE],
    /// Checksum byte as stored (may not match `state` for loaded blobs)
    checksum: u8,
}

impl StateBlob {
    /// Wrap engine state, computing a matching checksum
    pub fn seal(state: [u8; STATE_SIZE]) -> Self {
        let checksum = checksum(&state);
        Self { state, checksum }
    }

    /// Split raw device bytes into state and stored checksum
    ///
    /// No validation happens here; see [`StateBlob::is_valid`].
    pub fn from_bytes(raw: &[u8; RAW_STATE_SIZE]) -> Self {
        let mut state = [0u8; STATE_SIZE];
        state.copy_from_slice(&raw[..STATE_SIZE]);
        Self {
            state,
            checksum: raw[STATE_SIZE],
        }
    }

    /// Encode into the persisted layout
    pub fn to_bytes(&self) -> [u8; RAW_STATE_SIZE] {
        let mut raw = [0u8; RAW_STATE_SIZE];
        raw[..STATE_SIZE].copy_from_slice(&self.state);
        raw[STATE_SIZE] = self.checksum;
        raw
    }

    /// Engine state bytes
    pub fn state(&self) -> &[u8; STATE_SIZE] {
        &self.state
    }

    /// Checksum byte carried by the blob
    pub fn stored_checksum(&self) -> u8 {
        self.checksum
    }

    /// Check the stored checksum against the state bytes
    pub fn is_valid(&self) -> bool {
        checksum(&self.state) == self.checksum
    }
}
