//! Sensor fusion engine interface
//!
//! The fusion engine (gas/IAQ estimation library) is a closed component.
//! Persistence only needs to exchange its opaque state blob and observe
//! how well calibrated it currently is.

/// Size of the engine's opaque state blob in bytes
pub const STATE_SIZE: usize = 139;

/// Size of the persisted blob: state followed by one checksum byte
pub const RAW_STATE_SIZE: usize = STATE_SIZE + 1;

/// Highest accuracy level the engine reports (fully calibrated)
pub const MAX_ACCURACY: u8 = 3;

/// Trait for the sensor fusion collaborator
pub trait FusionEngine {
    /// Accuracy level at which the engine is considered fully calibrated
    const MAX_ACCURACY: u8 = MAX_ACCURACY;

    /// Copy the engine's current state into `buffer`
    fn state(&mut self, buffer: &mut [u8; STATE_SIZE]);

    /// Restore previously saved state
    fn set_state(&mut self, state: &[u8; STATE_SIZE]);

    /// Current accuracy level (0 = unreliable, `MAX_ACCURACY` = calibrated)
    fn accuracy(&self) -> u8;
}
