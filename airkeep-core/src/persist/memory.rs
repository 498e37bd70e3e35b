//! In-memory storage device
//!
//! RAM-backed [`NvStorage`] for host tests and simulation. Behaves like an
//! erased EEPROM (all bytes `0xFF`) and can be told to stay unresponsive
//! or to fail the next read/write.

use crate::traits::storage::{NvStorage, StorageError};

/// Default bus address reported by the in-memory device
pub const MEMORY_DEFAULT_ADDRESS: u8 = 0x50;

/// RAM-backed storage with `N` bytes of capacity
#[derive(Debug, Clone)]
pub struct MemoryStorage<const N: usize> {
    data: [u8; N],
    address: u8,
    initialized: bool,
    responsive: bool,
    fail_next_read: bool,
    fail_next_write: bool,
    init_count: u32,
    deinit_count: u32,
}

impl<const N: usize> Default for MemoryStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MemoryStorage<N> {
    /// Create an erased device
    pub const fn new() -> Self {
        Self {
            data: [0xFF; N],
            address: MEMORY_DEFAULT_ADDRESS,
            initialized: false,
            responsive: true,
            fail_next_read: false,
            fail_next_write: false,
            init_count: 0,
            deinit_count: 0,
        }
    }

    /// Raw contents, bypassing the init state
    pub fn contents(&self) -> &[u8; N] {
        &self.data
    }

    /// Mutable raw contents, for seeding or corrupting data
    pub fn contents_mut(&mut self) -> &mut [u8; N] {
        &mut self.data
    }

    /// Make `init` fail as if nothing answered on the bus
    pub fn set_responsive(&mut self, responsive: bool) {
        self.responsive = responsive;
    }

    /// Fail the next `read` with a bus error
    pub fn fail_next_read(&mut self) {
        self.fail_next_read = true;
    }

    /// Fail the next `write` with a bus error
    pub fn fail_next_write(&mut self) {
        self.fail_next_write = true;
    }

    /// Bus address used by the last successful init
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Number of init calls that actually initialized the device
    pub fn init_count(&self) -> u32 {
        self.init_count
    }

    /// Number of deinit calls that actually released the device
    pub fn deinit_count(&self) -> u32 {
        self.deinit_count
    }

    fn span(&self, len: usize, address: u32) -> Result<core::ops::Range<usize>, StorageError> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        let start = address as usize;
        let end = start.checked_add(len).ok_or(StorageError::OutOfRange)?;
        if end > N {
            return Err(StorageError::OutOfRange);
        }
        Ok(start..end)
    }
}

impl<const N: usize> NvStorage for MemoryStorage<N> {
    fn init(&mut self) -> Result<(), StorageError> {
        self.init_with_address(MEMORY_DEFAULT_ADDRESS)
    }

    fn init_with_address(&mut self, address: u8) -> Result<(), StorageError> {
        if self.initialized {
            return Ok(());
        }
        if !self.responsive {
            return Err(StorageError::DeviceUnresponsive);
        }
        self.address = address;
        self.initialized = true;
        self.init_count += 1;
        Ok(())
    }

    fn deinit(&mut self) {
        if !self.initialized {
            return;
        }
        self.initialized = false;
        self.deinit_count += 1;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn capacity(&self) -> u32 {
        N as u32
    }

    fn read(&mut self, buffer: &mut [u8], address: u32) -> Result<(), StorageError> {
        let span = self.span(buffer.len(), address)?;
        if core::mem::take(&mut self.fail_next_read) {
            return Err(StorageError::Bus);
        }
        buffer.copy_from_slice(&self.data[span]);
        Ok(())
    }

    fn write(&mut self, data: &[u8], address: u32) -> Result<(), StorageError> {
        let span = self.span(data.len(), address)?;
        if core::mem::take(&mut self.fail_next_write) {
            return Err(StorageError::Bus);
        }
        self.data[span].copy_from_slice(data);
        Ok(())
    }
}
