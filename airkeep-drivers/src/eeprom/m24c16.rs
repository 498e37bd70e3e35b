//! M24C16 serial EEPROM driver
//!
//! 16 Kbit (2 KiB) I2C EEPROM. The device answers on eight consecutive
//! addresses, one per 256-byte block; see [`super::addressing`].
//!
//! # Write cycle
//!
//! After each page write the device runs an internal write cycle (up to
//! 5 ms) during which it does not acknowledge its address. The driver
//! polls with an empty write until the device answers again, bounded by
//! `ready_timeout_ms`. A timeout fails the whole write with
//! [`StorageError::WriteTimeout`].

use airkeep_core::traits::{Clock, NvStorage, StorageError};
use embedded_hal::i2c::I2c;

use super::addressing::{chunks, CAPACITY, CHUNK_SIZE};

/// Default 7-bit I2C address (E1/E2 strapped low, block 0)
pub const DEFAULT_ADDRESS: u8 = 0x50;

/// Default bound on the write-cycle poll (ms)
pub const DEFAULT_READY_TIMEOUT_MS: u32 = 1000;

/// M24C16 driver configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct M24c16Config {
    /// Base I2C address used by `init()`
    pub address: u8,
    /// Give up waiting for a write cycle after this long (ms)
    pub ready_timeout_ms: u32,
}

impl Default for M24c16Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
        }
    }
}

/// M24C16 EEPROM on an I2C bus
pub struct M24c16<I2C, CLK> {
    i2c: I2C,
    clock: CLK,
    config: M24c16Config,
    /// Base address in use (block 0)
    address: u8,
    initialized: bool,
}

impl<I2C, CLK> M24c16<I2C, CLK>
where
    I2C: I2c,
    CLK: Clock,
{
    /// Create a new driver
    ///
    /// No bus traffic happens until `init`.
    pub fn new(i2c: I2C, clock: CLK, config: M24c16Config) -> Self {
        Self {
            i2c,
            clock,
            config,
            address: config.address,
            initialized: false,
        }
    }

    /// Consume the driver and return the bus and clock
    pub fn release(self) -> (I2C, CLK) {
        (self.i2c, self.clock)
    }

    /// Base I2C address in use
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Check if the device acknowledges its base address
    fn is_connected(&mut self) -> bool {
        self.i2c.write(self.address, &[]).is_ok()
    }

    /// Busy-wait until the internal write cycle is finished
    fn wait_until_ready(&mut self) -> Result<(), StorageError> {
        let start = self.clock.now_ms();
        loop {
            if self.is_connected() {
                return Ok(());
            }
            if self.clock.now_ms().wrapping_sub(start) > self.config.ready_timeout_ms {
                return Err(StorageError::WriteTimeout);
            }
        }
    }

    fn check_span(&self, len: usize, address: u32) -> Result<(), StorageError> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        let end = (address as usize)
            .checked_add(len)
            .ok_or(StorageError::OutOfRange)?;
        if end > CAPACITY {
            return Err(StorageError::OutOfRange);
        }
        Ok(())
    }
}

impl<I2C, CLK> NvStorage for M24c16<I2C, CLK>
where
    I2C: I2c,
    CLK: Clock,
{
    fn init(&mut self) -> Result<(), StorageError> {
        self.init_with_address(self.config.address)
    }

    fn init_with_address(&mut self, address: u8) -> Result<(), StorageError> {
        if self.initialized {
            return Ok(());
        }

        self.address = address;
        self.initialized = self.is_connected();
        if !self.initialized {
            #[cfg(feature = "defmt")]
            defmt::debug!("M24C16 not responding at {:#x}", address);
            return Err(StorageError::DeviceUnresponsive);
        }
        Ok(())
    }

    fn deinit(&mut self) {
        self.initialized = false;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn capacity(&self) -> u32 {
        CAPACITY as u32
    }

    fn read(&mut self, buffer: &mut [u8], address: u32) -> Result<(), StorageError> {
        self.check_span(buffer.len(), address)?;

        for chunk in chunks(address, buffer.len()) {
            let bus_address = chunk.address.bus_address(self.address);
            self.i2c
                .write(bus_address, &[chunk.address.offset])
                .map_err(|_| StorageError::Bus)?;
            self.i2c
                .read(bus_address, &mut buffer[chunk.range])
                .map_err(|_| StorageError::Bus)?;
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8], address: u32) -> Result<(), StorageError> {
        self.check_span(data.len(), address)?;

        let mut frame = [0u8; CHUNK_SIZE + 1];
        for chunk in chunks(address, data.len()) {
            let len = chunk.range.len();
            frame[0] = chunk.address.offset;
            frame[1..=len].copy_from_slice(&data[chunk.range]);

            self.i2c
                .write(chunk.address.bus_address(self.address), &frame[..=len])
                .map_err(|_| StorageError::Bus)?;

            if let Err(e) = self.wait_until_ready() {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "M24C16 write cycle timed out after {} ms",
                    self.config.ready_timeout_ms
                );
                return Err(e);
            }
        }
        Ok(())
    }
}
