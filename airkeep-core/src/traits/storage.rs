//! Non-volatile storage traits

/// Errors that can occur with non-volatile storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Device did not acknowledge its bus address
    DeviceUnresponsive,
    /// A bus transaction failed mid-transfer
    Bus,
    /// Device stayed busy after a write for longer than the timeout
    WriteTimeout,
    /// Operation attempted before `init`
    NotInitialized,
    /// Span extends past the end of the address space
    OutOfRange,
}

/// Byte-addressable non-volatile storage device
///
/// Implementations address memory linearly from 0. A device must be
/// initialized before `read` or `write`; see [`DeviceSession`] for the
/// scoped form used by the persistence layer.
///
/// No operation retries internally. A failed `read` or `write` leaves
/// the affected span unspecified.
pub trait NvStorage {
    /// Initialize using the device's default bus address
    ///
    /// Calling this on an initialized device succeeds without touching the bus.
    fn init(&mut self) -> Result<(), StorageError>;

    /// Initialize using an explicit 7-bit bus address
    fn init_with_address(&mut self, address: u8) -> Result<(), StorageError>;

    /// Release the device
    ///
    /// Safe to call when already released.
    fn deinit(&mut self);

    /// Check if the device is currently initialized
    fn is_initialized(&self) -> bool;

    /// Total addressable size in bytes
    fn capacity(&self) -> u32;

    /// Fill `buffer` from device memory starting at `address`
    fn read(&mut self, buffer: &mut [u8], address: u32) -> Result<(), StorageError>;

    /// Write `data` to device memory starting at `address`
    fn write(&mut self, data: &[u8], address: u32) -> Result<(), StorageError>;
}

impl<S: NvStorage + ?Sized> NvStorage for &mut S {
    fn init(&mut self) -> Result<(), StorageError> {
        (**self).init()
    }

    fn init_with_address(&mut self, address: u8) -> Result<(), StorageError> {
        (**self).init_with_address(address)
    }

    fn deinit(&mut self) {
        (**self).deinit()
    }

    fn is_initialized(&self) -> bool {
        (**self).is_initialized()
    }

    fn capacity(&self) -> u32 {
        (**self).capacity()
    }

    fn read(&mut self, buffer: &mut [u8], address: u32) -> Result<(), StorageError> {
        (**self).read(buffer, address)
    }

    fn write(&mut self, data: &[u8], address: u32) -> Result<(), StorageError> {
        (**self).write(data, address)
    }
}

/// Scoped ownership of an initialized storage device
///
/// `acquire` initializes the device; dropping the session deinitializes
/// it again, on success and error paths alike.
pub struct DeviceSession<'a, S: NvStorage + ?Sized> {
    device: &'a mut S,
}

impl<'a, S: NvStorage + ?Sized> DeviceSession<'a, S> {
    /// Initialize the device and hold it until the session is dropped
    pub fn acquire(device: &'a mut S) -> Result<Self, StorageError> {
        device.init()?;
        Ok(Self { device })
    }

    /// Read from the held device
    pub fn read(&mut self, buffer: &mut [u8], address: u32) -> Result<(), StorageError> {
        self.device.read(buffer, address)
    }

    /// Write to the held device
    pub fn write(&mut self, data: &[u8], address: u32) -> Result<(), StorageError> {
        self.device.write(data, address)
    }
}

impl<S: NvStorage + ?Sized> Drop for DeviceSession<'_, S> {
    fn drop(&mut self) {
        self.device.deinit();
    }
}
