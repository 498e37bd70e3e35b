//! Simulated M24C16 on a mock I2C bus

use core::cell::Cell;

use airkeep_core::traits::Clock;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use heapless::Vec;

use super::addressing::{BLOCK_SIZE, CAPACITY, CHUNK_SIZE};

/// Error returned by [`MockBus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub ErrorKind);

impl embedded_hal::i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// I2C bus with one M24C16 attached
pub struct MockBus {
    /// Device array, erased to 0xFF
    pub memory: [u8; CAPACITY],
    /// Base address the device answers on
    pub base: u8,
    /// Whether the device is on the bus at all
    pub present: bool,
    /// Probes the device NACKs after each data write (write cycle length)
    pub busy_polls: u32,
    /// Fail the data write with this index (0-based)
    pub fail_data_write: Option<usize>,
    /// Fail every read transfer
    pub fail_reads: bool,
    /// Empty-write probes seen, answered or not
    pub probes: u32,
    /// Payload length of each data write
    pub data_writes: Vec<usize, 64>,
    /// Length of each read transfer
    pub reads: Vec<usize, 64>,
    /// Target address of each non-probe transaction
    pub bus_addresses: Vec<u8, 64>,
    busy_remaining: u32,
    cursor: usize,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            memory: [0xFF; CAPACITY],
            base: 0x50,
            present: true,
            busy_polls: 0,
            fail_data_write: None,
            fail_reads: false,
            probes: 0,
            data_writes: Vec::new(),
            reads: Vec::new(),
            bus_addresses: Vec::new(),
            busy_remaining: 0,
            cursor: 0,
        }
    }

    fn nack() -> MockError {
        MockError(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
    }

    fn write_page(&mut self, block: usize, offset: usize, payload: &[u8]) {
        // The address counter wraps inside the 16-byte write page
        let page_start = block * BLOCK_SIZE + (offset & !(CHUNK_SIZE - 1));
        for (i, &byte) in payload.iter().enumerate() {
            let column = (offset + i) % CHUNK_SIZE;
            self.memory[page_start + column] = byte;
        }
    }
}

impl ErrorType for MockBus {
    type Error = MockError;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let is_probe = matches!(operations, [Operation::Write(bytes)] if bytes.is_empty());
        if is_probe {
            self.probes += 1;
        } else {
            let _ = self.bus_addresses.push(address);
        }

        if !self.present || address & !0b111 != self.base {
            return Err(Self::nack());
        }
        if self.busy_remaining > 0 {
            self.busy_remaining -= 1;
            return Err(Self::nack());
        }

        let block = (address & 0b111) as usize;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => match bytes.split_first() {
                    None => {}
                    Some((&offset, [])) => {
                        self.cursor = block * BLOCK_SIZE + offset as usize;
                    }
                    Some((&offset, payload)) => {
                        let index = self.data_writes.len();
                        let _ = self.data_writes.push(payload.len());
                        if self.fail_data_write == Some(index) {
                            return Err(MockError(ErrorKind::Bus));
                        }
                        self.write_page(block, offset as usize, payload);
                        self.busy_remaining = self.busy_polls;
                    }
                },
                Operation::Read(buffer) => {
                    let _ = self.reads.push(buffer.len());
                    if self.fail_reads {
                        return Err(MockError(ErrorKind::Bus));
                    }
                    for byte in buffer.iter_mut() {
                        *byte = self.memory[self.cursor];
                        self.cursor = (self.cursor + 1) % CAPACITY;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Clock that advances by a fixed step every time it is read
pub struct StepClock {
    start: u32,
    now: Cell<u32>,
    step: u32,
}

impl StepClock {
    pub fn new(step: u32) -> Self {
        Self::starting_at(0, step)
    }

    pub fn starting_at(start: u32, step: u32) -> Self {
        Self {
            start,
            now: Cell::new(start),
            step,
        }
    }

    /// Time consumed since creation (ms)
    pub fn elapsed(&self) -> u32 {
        self.now.get().wrapping_sub(self.start)
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}
