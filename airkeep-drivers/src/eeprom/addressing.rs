//! M24C16 address translation and transfer chunking
//!
//! The 2 KiB array is split into eight 256-byte blocks. A block is selected
//! by the low three bits of the I2C address, the byte within the block by
//! the single address byte that starts every transfer:
//!
//! ```text
//! linear address:  0b_0000_0bbb_oooo_oooo
//!                         │││ └────┬───┘
//!                         │││      └── in-block offset (address byte)
//!                         └┴┴───────── block select (I2C address bits 0-2)
//! ```

use core::ops::Range;

/// Bytes addressable through one I2C address
pub const BLOCK_SIZE: usize = 256;

/// Number of blocks (I2C sub-addresses)
pub const BLOCK_COUNT: usize = 8;

/// Total device capacity in bytes
pub const CAPACITY: usize = BLOCK_SIZE * BLOCK_COUNT;

/// Largest payload moved in one bus transaction
///
/// Also the device's write page: a write crossing a 16-byte boundary
/// rolls over to the start of the page.
pub const CHUNK_SIZE: usize = 16;

/// Linear address split into block select and in-block offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlockAddress {
    /// Block select bits (0-7)
    pub block: u8,
    /// Offset within the block
    pub offset: u8,
}

impl BlockAddress {
    /// Decompose a linear address
    ///
    /// Bits above bit 10 are ignored; callers range-check first.
    pub const fn from_linear(address: u32) -> Self {
        Self {
            block: ((address >> 8) & 0b111) as u8,
            offset: (address & 0xFF) as u8,
        }
    }

    /// I2C address selecting this block on a device at `base_address`
    pub const fn bus_address(self, base_address: u8) -> u8 {
        base_address | self.block
    }
}

/// One bus transaction's worth of a transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Device address of the first byte
    pub address: BlockAddress,
    /// Bytes of the caller's buffer covered by this chunk
    pub range: Range<usize>,
}

/// Iterator over the chunks of a transfer
///
/// Chunks never cross a 16-byte page (and therefore never a block)
/// boundary, so a transfer starting on a page boundary is split into
/// `ceil(len / 16)` chunks.
#[derive(Debug, Clone)]
pub struct Chunks {
    address: u32,
    position: usize,
    len: usize,
}

/// Split a transfer of `len` bytes at `address` into bus chunks
pub fn chunks(address: u32, len: usize) -> Chunks {
    Chunks {
        address,
        position: 0,
        len,
    }
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.position >= self.len {
            return None;
        }

        let address = self.address + self.position as u32;
        let to_page_end = CHUNK_SIZE - (address as usize % CHUNK_SIZE);
        let size = (self.len - self.position).min(to_page_end);

        let chunk = Chunk {
            address: BlockAddress::from_linear(address),
            range: self.position..self.position + size,
        };
        self.position += size;
        Some(chunk)
    }
}
