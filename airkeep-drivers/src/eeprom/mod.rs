//! EEPROM driver implementations

pub mod addressing;
pub mod m24c16;

#[cfg(test)]
mod mock;

pub use addressing::{BlockAddress, CAPACITY, CHUNK_SIZE};
pub use m24c16::{M24c16, M24c16Config};
