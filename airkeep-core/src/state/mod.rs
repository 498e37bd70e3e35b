//! Persisted engine state format

pub mod blob;

pub use blob::{checksum, StateBlob, CHECKSUM_SEED};
