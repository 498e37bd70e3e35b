//! Configuration types
//!
//! Board-agnostic persistence settings.

pub mod persist;

pub use persist::*;
