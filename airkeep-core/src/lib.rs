//! Board-agnostic calibration state persistence
//!
//! This crate contains all persistence logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (storage, clock, fusion engine)
//! - Checksum-guarded state blob format
//! - Load/store orchestration with scoped device access
//! - Store trigger policy (interval and accuracy milestone)
//! - IAQ level classification
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod iaq;
pub mod persist;
pub mod policy;
pub mod state;
pub mod traits;
