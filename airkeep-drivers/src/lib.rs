//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in airkeep-core for storage hardware:
//!
//! - Serial EEPROMs (M24C16 and compatible 24C16 parts)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod eeprom;
