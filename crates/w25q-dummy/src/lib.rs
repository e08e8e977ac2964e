//! w25q-dummy - In-memory W25Q64 emulator
//!
//! This crate provides a byte-level model of a W25Q64 serial flash for
//! exercising `w25q-core` without hardware. It implements
//! [`SpiBus`](w25q_core::bus::SpiBus), interprets each chip-select bracket
//! as one instruction and records every bus call for inspection.
//!
//! # Options
//!
//! [`parse_options`] builds a [`DummyConfig`] from `key=value` pairs:
//! `size` (KiB), `mfr`, `jedec`, `devid` and `uid`.

pub mod config;
pub mod device;
pub mod error;

pub use config::{parse_option_string, parse_options, DummyConfig};
pub use device::{BusEvent, DummyFlash, SECURITY_REGISTER_SIZE};
pub use error::{DummyError, Result};
