//! w25q-core - Instruction sequencing for W25Q serial NOR flash
//!
//! This crate turns logical flash operations (read, program, erase, status
//! access, power control, identification) into the exact byte sequences the
//! chip expects on its SPI bus. It is `no_std` and never owns the bus: every
//! operation borrows an [`SpiBus`](bus::SpiBus) for the duration of one call.
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for [`Error`] (includes `alloc`)
//! - `alloc` - Implement [`SpiBus`](bus::SpiBus) for `Box<dyn SpiBus + Send>`
//!
//! # Example
//!
//! ```ignore
//! use w25q_core::{bus::SpiBus, protocol};
//!
//! fn dump_status<B: SpiBus>(bus: &mut B) -> w25q_core::Result<()> {
//!     let status = protocol::read_status_registers(bus)?;
//!     if status.is_busy() {
//!         // program/erase still running, come back later
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency
//!
//! Nothing here serializes access across calls. A write or erase is two bus
//! transactions (write enable, then the instruction); callers sharing a bus
//! must hold their own lock across the whole operation.

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod bus;
pub mod error;
pub mod protocol;
pub mod spi;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
