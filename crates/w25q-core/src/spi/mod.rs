//! SPI types and command structures
//!
//! This module provides the 24-bit address codec, the W25Q opcode table, the
//! closed instruction catalogue and the per-transaction command type.

mod address;
mod command;
mod instruction;
pub mod opcodes;

pub use address::{FlashAddress, ADDRESS_BYTES};
pub use command::{Payload, SpiCommand};
pub use instruction::{EraseKind, Instruction, TransferShape};
pub use opcodes::*;
