//! Protocol implementations
//!
//! `sequencer` executes single transactions; `w25q` builds the W25Q
//! instruction sequences on top of it.

pub mod sequencer;
mod w25q;

pub use sequencer::{execute, execute_with_write_enable};
pub use w25q::*;
