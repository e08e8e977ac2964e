//! Bus abstractions
//!
//! This module defines the capability every transport must provide to drive
//! a flash chip: chip select control plus blocking byte transfers.

pub mod bitbang;
mod traits;

pub use bitbang::{BitbangBus, BitbangSpiMaster};
pub use traits::*;
