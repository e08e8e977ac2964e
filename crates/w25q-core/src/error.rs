//! Error types for w25q-core
//!
//! The flash protocol itself has no error reporting: the chip never NACKs and
//! silently ignores instructions it cannot accept. The failures this crate
//! can see are the ones the bus implementation reports, plus commands built
//! with a data phase or address their instruction does not take.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Asserting or releasing chip select failed
    ChipSelectFailed,
    /// Transmitting or receiving bytes failed
    SpiTransferFailed,
    /// The bus is not ready (not initialized or owned elsewhere)
    BusNotReady,
    /// Command address or data phase does not fit its instruction
    InvalidCommand,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChipSelectFailed => write!(f, "chip select failed"),
            Self::SpiTransferFailed => write!(f, "SPI transfer failed"),
            Self::BusNotReady => write!(f, "SPI bus not ready"),
            Self::InvalidCommand => write!(f, "command does not match instruction shape"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
