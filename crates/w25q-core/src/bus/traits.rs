//! Bus trait definitions

use crate::error::Result;

/// Blocking SPI bus with software-visible chip select
///
/// This is the whole contract the sequencer relies on. Every method blocks
/// until the transfer is done; there is no partial-transfer reporting, so an
/// implementation must either move every byte or return an error.
///
/// The sequencer calls `select` and `deselect` exactly once per transaction.
/// Implementations must not toggle chip select on their own inside
/// `transmit`/`receive`, since one transaction is usually several transfers.
///
/// ## Example
///
/// ```ignore
/// impl<SPI: SpiBusWrite + SpiBusRead, CS: OutputPin> SpiBus for Board<SPI, CS> {
///     fn select(&mut self) -> Result<()> {
///         self.cs.set_low().map_err(|_| Error::ChipSelectFailed)
///     }
///     fn deselect(&mut self) -> Result<()> {
///         self.cs.set_high().map_err(|_| Error::ChipSelectFailed)
///     }
///     fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
///         self.spi.write(bytes).map_err(|_| Error::SpiTransferFailed)
///     }
///     fn receive(&mut self, buf: &mut [u8]) -> Result<()> {
///         self.spi.read(buf).map_err(|_| Error::SpiTransferFailed)
///     }
/// }
/// ```
pub trait SpiBus {
    /// Assert chip select (drive CS low)
    fn select(&mut self) -> Result<()>;

    /// Release chip select (drive CS high)
    fn deselect(&mut self) -> Result<()>;

    /// Transmit every byte of `bytes`
    fn transmit(&mut self, bytes: &[u8]) -> Result<()>;

    /// Fill `buf` with bytes clocked in from the device
    fn receive(&mut self, buf: &mut [u8]) -> Result<()>;
}

impl<B: SpiBus + ?Sized> SpiBus for &mut B {
    fn select(&mut self) -> Result<()> {
        (**self).select()
    }

    fn deselect(&mut self) -> Result<()> {
        (**self).deselect()
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).transmit(bytes)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).receive(buf)
    }
}

// Boxed buses for callers that pick a backend at runtime
#[cfg(feature = "alloc")]
impl SpiBus for alloc::boxed::Box<dyn SpiBus + Send> {
    fn select(&mut self) -> Result<()> {
        (**self).select()
    }

    fn deselect(&mut self) -> Result<()> {
        (**self).deselect()
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).transmit(bytes)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).receive(buf)
    }
}
