//! Bitbang SPI bus
//!
//! For boards that drive the flash from plain GPIO pins. Implement
//! [`BitbangSpiMaster`] for the pins and wrap it in a [`BitbangBus`] to get an
//! [`SpiBus`]. Transfers are SPI mode 0 (CPOL=0, CPHA=0), MSB first, single
//! wire only.

use super::SpiBus;
use crate::error::Result;

/// Trait for low-level bitbang SPI operations
///
/// This trait provides the minimal set of pin operations needed for
/// bitbanging SPI mode 0.
pub trait BitbangSpiMaster {
    /// Set chip select (CS is active low, so `active=true` means CS=0)
    fn set_cs(&mut self, active: bool);

    /// Set clock line value
    fn set_sck(&mut self, high: bool);

    /// Set MOSI line value
    fn set_mosi(&mut self, high: bool);

    /// Get MISO line value
    fn get_miso(&self) -> bool;

    /// Delay for half a clock period
    fn half_period_delay(&self);

    /// Optional: Set SCK and MOSI atomically (optimization)
    ///
    /// Default implementation calls `set_sck` then `set_mosi`.
    fn set_sck_set_mosi(&mut self, sck: bool, mosi: bool) {
        self.set_sck(sck);
        self.set_mosi(mosi);
    }

    /// Optional: Set SCK and get MISO atomically (optimization)
    ///
    /// Default implementation calls `set_sck` then `get_miso`.
    fn set_sck_get_miso(&mut self, sck: bool) -> bool {
        self.set_sck(sck);
        self.get_miso()
    }
}

/// Write a byte (MSB first)
fn write_byte<M: BitbangSpiMaster + ?Sized>(master: &mut M, byte: u8) {
    for i in (0..8).rev() {
        let bit = (byte >> i) & 1 != 0;
        master.set_sck_set_mosi(false, bit);
        master.half_period_delay();
        master.set_sck(true);
        master.half_period_delay();
    }
}

/// Read a byte (MSB first)
fn read_byte<M: BitbangSpiMaster + ?Sized>(master: &mut M) -> u8 {
    let mut byte = 0u8;
    for _ in 0..8 {
        master.set_sck(false);
        master.half_period_delay();
        byte <<= 1;
        if master.set_sck_get_miso(true) {
            byte |= 1;
        }
        master.half_period_delay();
    }
    byte
}

/// [`SpiBus`] over bitbanged GPIO pins
pub struct BitbangBus<P> {
    pins: P,
}

impl<P: BitbangSpiMaster> BitbangBus<P> {
    /// Wrap the pins; CS is released and SCK parked low
    pub fn new(mut pins: P) -> Self {
        pins.set_cs(false);
        pins.set_sck(false);
        Self { pins }
    }

    /// Get the pins back
    pub fn release(self) -> P {
        self.pins
    }

    /// Borrow the pins
    pub fn pins(&self) -> &P {
        &self.pins
    }
}

impl<P: BitbangSpiMaster> SpiBus for BitbangBus<P> {
    fn select(&mut self) -> Result<()> {
        self.pins.set_sck(false);
        self.pins.set_cs(true);
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        self.pins.set_sck(false);
        self.pins.set_cs(false);
        Ok(())
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            write_byte(&mut self.pins, byte);
        }
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<()> {
        for byte in buf.iter_mut() {
            *byte = read_byte(&mut self.pins);
        }
        Ok(())
    }
}
