//! 24-bit flash addresses

/// Number of address bytes sent on the wire
pub const ADDRESS_BYTES: usize = 3;

/// A 24-bit flash address
///
/// Only the low 24 bits of the value it was built from are kept. Anything
/// above bit 23 is dropped without error, so `0x0100_0010` addresses the same
/// byte as `0x10`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlashAddress(u32);

impl FlashAddress {
    /// Mask of the meaningful address bits
    pub const MASK: u32 = 0x00FF_FFFF;

    /// Highest addressable byte (16 MiB - 1)
    pub const MAX: Self = Self(Self::MASK);

    /// Build an address, silently truncating to 24 bits
    pub const fn new(address: u32) -> Self {
        Self(address & Self::MASK)
    }

    /// Returns the address as a plain integer
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Encode the address big-endian (bits 23..16 first)
    pub const fn encode(self) -> [u8; ADDRESS_BYTES] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }
}

impl From<u32> for FlashAddress {
    fn from(address: u32) -> Self {
        let masked = Self::new(address);
        if masked.0 != address {
            log::debug!(
                "address 0x{:08X} truncated to 24 bits (0x{:06X})",
                address,
                masked.0
            );
        }
        masked
    }
}

impl From<FlashAddress> for u32 {
    fn from(address: FlashAddress) -> Self {
        address.0
    }
}
