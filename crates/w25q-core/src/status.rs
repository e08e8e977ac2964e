//! Status register codec
//!
//! The W25Q64 has two 8-bit status registers. Each is exposed three ways
//! over the same bits:
//!
//! - an ordered array of 8 booleans, index *i* = bit *i* (LSB first)
//! - a named bit index ([`Status1Bit`], [`Status2Bit`])
//! - a `bitflags` set ([`Status1`], [`Status2`])
//!
//! All 8 bits map through uniformly; read-only and reserved bits are not
//! treated specially.

use bitflags::bitflags;

/// Bits per status register
pub const STATUS_BITS: usize = 8;

bitflags! {
    /// Status Register 1
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status1: u8 {
        /// Erase/program in progress
        const BUSY = 1 << 0;
        /// Write Enable Latch
        const WEL  = 1 << 1;
        /// Block Protect bit 0
        const BP0  = 1 << 2;
        /// Block Protect bit 1
        const BP1  = 1 << 3;
        /// Block Protect bit 2
        const BP2  = 1 << 4;
        /// Top/Bottom Protect
        const TB   = 1 << 5;
        /// Sector/Block Protect
        const SEC  = 1 << 6;
        /// Status Register Protect 0
        const SRP0 = 1 << 7;
    }
}

bitflags! {
    /// Status Register 2
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status2: u8 {
        /// Status Register Protect 1
        const SRP1 = 1 << 0;
        /// Quad Enable
        const QE   = 1 << 1;
        /// Reserved
        const R    = 1 << 2;
        /// Security Register Lock 1
        const LB1  = 1 << 3;
        /// Security Register Lock 2
        const LB2  = 1 << 4;
        /// Security Register Lock 3
        const LB3  = 1 << 5;
        /// Complement Protect
        const CMP  = 1 << 6;
        /// Erase/Program Suspend Status
        const SUS  = 1 << 7;
    }
}

/// Bit positions in Status Register 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status1Bit {
    /// Erase/program in progress
    Busy = 0,
    /// Write Enable Latch
    Wel = 1,
    /// Block Protect bit 0
    Bp0 = 2,
    /// Block Protect bit 1
    Bp1 = 3,
    /// Block Protect bit 2
    Bp2 = 4,
    /// Top/Bottom Protect
    Tb = 5,
    /// Sector/Block Protect
    Sec = 6,
    /// Status Register Protect 0
    Srp0 = 7,
}

/// Bit positions in Status Register 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status2Bit {
    /// Status Register Protect 1
    Srp1 = 0,
    /// Quad Enable
    Qe = 1,
    /// Reserved
    R = 2,
    /// Security Register Lock 1
    Lb1 = 3,
    /// Security Register Lock 2
    Lb2 = 4,
    /// Security Register Lock 3
    Lb3 = 5,
    /// Complement Protect
    Cmp = 6,
    /// Erase/Program Suspend Status
    Sus = 7,
}

/// Split a status byte into 8 flags, bit *i* → index *i*
pub fn decode_register(byte: u8) -> [bool; STATUS_BITS] {
    core::array::from_fn(|i| byte & (1 << i) != 0)
}

/// Pack 8 flags into a status byte, index *i* → bit *i*
pub fn encode_register(flags: &[bool; STATUS_BITS]) -> u8 {
    flags
        .iter()
        .enumerate()
        .fold(0u8, |byte, (i, &set)| if set { byte | (1 << i) } else { byte })
}

/// Both status registers as flag arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusRegisters {
    /// Status Register 1: BUSY, WEL, BP0, BP1, BP2, TB, SEC, SRP0
    pub reg1: [bool; STATUS_BITS],
    /// Status Register 2: SRP1, QE, R, LB1, LB2, LB3, CMP, SUS
    pub reg2: [bool; STATUS_BITS],
}

impl StatusRegisters {
    /// Decode the raw SR1 and SR2 bytes
    pub fn decode_pair(sr1: u8, sr2: u8) -> Self {
        Self {
            reg1: decode_register(sr1),
            reg2: decode_register(sr2),
        }
    }

    /// Encode to `[SR1, SR2]`, the order Write Status Register expects
    pub fn encode_pair(&self) -> [u8; 2] {
        [encode_register(&self.reg1), encode_register(&self.reg2)]
    }

    /// Status Register 1 as flags
    pub fn status1(&self) -> Status1 {
        Status1::from_bits_retain(encode_register(&self.reg1))
    }

    /// Status Register 2 as flags
    pub fn status2(&self) -> Status2 {
        Status2::from_bits_retain(encode_register(&self.reg2))
    }

    /// Read one bit of Status Register 1
    pub fn flag1(&self, bit: Status1Bit) -> bool {
        self.reg1[bit as usize]
    }

    /// Read one bit of Status Register 2
    pub fn flag2(&self, bit: Status2Bit) -> bool {
        self.reg2[bit as usize]
    }

    /// Set or clear one bit of Status Register 1
    pub fn set_flag1(&mut self, bit: Status1Bit, value: bool) {
        self.reg1[bit as usize] = value;
    }

    /// Set or clear one bit of Status Register 2
    pub fn set_flag2(&mut self, bit: Status2Bit, value: bool) {
        self.reg2[bit as usize] = value;
    }

    /// An erase or program is still running
    pub fn is_busy(&self) -> bool {
        self.flag1(Status1Bit::Busy)
    }

    /// The write enable latch is set
    pub fn is_write_enabled(&self) -> bool {
        self.flag1(Status1Bit::Wel)
    }

    /// An erase or program is suspended
    pub fn is_suspended(&self) -> bool {
        self.flag2(Status2Bit::Sus)
    }
}

impl From<(Status1, Status2)> for StatusRegisters {
    fn from((sr1, sr2): (Status1, Status2)) -> Self {
        Self::decode_pair(sr1.bits(), sr2.bits())
    }
}
