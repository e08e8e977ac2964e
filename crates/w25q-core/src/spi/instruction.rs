//! Instruction catalogue
//!
//! Every instruction this crate can issue, with the shape of the transaction
//! it needs. The set is closed: adding an instruction means adding a variant
//! here, not registering one at runtime.

use super::opcodes;
use crate::protocol::{BLOCK_32K_SIZE, BLOCK_64K_SIZE, SECTOR_SIZE};

/// Phases that follow the opcode byte inside one transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferShape {
    /// Opcode only
    None,
    /// Opcode + 24-bit address
    Address,
    /// Opcode + address, then data written to the device
    AddressDataOut,
    /// Opcode + address, then data read from the device
    AddressDataIn,
    /// Opcode, then data written to the device
    DataOut,
    /// Opcode, then data read from the device
    DataIn,
    /// Opcode + address + dummy bytes, then data read from the device
    AddressDummyDataIn,
    /// Opcode + dummy bytes, then data read from the device
    DummyDataIn,
}

impl TransferShape {
    /// Returns true if the 3 address bytes follow the opcode
    pub const fn has_address(&self) -> bool {
        matches!(
            self,
            Self::Address | Self::AddressDataOut | Self::AddressDataIn | Self::AddressDummyDataIn
        )
    }

    /// Returns true if dummy bytes precede the data phase
    pub const fn has_dummy(&self) -> bool {
        matches!(self, Self::AddressDummyDataIn | Self::DummyDataIn)
    }

    /// Returns true if the data phase transmits to the device
    pub const fn writes(&self) -> bool {
        matches!(self, Self::AddressDataOut | Self::DataOut)
    }

    /// Returns true if the data phase receives from the device
    pub const fn reads(&self) -> bool {
        matches!(
            self,
            Self::AddressDataIn | Self::DataIn | Self::AddressDummyDataIn | Self::DummyDataIn
        )
    }
}

/// A W25Q instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Write Enable (06h)
    WriteEnable,
    /// Write Enable for Volatile Status Register (50h)
    VolatileSrWriteEnable,
    /// Write Disable (04h)
    WriteDisable,
    /// Read Status Register 1 (05h)
    ReadStatus1,
    /// Read Status Register 2 (35h)
    ReadStatus2,
    /// Write Status Register (01h)
    WriteStatus,
    /// Page Program (02h)
    PageProgram,
    /// Sector Erase 4KB (20h)
    SectorErase4K,
    /// Block Erase 32KB (52h)
    BlockErase32K,
    /// Block Erase 64KB (D8h)
    BlockErase64K,
    /// Chip Erase (C7h)
    ChipErase,
    /// Erase/Program Suspend (75h)
    Suspend,
    /// Erase/Program Resume (7Ah)
    Resume,
    /// Power Down (B9h)
    PowerDown,
    /// Release Power Down (ABh), no data phase
    ReleasePowerDown,
    /// Read Data (03h)
    ReadData,
    /// Fast Read (0Bh)
    FastRead,
    /// Read Security Register (48h)
    ReadSecurityRegister,
    /// Device ID read: ABh followed by 3 dummy bytes
    DeviceId,
    /// Manufacturer/Device ID (90h)
    ManufacturerDeviceId,
    /// JEDEC ID (9Fh)
    JedecId,
    /// Read Unique ID (4Bh)
    ReadUniqueId,
    /// Enable Reset (66h)
    EnableReset,
    /// Reset Device (99h)
    Reset,
}

impl Instruction {
    /// The opcode byte sent first on the wire
    pub const fn opcode(&self) -> u8 {
        match self {
            Self::WriteEnable => opcodes::WREN,
            Self::VolatileSrWriteEnable => opcodes::VWREN,
            Self::WriteDisable => opcodes::WRDI,
            Self::ReadStatus1 => opcodes::RDSR,
            Self::ReadStatus2 => opcodes::RDSR2,
            Self::WriteStatus => opcodes::WRSR,
            Self::PageProgram => opcodes::PP,
            Self::SectorErase4K => opcodes::SE_20,
            Self::BlockErase32K => opcodes::BE_52,
            Self::BlockErase64K => opcodes::BE_D8,
            Self::ChipErase => opcodes::CE_C7,
            Self::Suspend => opcodes::SUSPEND,
            Self::Resume => opcodes::RESUME,
            Self::PowerDown => opcodes::DP,
            // The device ID read reuses the release opcode; see protocol::device_id
            Self::ReleasePowerDown | Self::DeviceId => opcodes::RDP,
            Self::ReadData => opcodes::READ,
            Self::FastRead => opcodes::FAST_READ,
            Self::ReadSecurityRegister => opcodes::RDSR_SEC,
            Self::ManufacturerDeviceId => opcodes::REMS,
            Self::JedecId => opcodes::RDID,
            Self::ReadUniqueId => opcodes::RDUID,
            Self::EnableReset => opcodes::RSTEN,
            Self::Reset => opcodes::RST,
        }
    }

    /// The phases that follow the opcode
    pub const fn shape(&self) -> TransferShape {
        match self {
            Self::WriteEnable
            | Self::VolatileSrWriteEnable
            | Self::WriteDisable
            | Self::ChipErase
            | Self::Suspend
            | Self::Resume
            | Self::PowerDown
            | Self::ReleasePowerDown
            | Self::EnableReset
            | Self::Reset => TransferShape::None,
            Self::ReadStatus1 | Self::ReadStatus2 | Self::JedecId => TransferShape::DataIn,
            Self::WriteStatus => TransferShape::DataOut,
            Self::PageProgram => TransferShape::AddressDataOut,
            Self::SectorErase4K | Self::BlockErase32K | Self::BlockErase64K => {
                TransferShape::Address
            }
            Self::ReadData | Self::ManufacturerDeviceId => TransferShape::AddressDataIn,
            Self::FastRead | Self::ReadSecurityRegister => TransferShape::AddressDummyDataIn,
            Self::DeviceId | Self::ReadUniqueId => TransferShape::DummyDataIn,
        }
    }

    /// Number of zero bytes sent between the header and the data phase
    pub const fn dummy_bytes(&self) -> usize {
        match self {
            Self::FastRead | Self::ReadSecurityRegister => 1,
            Self::DeviceId => 3,
            Self::ReadUniqueId => 4,
            _ => 0,
        }
    }

    /// Returns true if the write enable latch must be set first
    ///
    /// The latch clears after every completed write-class instruction, so
    /// each of these needs its own Write Enable transaction.
    pub const fn needs_write_enable(&self) -> bool {
        matches!(
            self,
            Self::WriteStatus
                | Self::PageProgram
                | Self::SectorErase4K
                | Self::BlockErase32K
                | Self::BlockErase64K
                | Self::ChipErase
        )
    }
}

/// Erase granularity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EraseKind {
    /// 4KB sector (20h)
    Sector4K,
    /// 32KB block (52h)
    Block32K,
    /// 64KB block (D8h)
    Block64K,
    /// Whole chip (C7h), address ignored
    Chip,
}

impl EraseKind {
    /// The instruction issued for this erase
    pub const fn instruction(&self) -> Instruction {
        match self {
            Self::Sector4K => Instruction::SectorErase4K,
            Self::Block32K => Instruction::BlockErase32K,
            Self::Block64K => Instruction::BlockErase64K,
            Self::Chip => Instruction::ChipErase,
        }
    }

    /// Bytes erased, or `None` for a chip erase
    pub const fn size(&self) -> Option<u32> {
        match self {
            Self::Sector4K => Some(SECTOR_SIZE),
            Self::Block32K => Some(BLOCK_32K_SIZE),
            Self::Block64K => Some(BLOCK_64K_SIZE),
            Self::Chip => None,
        }
    }
}
