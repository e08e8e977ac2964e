//! W25Q instruction opcodes
//!
//! Opcode values for the Winbond W25Q64 standard, dual and quad SPI
//! instruction sets. Only the standard single-wire instructions are issued by
//! this crate; the multi-I/O opcodes are kept so callers can name them.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - required before any write/erase operation
pub const WREN: u8 = 0x06;
/// Write Enable for Volatile Status Register
pub const VWREN: u8 = 0x50;
/// Write Disable - clears WEL bit in status register
pub const WRDI: u8 = 0x04;

// ============================================================================
// Status register operations
// ============================================================================

/// Read Status Register 1
pub const RDSR: u8 = 0x05;
/// Read Status Register 2
pub const RDSR2: u8 = 0x35;
/// Write Status Register (SR1, then SR2)
pub const WRSR: u8 = 0x01;

// ============================================================================
// Program and erase
// ============================================================================

/// Page Program
pub const PP: u8 = 0x02;
/// Sector Erase 4KB
pub const SE_20: u8 = 0x20;
/// Block Erase 32KB
pub const BE_52: u8 = 0x52;
/// Block Erase 64KB
pub const BE_D8: u8 = 0xD8;
/// Chip Erase
pub const CE_C7: u8 = 0xC7;
/// Erase/Program Suspend
pub const SUSPEND: u8 = 0x75;
/// Erase/Program Resume
pub const RESUME: u8 = 0x7A;

// ============================================================================
// Power management
// ============================================================================

/// Power Down
pub const DP: u8 = 0xB9;
/// Release Power Down / Device ID
pub const RDP: u8 = 0xAB;

// ============================================================================
// Read
// ============================================================================

/// Read Data
pub const READ: u8 = 0x03;
/// Fast Read (one dummy byte)
pub const FAST_READ: u8 = 0x0B;

// ============================================================================
// Identification
// ============================================================================

/// Manufacturer/Device ID
pub const REMS: u8 = 0x90;
/// JEDEC ID
pub const RDID: u8 = 0x9F;
/// Read Unique ID
pub const RDUID: u8 = 0x4B;
/// Read SFDP Register
pub const RDSFDP: u8 = 0x5A;

// ============================================================================
// Security registers
// ============================================================================

/// Erase Security Register
pub const ERSR: u8 = 0x44;
/// Program Security Register
pub const PRSR: u8 = 0x42;
/// Read Security Register
pub const RDSR_SEC: u8 = 0x48;

// ============================================================================
// Mode control
// ============================================================================

/// Enable QPI
pub const EQIO: u8 = 0x38;
/// Enable Reset
pub const RSTEN: u8 = 0x66;
/// Reset Device
pub const RST: u8 = 0x99;
/// Set Read Parameters
pub const SRP: u8 = 0xC0;
/// Burst Read with Wrap
pub const BURST_READ_WRAP: u8 = 0x0C;

// ============================================================================
// Dual SPI
// ============================================================================

/// Fast Read Dual Output (1-1-2)
pub const DOR: u8 = 0x3B;
/// Fast Read Dual I/O (1-2-2)
pub const DIOR: u8 = 0xBB;
/// Manufacturer/Device ID by Dual I/O
pub const REMS_DUAL: u8 = 0x92;

// ============================================================================
// Quad SPI
// ============================================================================

/// Quad Page Program
pub const QPP: u8 = 0x32;
/// Fast Read Quad Output (1-1-4)
pub const QOR: u8 = 0x6B;
/// Fast Read Quad I/O (1-4-4)
pub const QIOR: u8 = 0xEB;
/// Word Read Quad I/O
pub const QWIOR: u8 = 0xE7;
/// Octal Word Read Quad I/O
pub const QOWIOR: u8 = 0xE3;
/// Set Burst with Wrap
pub const SET_BURST_WRAP: u8 = 0x77;
/// Manufacturer/Device ID by Quad I/O
pub const REMS_QUAD: u8 = 0x94;
