//! SPI command structure

use super::{FlashAddress, Instruction};

/// Data phase of a transaction
#[derive(Debug)]
pub enum Payload<'a> {
    /// No data phase
    None,
    /// Bytes transmitted to the device
    Write(&'a [u8]),
    /// Buffer filled from the device
    Read(&'a mut [u8]),
}

impl Payload<'_> {
    /// Number of bytes in the data phase
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Write(data) => data.len(),
            Self::Read(buf) => buf.len(),
        }
    }

    /// Returns true if the data phase is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single SPI transaction
///
/// Designed to avoid allocation - the payload borrows the caller's buffers.
/// The instruction decides whether address and dummy bytes are sent; the
/// payload decides the direction and length of the data phase.
#[derive(Debug)]
pub struct SpiCommand<'a> {
    /// The instruction (opcode + shape)
    pub instruction: Instruction,

    /// Address, sent only if the instruction's shape has one
    pub address: Option<FlashAddress>,

    /// Data phase
    pub payload: Payload<'a>,
}

impl<'a> SpiCommand<'a> {
    /// Create a command with no address or data (e.g., WREN, DP)
    pub fn simple(instruction: Instruction) -> Self {
        Self {
            instruction,
            address: None,
            payload: Payload::None,
        }
    }

    /// Create a read command with no address (e.g., RDSR, RDID)
    pub fn read_reg(instruction: Instruction, buf: &'a mut [u8]) -> Self {
        Self {
            instruction,
            address: None,
            payload: Payload::Read(buf),
        }
    }

    /// Create a write command with no address (e.g., WRSR)
    pub fn write_reg(instruction: Instruction, data: &'a [u8]) -> Self {
        Self {
            instruction,
            address: None,
            payload: Payload::Write(data),
        }
    }

    /// Create an addressed read command (e.g., READ, FAST_READ)
    pub fn read(instruction: Instruction, addr: FlashAddress, buf: &'a mut [u8]) -> Self {
        Self {
            instruction,
            address: Some(addr),
            payload: Payload::Read(buf),
        }
    }

    /// Create an addressed write command (e.g., PP)
    pub fn write(instruction: Instruction, addr: FlashAddress, data: &'a [u8]) -> Self {
        Self {
            instruction,
            address: Some(addr),
            payload: Payload::Write(data),
        }
    }

    /// Create an addressed command with no data phase (e.g., SE)
    pub fn erase(instruction: Instruction, addr: FlashAddress) -> Self {
        Self {
            instruction,
            address: Some(addr),
            payload: Payload::None,
        }
    }

    /// Opcode byte
    pub fn opcode(&self) -> u8 {
        self.instruction.opcode()
    }

    /// Returns true if this command has an address phase
    pub fn has_address(&self) -> bool {
        self.instruction.shape().has_address()
    }

    /// Returns true if the address and data phase match the instruction
    ///
    /// An address must be present exactly when the shape has one. A write
    /// payload needs a transmitting shape and a read payload a receiving one;
    /// `Payload::None` is an empty data phase and fits any shape.
    pub fn fits_shape(&self) -> bool {
        let shape = self.instruction.shape();
        let direction = match self.payload {
            Payload::None => true,
            Payload::Write(_) => shape.writes(),
            Payload::Read(_) => shape.reads(),
        };
        direction && self.address.is_some() == shape.has_address()
    }

    /// Total bytes clocked in this transaction
    pub fn total_bytes(&self) -> usize {
        let mut total = 1; // opcode
        if self.has_address() {
            total += super::ADDRESS_BYTES;
        }
        total += self.instruction.dummy_bytes();
        total += self.payload.len();
        total
    }
}
