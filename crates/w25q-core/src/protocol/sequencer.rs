//! Transaction sequencing
//!
//! Turns one [`SpiCommand`] into one chip-select bracket on the bus:
//!
//! ```text
//! select
//!   transmit [opcode]
//!   transmit [a23..16, a15..8, a7..0]   if the shape has an address
//!   transmit [0x00; n]                  if the shape has n dummy bytes
//!   transmit data | receive data        payload, exact length
//! deselect
//! ```

use crate::bus::SpiBus;
use crate::error::{Error, Result};
use crate::spi::{Instruction, Payload, SpiCommand};

/// Largest dummy phase in the catalogue (Read Unique ID)
const MAX_DUMMY_BYTES: usize = 4;

/// Execute one command as a single bracketed transaction
///
/// Chip select is asserted once and released once. If a transfer fails the
/// bus is still deselected before the first error is returned.
///
/// A command whose address or data direction does not match its
/// instruction's shape is refused with [`Error::InvalidCommand`] before chip
/// select is touched.
pub fn execute<B: SpiBus + ?Sized>(bus: &mut B, cmd: &mut SpiCommand<'_>) -> Result<()> {
    check_shape(cmd)?;

    log::trace!(
        "spi: opcode 0x{:02X} addr {:?} payload {} bytes",
        cmd.opcode(),
        cmd.address.map(|a| a.get()),
        cmd.payload.len()
    );

    bus.select()?;
    let result = transfer(bus, cmd);
    let release = bus.deselect();
    result.and(release)
}

/// Execute a write-class command behind its own Write Enable transaction
///
/// The write enable latch clears after every completed write or erase, so
/// this is always two brackets: `[06h]`, then the command. A mismatched
/// command is refused before the write enable goes out.
pub fn execute_with_write_enable<B: SpiBus + ?Sized>(
    bus: &mut B,
    cmd: &mut SpiCommand<'_>,
) -> Result<()> {
    check_shape(cmd)?;
    execute(bus, &mut SpiCommand::simple(Instruction::WriteEnable))?;
    execute(bus, cmd)
}

fn check_shape(cmd: &SpiCommand<'_>) -> Result<()> {
    if cmd.fits_shape() {
        return Ok(());
    }
    log::debug!(
        "spi: refusing opcode 0x{:02X}, command does not match {:?}",
        cmd.opcode(),
        cmd.instruction.shape()
    );
    Err(Error::InvalidCommand)
}

fn transfer<B: SpiBus + ?Sized>(bus: &mut B, cmd: &mut SpiCommand<'_>) -> Result<()> {
    let instruction = cmd.instruction;

    bus.transmit(&[instruction.opcode()])?;

    if let Some(address) = cmd.address {
        bus.transmit(&address.encode())?;
    }

    let dummy = instruction.dummy_bytes();
    if dummy > 0 {
        bus.transmit(&[0u8; MAX_DUMMY_BYTES][..dummy])?;
    }

    match &mut cmd.payload {
        Payload::None => Ok(()),
        Payload::Write(data) if !data.is_empty() => bus.transmit(*data),
        Payload::Read(buf) if !buf.is_empty() => bus.receive(&mut buf[..]),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::FlashAddress;
    use crate::testing::{Event, RecordingBus};
    use std::vec;

    #[test]
    fn test_simple_bracket() {
        let mut bus = RecordingBus::new();
        execute(&mut bus, &mut SpiCommand::simple(Instruction::PowerDown)).unwrap();
        assert_eq!(
            bus.events,
            vec![Event::Select, Event::Transmit(vec![0xB9]), Event::Deselect]
        );
    }

    #[test]
    fn test_address_dummy_and_read() {
        let mut bus = RecordingBus::with_replies(&[1, 2, 3, 4]);
        let mut buf = [0u8; 4];
        let mut cmd =
            SpiCommand::read(Instruction::FastRead, FlashAddress::new(0xABCDEF), &mut buf);
        execute(&mut bus, &mut cmd).unwrap();

        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(
            bus.events,
            vec![
                Event::Select,
                Event::Transmit(vec![0x0B]),
                Event::Transmit(vec![0xAB, 0xCD, 0xEF]),
                Event::Transmit(vec![0x00]),
                Event::Receive(4),
                Event::Deselect,
            ]
        );
    }

    #[test]
    fn test_write_enable_is_separate_bracket() {
        let mut bus = RecordingBus::new();
        let mut cmd = SpiCommand::erase(Instruction::SectorErase4K, FlashAddress::new(0x2000));
        execute_with_write_enable(&mut bus, &mut cmd).unwrap();

        assert_eq!(
            bus.events,
            vec![
                Event::Select,
                Event::Transmit(vec![0x06]),
                Event::Deselect,
                Event::Select,
                Event::Transmit(vec![0x20]),
                Event::Transmit(vec![0x00, 0x20, 0x00]),
                Event::Deselect,
            ]
        );
    }

    #[test]
    fn test_deselect_after_failed_transfer() {
        // Fail the address transfer
        let mut bus = RecordingBus::failing_transfer(1);
        let mut buf = [0u8; 1];
        let mut cmd = SpiCommand::read(Instruction::ReadData, FlashAddress::new(0), &mut buf);

        assert_eq!(execute(&mut bus, &mut cmd), Err(Error::SpiTransferFailed));
        assert_eq!(bus.selects(), 1);
        assert_eq!(bus.deselects(), 1);
        assert_eq!(bus.events.last(), Some(&Event::Deselect));
    }

    #[test]
    fn test_empty_payload_is_skipped() {
        let mut bus = RecordingBus::new();
        let mut cmd = SpiCommand::write(Instruction::PageProgram, FlashAddress::new(0), &[]);
        execute(&mut bus, &mut cmd).unwrap();
        assert_eq!(bus.transmitted(), vec![0x02, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_mismatched_command_is_refused() {
        let mut bus = RecordingBus::new();
        let mut buf = [0u8; 4];

        // Page program reading data back
        let mut cmd = SpiCommand::read(Instruction::PageProgram, FlashAddress::new(0), &mut buf);
        assert_eq!(execute(&mut bus, &mut cmd), Err(Error::InvalidCommand));

        // Read data without an address
        let mut cmd = SpiCommand::read_reg(Instruction::ReadData, &mut buf);
        assert_eq!(execute(&mut bus, &mut cmd), Err(Error::InvalidCommand));

        // Write enable with a data phase
        let mut cmd = SpiCommand::write_reg(Instruction::WriteEnable, &[0x00]);
        assert_eq!(
            execute_with_write_enable(&mut bus, &mut cmd),
            Err(Error::InvalidCommand)
        );

        // Nothing reached the bus, not even the write enable
        assert!(bus.events.is_empty());
    }
}
