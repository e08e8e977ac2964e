//! W25Q instruction sequences
//!
//! One function per logical operation. Each borrows the bus for the length
//! of the call and issues one transaction, or two for write-class operations
//! (Write Enable first).
//!
//! Nothing here waits for the chip. After a program, erase or status write
//! the chip stays busy for a while and ignores most instructions; callers
//! poll [`is_busy`] or [`read_status_registers`] themselves.
//!
//! Out-of-range input is clamped silently rather than rejected:
//! - addresses keep only their low 24 bits
//! - [`page_program`] sends at most [`PAGE_SIZE`] bytes

use crate::bus::SpiBus;
use crate::error::Result;
use crate::spi::{EraseKind, FlashAddress, Instruction, SpiCommand};
use crate::status::{Status1, StatusRegisters};

use super::sequencer::{execute, execute_with_write_enable};

/// Page size; the most Page Program accepts per call
pub const PAGE_SIZE: usize = 256;
/// Smallest erase unit
pub const SECTOR_SIZE: u32 = 4 * 1024;
/// 32KB block erase size
pub const BLOCK_32K_SIZE: u32 = 32 * 1024;
/// 64KB block erase size
pub const BLOCK_64K_SIZE: u32 = 64 * 1024;
/// Base addresses of the three 256-byte security registers
pub const SECURITY_REGISTER_ADDRESSES: [u32; 3] = [0x00_1000, 0x00_2000, 0x00_3000];

// ============================================================================
// Write control
// ============================================================================

/// Send the Write Enable command
pub fn write_enable<B: SpiBus + ?Sized>(bus: &mut B) -> Result<()> {
    execute(bus, &mut SpiCommand::simple(Instruction::WriteEnable))
}

/// Send the Write Disable command
pub fn write_disable<B: SpiBus + ?Sized>(bus: &mut B) -> Result<()> {
    execute(bus, &mut SpiCommand::simple(Instruction::WriteDisable))
}

/// Send the Write Enable for Volatile Status Register command
///
/// The next Write Status Register then changes the volatile copy only and
/// does not set WEL.
pub fn volatile_sr_write_enable<B: SpiBus + ?Sized>(bus: &mut B) -> Result<()> {
    execute(bus, &mut SpiCommand::simple(Instruction::VolatileSrWriteEnable))
}

// ============================================================================
// Status registers
// ============================================================================

/// Read the status register 1
pub fn read_status1<B: SpiBus + ?Sized>(bus: &mut B) -> Result<u8> {
    let mut buf = [0u8; 1];
    execute(bus, &mut SpiCommand::read_reg(Instruction::ReadStatus1, &mut buf))?;
    Ok(buf[0])
}

/// Read the status register 2
pub fn read_status2<B: SpiBus + ?Sized>(bus: &mut B) -> Result<u8> {
    let mut buf = [0u8; 1];
    execute(bus, &mut SpiCommand::read_reg(Instruction::ReadStatus2, &mut buf))?;
    Ok(buf[0])
}

/// Read both status registers
///
/// Two independent transactions (05h, then 35h); the registers are not
/// sampled atomically.
pub fn read_status_registers<B: SpiBus + ?Sized>(bus: &mut B) -> Result<StatusRegisters> {
    let sr1 = read_status1(bus)?;
    let sr2 = read_status2(bus)?;
    Ok(StatusRegisters::decode_pair(sr1, sr2))
}

/// Write both status registers
///
/// Sends Write Enable, then 01h with SR1 and SR2 as one 2-byte payload.
pub fn write_status_registers<B: SpiBus + ?Sized>(
    bus: &mut B,
    status: &StatusRegisters,
) -> Result<()> {
    let data = status.encode_pair();
    execute_with_write_enable(bus, &mut SpiCommand::write_reg(Instruction::WriteStatus, &data))
}

/// Write the volatile copy of both status registers
///
/// Sends 50h instead of Write Enable, then 01h with SR1 and SR2. The values
/// are lost on power cycle.
pub fn write_status_registers_volatile<B: SpiBus + ?Sized>(
    bus: &mut B,
    status: &StatusRegisters,
) -> Result<()> {
    let data = status.encode_pair();
    volatile_sr_write_enable(bus)?;
    execute(bus, &mut SpiCommand::write_reg(Instruction::WriteStatus, &data))
}

/// Check if a write or erase operation is in progress
///
/// One status read; does not wait.
pub fn is_busy<B: SpiBus + ?Sized>(bus: &mut B) -> Result<bool> {
    let status = Status1::from_bits_retain(read_status1(bus)?);
    Ok(status.contains(Status1::BUSY))
}

/// Check if the Write Enable Latch is set
pub fn check_wel<B: SpiBus + ?Sized>(bus: &mut B) -> Result<bool> {
    let status = Status1::from_bits_retain(read_status1(bus)?);
    Ok(status.contains(Status1::WEL))
}

// ============================================================================
// Read
// ============================================================================

/// Read one byte with Read Data (03h)
pub fn read_data<B: SpiBus + ?Sized>(bus: &mut B, addr: u32) -> Result<u8> {
    let mut buf = [0u8; 1];
    let mut cmd = SpiCommand::read(Instruction::ReadData, FlashAddress::from(addr), &mut buf);
    execute(bus, &mut cmd)?;
    Ok(buf[0])
}

/// Read `buf.len()` bytes with Fast Read (0Bh, one dummy byte)
///
/// The chip wraps to address 0 after the last byte.
pub fn fast_read<B: SpiBus + ?Sized>(bus: &mut B, addr: u32, buf: &mut [u8]) -> Result<()> {
    let mut cmd = SpiCommand::read(Instruction::FastRead, FlashAddress::from(addr), buf);
    execute(bus, &mut cmd)
}

/// Read from a security register (48h, one dummy byte)
///
/// `addr` selects the register and byte offset, see
/// [`SECURITY_REGISTER_ADDRESSES`].
pub fn read_security_register<B: SpiBus + ?Sized>(
    bus: &mut B,
    addr: u32,
    buf: &mut [u8],
) -> Result<()> {
    let mut cmd =
        SpiCommand::read(Instruction::ReadSecurityRegister, FlashAddress::from(addr), buf);
    execute(bus, &mut cmd)
}

// ============================================================================
// Program
// ============================================================================

/// Program up to one page
///
/// Sends Write Enable, then 02h with the address and data. Data longer than
/// [`PAGE_SIZE`] is cut to the first 256 bytes; the number of bytes actually
/// sent is returned.
///
/// The start address should be page aligned. The chip wraps within the page,
/// so bytes past the page end overwrite the page start; that happens on the
/// device and is not prevented here.
pub fn page_program<B: SpiBus + ?Sized>(bus: &mut B, addr: u32, data: &[u8]) -> Result<usize> {
    let len = data.len().min(PAGE_SIZE);
    if len < data.len() {
        log::debug!(
            "page program at 0x{:06X}: {} bytes clamped to {}",
            addr,
            data.len(),
            len
        );
    }

    let mut cmd = SpiCommand::write(
        Instruction::PageProgram,
        FlashAddress::from(addr),
        &data[..len],
    );
    execute_with_write_enable(bus, &mut cmd)?;
    Ok(len)
}

// ============================================================================
// Erase
// ============================================================================

/// Erase a sector, block or the whole chip
///
/// Sends Write Enable, then the erase opcode, with the address for sector
/// and block erases. `addr` is ignored for [`EraseKind::Chip`].
pub fn erase<B: SpiBus + ?Sized>(bus: &mut B, kind: EraseKind, addr: u32) -> Result<()> {
    let instruction = kind.instruction();
    let mut cmd = if instruction.shape().has_address() {
        SpiCommand::erase(instruction, FlashAddress::from(addr))
    } else {
        SpiCommand::simple(instruction)
    };
    execute_with_write_enable(bus, &mut cmd)
}

/// Erase the 4KB sector containing `addr`
pub fn sector_erase_4k<B: SpiBus + ?Sized>(bus: &mut B, addr: u32) -> Result<()> {
    erase(bus, EraseKind::Sector4K, addr)
}

/// Erase the 32KB block containing `addr`
pub fn block_erase_32k<B: SpiBus + ?Sized>(bus: &mut B, addr: u32) -> Result<()> {
    erase(bus, EraseKind::Block32K, addr)
}

/// Erase the 64KB block containing `addr`
pub fn block_erase_64k<B: SpiBus + ?Sized>(bus: &mut B, addr: u32) -> Result<()> {
    erase(bus, EraseKind::Block64K, addr)
}

/// Erase the entire chip
pub fn chip_erase<B: SpiBus + ?Sized>(bus: &mut B) -> Result<()> {
    erase(bus, EraseKind::Chip, 0)
}

/// Suspend a running erase or program (75h)
pub fn suspend<B: SpiBus + ?Sized>(bus: &mut B) -> Result<()> {
    execute(bus, &mut SpiCommand::simple(Instruction::Suspend))
}

/// Resume a suspended erase or program (7Ah)
pub fn resume<B: SpiBus + ?Sized>(bus: &mut B) -> Result<()> {
    execute(bus, &mut SpiCommand::simple(Instruction::Resume))
}

// ============================================================================
// Power management
// ============================================================================

/// Enter power-down (B9h)
///
/// The chip ignores everything except Release Power Down afterwards.
pub fn power_down<B: SpiBus + ?Sized>(bus: &mut B) -> Result<()> {
    execute(bus, &mut SpiCommand::simple(Instruction::PowerDown))
}

/// Leave power-down (ABh)
pub fn release_power_down<B: SpiBus + ?Sized>(bus: &mut B) -> Result<()> {
    execute(bus, &mut SpiCommand::simple(Instruction::ReleasePowerDown))
}

// ============================================================================
// Identification
// ============================================================================

/// Read the device ID byte
///
/// Sends ABh (Release Power Down) with 3 dummy bytes and reads one byte. This
/// also wakes the chip from power-down. Note this is not the Manufacturer/
/// Device ID (90h) or JEDEC ID (9Fh) instruction; use
/// [`read_manufacturer_device_id`] or [`read_jedec_id`] for those.
pub fn device_id<B: SpiBus + ?Sized>(bus: &mut B) -> Result<u8> {
    let mut buf = [0u8; 1];
    execute(bus, &mut SpiCommand::read_reg(Instruction::DeviceId, &mut buf))?;
    Ok(buf[0])
}

/// Read the JEDEC ID
///
/// Returns (manufacturer_id, device_id) on success.
pub fn read_jedec_id<B: SpiBus + ?Sized>(bus: &mut B) -> Result<(u8, u16)> {
    let mut buf = [0u8; 3];
    execute(bus, &mut SpiCommand::read_reg(Instruction::JedecId, &mut buf))?;

    let manufacturer = buf[0];
    let device = ((buf[1] as u16) << 8) | (buf[2] as u16);

    Ok((manufacturer, device))
}

/// Read the Manufacturer/Device ID (90h, address 0)
///
/// Returns (manufacturer_id, device_id).
pub fn read_manufacturer_device_id<B: SpiBus + ?Sized>(bus: &mut B) -> Result<(u8, u8)> {
    let mut buf = [0u8; 2];
    let mut cmd = SpiCommand::read(
        Instruction::ManufacturerDeviceId,
        FlashAddress::new(0),
        &mut buf,
    );
    execute(bus, &mut cmd)?;
    Ok((buf[0], buf[1]))
}

/// Read the 64-bit factory unique ID (4Bh, four dummy bytes)
pub fn read_unique_id<B: SpiBus + ?Sized>(bus: &mut B) -> Result<u64> {
    let mut buf = [0u8; 8];
    execute(bus, &mut SpiCommand::read_reg(Instruction::ReadUniqueId, &mut buf))?;
    Ok(u64::from_be_bytes(buf))
}

// ============================================================================
// Reset
// ============================================================================

/// Send the software reset sequence (66h, then 99h)
///
/// The chip needs about 30us after the reset before it accepts commands.
pub fn software_reset<B: SpiBus + ?Sized>(bus: &mut B) -> Result<()> {
    execute(bus, &mut SpiCommand::simple(Instruction::EnableReset))?;
    execute(bus, &mut SpiCommand::simple(Instruction::Reset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{Status1Bit, Status2Bit};
    use crate::testing::{Event, RecordingBus};
    use std::vec;

    #[test]
    fn test_read_status_registers() {
        let mut bus = RecordingBus::with_replies(&[0x03, 0x80]);
        let status = read_status_registers(&mut bus).unwrap();

        let mut reg1 = [false; 8];
        reg1[Status1Bit::Busy as usize] = true;
        reg1[Status1Bit::Wel as usize] = true;
        let mut reg2 = [false; 8];
        reg2[Status2Bit::Sus as usize] = true;
        assert_eq!(status.reg1, reg1);
        assert_eq!(status.reg2, reg2);

        assert_eq!(bus.opcodes(), vec![0x05, 0x35]);
        assert_eq!(bus.selects(), 2);
        assert_eq!(bus.deselects(), 2);
    }

    #[test]
    fn test_write_status_registers() {
        let mut bus = RecordingBus::new();
        let status = StatusRegisters::decode_pair(0x1C, 0x02);
        write_status_registers(&mut bus, &status).unwrap();

        assert_eq!(
            bus.events,
            vec![
                Event::Select,
                Event::Transmit(vec![0x06]),
                Event::Deselect,
                Event::Select,
                Event::Transmit(vec![0x01]),
                Event::Transmit(vec![0x1C, 0x02]),
                Event::Deselect,
            ]
        );
    }

    #[test]
    fn test_write_status_registers_volatile() {
        let mut bus = RecordingBus::new();
        let status = StatusRegisters::decode_pair(0x00, 0x02);
        write_status_registers_volatile(&mut bus, &status).unwrap();
        assert_eq!(bus.opcodes(), vec![0x50, 0x01]);
        assert_eq!(bus.transmitted(), vec![0x50, 0x01, 0x00, 0x02]);
    }

    #[test]
    fn test_page_program_sequence() {
        let mut bus = RecordingBus::new();
        let data = [0xAAu8; 10];
        assert_eq!(page_program(&mut bus, 0x001000, &data).unwrap(), 10);

        assert_eq!(
            bus.events,
            vec![
                Event::Select,
                Event::Transmit(vec![0x06]),
                Event::Deselect,
                Event::Select,
                Event::Transmit(vec![0x02]),
                Event::Transmit(vec![0x00, 0x10, 0x00]),
                Event::Transmit(vec![0xAA; 10]),
                Event::Deselect,
            ]
        );
    }

    #[test]
    fn test_page_program_clamps_to_page() {
        let mut bus = RecordingBus::new();
        let data = [0x5Au8; 300];
        assert_eq!(page_program(&mut bus, 0, &data).unwrap(), PAGE_SIZE);

        let payload = bus
            .events
            .iter()
            .rev()
            .find_map(|e| match e {
                Event::Transmit(bytes) => Some(bytes.len()),
                _ => None,
            })
            .unwrap();
        assert_eq!(payload, 256);
    }

    #[test]
    fn test_erase_opcodes() {
        type EraseFn = fn(&mut RecordingBus) -> Result<()>;
        let cases: [(EraseFn, u8, bool); 4] = [
            (|bus| sector_erase_4k(bus, 0x1000), 0x20, true),
            (|bus| block_erase_32k(bus, 0x8000), 0x52, true),
            (|bus| block_erase_64k(bus, 0x10000), 0xD8, true),
            (|bus| chip_erase(bus), 0xC7, false),
        ];

        for (erase_fn, opcode, has_address) in cases {
            let mut bus = RecordingBus::new();
            erase_fn(&mut bus).unwrap();

            assert_eq!(bus.opcodes(), vec![0x06, opcode]);
            assert_eq!(bus.selects(), 2);
            assert_eq!(bus.deselects(), 2);
            // WREN bracket is exactly select, 06h, deselect
            assert_eq!(
                &bus.events[..3],
                &[Event::Select, Event::Transmit(vec![0x06]), Event::Deselect]
            );
            let expected_len = if has_address { 1 + 1 + 3 } else { 1 + 1 };
            assert_eq!(bus.transmitted().len(), expected_len);
        }
    }

    #[test]
    fn test_erase_address() {
        let mut bus = RecordingBus::new();
        block_erase_64k(&mut bus, 0x7F0000).unwrap();
        assert_eq!(bus.transmitted(), vec![0x06, 0xD8, 0x7F, 0x00, 0x00]);
    }

    #[test]
    fn test_bracket_balance() {
        type OpFn = fn(&mut RecordingBus) -> Result<()>;
        let read_class: [OpFn; 9] = [
            |bus| read_data(bus, 0x10).map(drop),
            |bus| fast_read(bus, 0x10, &mut [0u8; 8]),
            |bus| read_security_register(bus, 0x1000, &mut [0u8; 8]),
            |bus| suspend(bus),
            |bus| resume(bus),
            |bus| power_down(bus),
            |bus| release_power_down(bus),
            |bus| device_id(bus).map(drop),
            |bus| read_jedec_id(bus).map(drop),
        ];
        for op in read_class {
            let mut bus = RecordingBus::new();
            op(&mut bus).unwrap();
            assert_eq!(bus.selects(), 1);
            assert_eq!(bus.deselects(), 1);
        }

        let write_class: [OpFn; 6] = [
            |bus| page_program(bus, 0, &[1, 2, 3]).map(drop),
            |bus| write_status_registers(bus, &StatusRegisters::default()),
            |bus| sector_erase_4k(bus, 0),
            |bus| block_erase_32k(bus, 0),
            |bus| block_erase_64k(bus, 0),
            |bus| chip_erase(bus),
        ];
        for op in write_class {
            let mut bus = RecordingBus::new();
            op(&mut bus).unwrap();
            assert_eq!(bus.selects(), 2);
            assert_eq!(bus.deselects(), 2);
        }
    }

    #[test]
    fn test_read_data() {
        let mut bus = RecordingBus::with_replies(&[0x42]);
        assert_eq!(read_data(&mut bus, 0x0A0B0C).unwrap(), 0x42);
        assert_eq!(bus.transmitted(), vec![0x03, 0x0A, 0x0B, 0x0C]);
        assert!(bus.events.contains(&Event::Receive(1)));
    }

    #[test]
    fn test_fast_read_and_security_register() {
        let mut bus = RecordingBus::with_replies(&[9, 8, 7]);
        let mut buf = [0u8; 3];
        fast_read(&mut bus, 0x000100, &mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7]);
        assert_eq!(bus.transmitted(), vec![0x0B, 0x00, 0x01, 0x00, 0x00]);

        let mut bus = RecordingBus::new();
        let mut buf = [0u8; 16];
        read_security_register(&mut bus, SECURITY_REGISTER_ADDRESSES[1], &mut buf).unwrap();
        assert_eq!(bus.transmitted(), vec![0x48, 0x00, 0x20, 0x00, 0x00]);
        assert!(bus.events.contains(&Event::Receive(16)));
    }

    #[test]
    fn test_address_truncated() {
        let mut bus = RecordingBus::new();
        read_data(&mut bus, 0x1234_5678).unwrap();
        assert_eq!(bus.transmitted(), vec![0x03, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_device_id_uses_release_opcode() {
        let mut bus = RecordingBus::with_replies(&[0x16]);
        assert_eq!(device_id(&mut bus).unwrap(), 0x16);
        assert_eq!(
            bus.events,
            vec![
                Event::Select,
                Event::Transmit(vec![0xAB]),
                Event::Transmit(vec![0x00, 0x00, 0x00]),
                Event::Receive(1),
                Event::Deselect,
            ]
        );
    }

    #[test]
    fn test_identification() {
        let mut bus = RecordingBus::with_replies(&[0xEF, 0x40, 0x17]);
        assert_eq!(read_jedec_id(&mut bus).unwrap(), (0xEF, 0x4017));
        assert_eq!(bus.transmitted(), vec![0x9F]);

        let mut bus = RecordingBus::with_replies(&[0xEF, 0x16]);
        assert_eq!(read_manufacturer_device_id(&mut bus).unwrap(), (0xEF, 0x16));
        assert_eq!(bus.transmitted(), vec![0x90, 0x00, 0x00, 0x00]);

        let mut bus = RecordingBus::with_replies(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(read_unique_id(&mut bus).unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(bus.transmitted(), vec![0x4B, 0, 0, 0, 0]);
    }

    #[test]
    fn test_single_opcode_operations() {
        type OpFn = fn(&mut RecordingBus) -> Result<()>;
        let cases: [(OpFn, u8); 7] = [
            (|bus| suspend(bus), 0x75),
            (|bus| resume(bus), 0x7A),
            (|bus| power_down(bus), 0xB9),
            (|bus| release_power_down(bus), 0xAB),
            (|bus| write_enable(bus), 0x06),
            (|bus| write_disable(bus), 0x04),
            (|bus| volatile_sr_write_enable(bus), 0x50),
        ];
        for (op, opcode) in cases {
            let mut bus = RecordingBus::new();
            op(&mut bus).unwrap();
            assert_eq!(
                bus.events,
                vec![Event::Select, Event::Transmit(vec![opcode]), Event::Deselect]
            );
        }
    }

    #[test]
    fn test_software_reset() {
        let mut bus = RecordingBus::new();
        software_reset(&mut bus).unwrap();
        assert_eq!(bus.opcodes(), vec![0x66, 0x99]);
        assert_eq!(bus.selects(), 2);
    }

    #[test]
    fn test_status_helpers() {
        let mut bus = RecordingBus::with_replies(&[0x01, 0x02]);
        assert!(is_busy(&mut bus).unwrap());
        assert!(check_wel(&mut bus).unwrap());
        assert_eq!(bus.opcodes(), vec![0x05, 0x05]);
    }
}
