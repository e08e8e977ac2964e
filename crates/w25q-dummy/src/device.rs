//! Byte-level W25Q64 model
//!
//! `DummyFlash` sits behind the same four bus primitives a real board
//! provides. Transmitted bytes are collected per chip-select bracket; reads
//! are answered from the collected header, and write-class instructions take
//! effect when chip select is released, like on the real part.

use w25q_core::bus::SpiBus;
use w25q_core::error::{Error, Result};
use w25q_core::protocol::{PAGE_SIZE, SECURITY_REGISTER_ADDRESSES};
use w25q_core::spi::{opcodes, EraseKind, ADDRESS_BYTES};
use w25q_core::status::{Status1, Status2};

use crate::config::DummyConfig;
use crate::error::Result as ConfigResult;

/// Size of one security register
pub const SECURITY_REGISTER_SIZE: usize = 256;

/// Status Register 1 bits writable with 01h
const SR1_WRITABLE: Status1 = Status1::BP0
    .union(Status1::BP1)
    .union(Status1::BP2)
    .union(Status1::TB)
    .union(Status1::SEC)
    .union(Status1::SRP0);

/// Status Register 2 bits writable with 01h (LB1-3 are one-time programmable)
const SR2_WRITABLE: Status2 = Status2::SRP1
    .union(Status2::QE)
    .union(Status2::LB1)
    .union(Status2::LB2)
    .union(Status2::LB3)
    .union(Status2::CMP);

/// Security register lock bits, never cleared once set
const SR2_OTP: Status2 = Status2::LB1.union(Status2::LB2).union(Status2::LB3);

/// One call seen on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// Chip select asserted
    Select,
    /// Chip select released
    Deselect,
    /// Bytes sent to the chip
    Transmit(Vec<u8>),
    /// Bytes the chip answered with
    Receive(Vec<u8>),
}

/// Dummy flash
///
/// Emulates a W25Q64 in memory for testing purposes. Operations complete
/// instantly, so BUSY never reads back set.
pub struct DummyFlash {
    config: DummyConfig,
    data: Vec<u8>,
    security: [[u8; SECURITY_REGISTER_SIZE]; 3],
    status1: Status1,
    status2: Status2,
    volatile_sr_write: bool,
    reset_enabled: bool,
    powered_down: bool,
    selected: bool,
    /// Bytes transmitted in the current bracket
    tx: Vec<u8>,
    /// Bytes already clocked out in the current bracket
    rx_offset: usize,
    events: Vec<BusEvent>,
}

impl DummyFlash {
    /// Create a new dummy flash with the given configuration
    ///
    /// Fails if the size is not a power of two between 64 KiB and 16 MiB.
    pub fn new(config: DummyConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: DummyConfig) -> Self {
        let data = vec![0xFF; config.size];
        Self {
            config,
            data,
            security: [[0xFF; SECURITY_REGISTER_SIZE]; 3],
            status1: Status1::empty(),
            status2: Status2::empty(),
            volatile_sr_write: false,
            reset_enabled: false,
            powered_down: false,
            selected: false,
            tx: Vec::new(),
            rx_offset: 0,
            events: Vec::new(),
        }
    }

    /// Create a new dummy flash with default configuration (W25Q64FV)
    pub fn new_default() -> Self {
        Self::build(DummyConfig::default())
    }

    /// Create a dummy flash with pre-filled data
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> ConfigResult<Self> {
        let mut flash = Self::new(config)?;
        let len = core::cmp::min(initial_data.len(), flash.data.len());
        flash.data[..len].copy_from_slice(&initial_data[..len]);
        Ok(flash)
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the flash data
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get a mutable reference to security register 1, 2 or 3
    pub fn security_register_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let register = self.security.get_mut(index.checked_sub(1)?)?;
        Some(&mut register[..])
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Current Status Register 1
    pub fn status1(&self) -> Status1 {
        self.status1
    }

    /// Current Status Register 2
    pub fn status2(&self) -> Status2 {
        self.status2
    }

    /// Force status bits, e.g. to model a chip that is still busy
    pub fn set_status(&mut self, status1: Status1, status2: Status2) {
        self.status1 = status1;
        self.status2 = status2;
    }

    /// True while in power-down
    pub fn is_powered_down(&self) -> bool {
        self.powered_down
    }

    /// Every bus call so far
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Forget recorded bus calls
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Number of chip-select assertions so far
    pub fn selects(&self) -> usize {
        self.count(&BusEvent::Select)
    }

    /// Number of chip-select releases so far
    pub fn deselects(&self) -> usize {
        self.count(&BusEvent::Deselect)
    }

    fn count(&self, event: &BusEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    /// Address bytes following the opcode, if the header has them
    fn address(&self) -> Option<usize> {
        let bytes = self.tx.get(1..1 + ADDRESS_BYTES)?;
        let addr = ((bytes[0] as usize) << 16) | ((bytes[1] as usize) << 8) | bytes[2] as usize;
        Some(addr)
    }

    /// Byte the chip drives on MISO at `index` of the data phase
    fn output_byte(&self, opcode: u8, index: usize) -> u8 {
        if self.powered_down && opcode != opcodes::RDP {
            // Outputs are high impedance in power-down
            return 0xFF;
        }

        match opcode {
            opcodes::RDSR => self.status1.bits(),
            opcodes::RDSR2 => self.status2.bits(),
            opcodes::READ | opcodes::FAST_READ => {
                let header = if opcode == opcodes::FAST_READ { 5 } else { 4 };
                match self.address() {
                    Some(addr) if self.tx.len() >= header => {
                        self.data[(addr + index) % self.data.len()]
                    }
                    _ => 0xFF,
                }
            }
            opcodes::RDSR_SEC => match self.address() {
                Some(addr) if self.tx.len() >= 5 => self.security_byte(addr, index),
                _ => 0xFF,
            },
            opcodes::RDP if self.tx.len() >= 4 => self.config.device_id,
            opcodes::REMS => {
                // Address 0 gives manufacturer first, 1 gives device first
                let first = self.address().unwrap_or(0) & 1;
                if (first + index) % 2 == 0 {
                    self.config.manufacturer_id
                } else {
                    self.config.device_id
                }
            }
            opcodes::RDID => {
                let id = [
                    self.config.manufacturer_id,
                    (self.config.jedec_device_id >> 8) as u8,
                    self.config.jedec_device_id as u8,
                ];
                id.get(index).copied().unwrap_or(0xFF)
            }
            opcodes::RDUID if self.tx.len() >= 5 => self
                .config
                .unique_id
                .to_be_bytes()
                .get(index)
                .copied()
                .unwrap_or(0xFF),
            _ => 0xFF,
        }
    }

    fn security_byte(&self, addr: usize, index: usize) -> u8 {
        let base = addr & !(SECURITY_REGISTER_SIZE - 1);
        let Some(register) = SECURITY_REGISTER_ADDRESSES
            .iter()
            .position(|&a| a as usize == base)
        else {
            return 0xFF;
        };
        let offset = (addr + index) % SECURITY_REGISTER_SIZE;
        self.security[register][offset]
    }

    /// Run the instruction collected in this bracket
    fn complete(&mut self) {
        let Some(&opcode) = self.tx.first() else {
            return;
        };

        if opcode != opcodes::RST {
            self.reset_enabled = false;
        }

        if self.powered_down {
            if opcode == opcodes::RDP {
                log::debug!("dummy: release from power-down");
                self.powered_down = false;
            } else {
                log::debug!("dummy: ignoring 0x{:02X} in power-down", opcode);
            }
            return;
        }

        match opcode {
            opcodes::WREN => self.status1.insert(Status1::WEL),
            opcodes::WRDI => self.status1.remove(Status1::WEL),
            opcodes::VWREN => self.volatile_sr_write = true,
            opcodes::WRSR => self.write_status(),
            opcodes::PP => self.page_program(),
            opcodes::SE_20 => self.erase(EraseKind::Sector4K),
            opcodes::BE_52 => self.erase(EraseKind::Block32K),
            opcodes::BE_D8 => self.erase(EraseKind::Block64K),
            opcodes::CE_C7 => self.erase(EraseKind::Chip),
            opcodes::SUSPEND => self.status2.insert(Status2::SUS),
            opcodes::RESUME => self.status2.remove(Status2::SUS),
            opcodes::DP => self.powered_down = true,
            opcodes::RSTEN => self.reset_enabled = true,
            opcodes::RST if self.reset_enabled => self.reset(),
            _ => {}
        }

        // 50h only arms the very next instruction
        if opcode != opcodes::VWREN {
            self.volatile_sr_write = false;
        }
    }

    /// Consume the write enable latch; false if the instruction is ignored
    fn take_write_enable(&mut self, what: &str) -> bool {
        if !self.status1.contains(Status1::WEL) {
            log::debug!("dummy: {} ignored, write enable latch not set", what);
            return false;
        }
        self.status1.remove(Status1::WEL);
        true
    }

    fn write_status(&mut self) {
        let volatile = self.volatile_sr_write;
        if !volatile && !self.take_write_enable("write status") {
            return;
        }

        if let Some(&sr1) = self.tx.get(1) {
            let sr1 = Status1::from_bits_retain(sr1);
            self.status1 = (self.status1 - SR1_WRITABLE) | (sr1 & SR1_WRITABLE);
        }
        if let Some(&sr2) = self.tx.get(2) {
            let sr2 = Status2::from_bits_retain(sr2);
            let locked = self.status2 & SR2_OTP;
            self.status2 = (self.status2 - SR2_WRITABLE) | (sr2 & SR2_WRITABLE) | locked;
        }
    }

    fn page_program(&mut self) {
        let Some(addr) = self.address() else {
            return;
        };
        if !self.take_write_enable("page program") {
            return;
        }

        let addr = addr % self.data.len();
        let page_base = addr & !(PAGE_SIZE - 1);

        // The page buffer wraps; later bytes replace earlier ones
        let mut buffer = [0xFFu8; PAGE_SIZE];
        let mut touched = [false; PAGE_SIZE];
        for (i, &byte) in self.tx[1 + ADDRESS_BYTES..].iter().enumerate() {
            let offset = (addr - page_base + i) % PAGE_SIZE;
            buffer[offset] = byte;
            touched[offset] = true;
        }

        // Programming can only clear bits
        let page = &mut self.data[page_base..page_base + PAGE_SIZE];
        for ((cell, &byte), &hit) in page.iter_mut().zip(&buffer).zip(&touched) {
            if hit {
                *cell &= byte;
            }
        }
    }

    fn erase(&mut self, kind: EraseKind) {
        let Some(erase_size) = kind.size() else {
            if self.take_write_enable("chip erase") {
                self.data.fill(0xFF);
            }
            return;
        };
        let Some(addr) = self.address() else {
            return;
        };
        if !self.take_write_enable("erase") {
            return;
        }

        let erase_size = erase_size as usize;
        let addr = addr % self.data.len();
        let aligned_addr = addr & !(erase_size - 1);
        let end = (aligned_addr + erase_size).min(self.data.len());
        self.data[aligned_addr..end].fill(0xFF);
    }

    fn reset(&mut self) {
        log::debug!("dummy: software reset");
        self.status1.remove(Status1::WEL | Status1::BUSY);
        self.status2.remove(Status2::SUS);
        self.volatile_sr_write = false;
        self.reset_enabled = false;
    }
}

impl SpiBus for DummyFlash {
    fn select(&mut self) -> Result<()> {
        if self.selected {
            return Err(Error::ChipSelectFailed);
        }
        self.selected = true;
        self.tx.clear();
        self.rx_offset = 0;
        self.events.push(BusEvent::Select);
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        if !self.selected {
            return Err(Error::ChipSelectFailed);
        }
        self.selected = false;
        self.events.push(BusEvent::Deselect);
        self.complete();
        self.tx.clear();
        Ok(())
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.selected {
            return Err(Error::BusNotReady);
        }
        self.tx.extend_from_slice(bytes);
        self.events.push(BusEvent::Transmit(bytes.to_vec()));
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<()> {
        if !self.selected {
            return Err(Error::BusNotReady);
        }
        let opcode = self.tx.first().copied();
        for byte in buf.iter_mut() {
            *byte = match opcode {
                Some(opcode) => self.output_byte(opcode, self.rx_offset),
                None => 0xFF,
            };
            self.rx_offset += 1;
        }
        self.events.push(BusEvent::Receive(buf.to_vec()));
        Ok(())
    }
}
