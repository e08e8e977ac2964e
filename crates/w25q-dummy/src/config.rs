//! Dummy flash configuration

use crate::error::{DummyError, Result};

/// Smallest emulated chip (one 64KB block)
const MIN_SIZE: usize = 64 * 1024;
/// Largest size reachable with 24-bit addresses
const MAX_SIZE: usize = 16 * 1024 * 1024;

/// Configuration for the dummy flash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyConfig {
    /// JEDEC manufacturer ID
    pub manufacturer_id: u8,
    /// JEDEC device ID (memory type + capacity)
    pub jedec_device_id: u16,
    /// Legacy device ID returned by ABh and 90h
    pub device_id: u8,
    /// Factory unique ID returned by 4Bh
    pub unique_id: u64,
    /// Flash size in bytes
    pub size: usize,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            manufacturer_id: 0xEF,   // Winbond
            jedec_device_id: 0x4017, // W25Q64FV
            device_id: 0x16,
            unique_id: 0xD265_4C33_A712_2F29,
            size: 8 * 1024 * 1024,
        }
    }
}

impl DummyConfig {
    /// Set the flash size in bytes
    ///
    /// Checked by [`validate`](Self::validate) when the flash is built.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the IDs reported by the identification instructions
    pub fn with_ids(mut self, manufacturer_id: u8, jedec_device_id: u16, device_id: u8) -> Self {
        self.manufacturer_id = manufacturer_id;
        self.jedec_device_id = jedec_device_id;
        self.device_id = device_id;
        self
    }

    /// Check that the size is usable
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_power_of_two() || !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(DummyError::InvalidSize { size: self.size });
        }
        Ok(())
    }
}

/// Parse options from a list of key-value pairs
///
/// Recognised keys:
/// - `size` - flash size in KiB (default: 8192)
/// - `mfr` - manufacturer ID, decimal or `0x` hex
/// - `jedec` - 16-bit JEDEC device ID
/// - `devid` - legacy device ID
/// - `uid` - 64-bit unique ID
///
/// Unknown keys are logged and ignored.
pub fn parse_options(options: &[(&str, &str)]) -> Result<DummyConfig> {
    let mut config = DummyConfig::default();

    for (key, value) in options {
        match *key {
            "size" => {
                let kib: usize = parse_number(key, value)?;
                config.size = kib * 1024;
            }
            "mfr" => config.manufacturer_id = parse_number(key, value)?,
            "jedec" => config.jedec_device_id = parse_number(key, value)?,
            "devid" => config.device_id = parse_number(key, value)?,
            "uid" => config.unique_id = parse_number(key, value)?,
            _ => {
                log::warn!("dummy: Unknown option: {}={}", key, value);
            }
        }
    }

    config.validate()?;
    Ok(config)
}

/// Parse a `key1=value1,key2=value2` option string
pub fn parse_option_string(s: &str) -> Result<DummyConfig> {
    let mut options = Vec::new();
    for opt in s.split(',').filter(|opt| !opt.is_empty()) {
        let pair = opt
            .split_once('=')
            .ok_or_else(|| DummyError::InvalidFormat(opt.to_string()))?;
        options.push(pair);
    }
    parse_options(&options)
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: TryFrom<u64>,
{
    let invalid = || DummyError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };

    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    }
    .map_err(|_| invalid())?;

    T::try_from(parsed).map_err(|_| invalid())
}
