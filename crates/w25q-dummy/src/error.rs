//! Error types for the dummy flash

use thiserror::Error;

/// Dummy flash configuration errors
#[derive(Debug, Error)]
pub enum DummyError {
    /// Option value could not be parsed
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    /// Flash size is not usable
    #[error("Invalid flash size {size}: must be a power of two between 64 KiB and 16 MiB")]
    InvalidSize { size: usize },

    /// Option string is not key=value
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    InvalidFormat(String),
}

/// Result type for dummy flash configuration
pub type Result<T> = std::result::Result<T, DummyError>;
