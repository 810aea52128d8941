//! Error types for Silt.

use thiserror::Error;

/// Result type alias using SiltError.
pub type Result<T> = std::result::Result<T, SiltError>;

/// Errors that can occur in Silt operations.
#[derive(Debug, Error)]
pub enum SiltError {
    /// Any file open/read/write/seek/sync failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file or a page within it does not decode: wrong file
    /// length, short read, unknown node tag, or a count/pointer outside
    /// its structural bounds.
    #[error("invalid file format: {0}")]
    Format(String),

    /// An inserted value exceeds the bound declared at file creation.
    #[error("value too large: {len} bytes (max {max})")]
    ValueTooLarge { len: usize, max: usize },

    /// The supplied configuration cannot produce a usable store file.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SiltError {
    /// Shorthand for a `Format` error from anything displayable.
    pub fn format(msg: impl std::fmt::Display) -> Self {
        SiltError::Format(msg.to_string())
    }
}
