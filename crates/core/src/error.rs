//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid sector name: {0}")]
    InvalidSectorName(String),

    #[error("invalid data type: {0}")]
    InvalidDataType(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
