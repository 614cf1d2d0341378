//! Storage error types.

use lode_core::DataType;
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors.
///
/// Every variant carries the operation context it was raised from; nothing
/// is swallowed on the way to the caller. Retry policy belongs to the
/// embedding pipeline, not this layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no {kind} entry for sector {name}")]
    NotFound { kind: DataType, name: String },

    #[error("allocating {kind} for sector {name}: {source}")]
    Allocation {
        kind: DataType,
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("insufficient capacity: need {needed} bytes, {available} available")]
    Capacity { needed: u64, available: u64 },

    #[error("acquiring sector lock on {}: cancelled", path.display())]
    LockCancelled { path: PathBuf },

    #[error("readdir {}: {source}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rm {file}: {source}")]
    Deletion {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors recorded by a stream-adaptation session's copy task.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("copying sector stream: {0}")]
    Copy(#[source] std::io::Error),

    #[error("copied different amount than expected: {copied} != {expected}")]
    ShortCopy { copied: u64, expected: u64 },

    #[error("stream copy task vanished before reporting a result")]
    TaskLost,
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
