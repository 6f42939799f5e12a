//! Key-value store error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in a key-value store
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file or stored value is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for key-value store operations
pub type StorageResult<T> = Result<T, StorageError>;
