//! Error types for buffer file operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Editor core error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error without a known path
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to read a file into the buffer
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the buffer to a file
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot (de)serialization failed
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for editor core operations
pub type Result<T> = std::result::Result<T, Error>;
