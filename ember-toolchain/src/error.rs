//! Error types for toolchain operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Toolchain error type
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing one of the fixed work files failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The compiler or the built program could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// No known way to open a terminal window here
    #[error("Running in a separate terminal is not supported on this platform")]
    UnsupportedPlatform,
}

impl Error {
    pub(crate) fn file(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}

/// Result type for toolchain operations
pub type Result<T> = std::result::Result<T, Error>;
