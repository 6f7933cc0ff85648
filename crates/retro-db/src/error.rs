//! Storage error types for retro-db.

use std::path::{Path, PathBuf};
use std::time::Duration;

use retro_core::CoreError;
use thiserror::Error;

/// Errors from orbit storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The orbit directory exists but was never initialized.
    #[error("Orbit settings file does not exist: {}", path.display())]
    NotInitialized { path: PathBuf },

    /// A record file exists but does not decode.
    #[error("Malformed record {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A record could not be encoded for writing.
    #[error("Failed to encode record {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Waiting for a record lock exceeded the configured bound.
    #[error("Timed out after {waited:?} waiting for lock {}", path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A storage call run off the async runtime did not complete.
    #[error("Storage task failed: {0}")]
    TaskFailed(String),

    /// Invalid input (orbit identifier, URL).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Adapter for `map_err` on I/O results touching `path`.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
