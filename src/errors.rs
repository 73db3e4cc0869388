//! Crate-level error type
//!
//! The extraction algorithms themselves never fail; only reading a corpus
//! from disk and loading a JSON spec can.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced at the I/O and configuration boundary
#[derive(Debug, Error)]
pub enum LocalMaxsError {
    /// A corpus file or directory could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON extraction spec could not be parsed
    #[error("invalid extraction spec: {0}")]
    InvalidSpec(#[from] serde_json::Error),

    /// The extraction spec parsed but failed validation
    #[error("extraction spec failed validation: {0}")]
    Validation(String),
}

impl LocalMaxsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used at the crate's fallible boundaries
pub type Result<T> = std::result::Result<T, LocalMaxsError>;
