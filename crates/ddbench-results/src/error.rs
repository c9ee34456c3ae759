//! Error handling for results loading.
//!
//! Only failures that stop a whole operation surface here. A single bad
//! artifact inside a batch is logged and skipped by the loaders instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for results operations.
pub type ResultsResult<T> = Result<T, ResultsError>;

/// Errors that abort a load or analysis step.
#[derive(Error, Debug)]
pub enum ResultsError {
    /// Filesystem access failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file that must be valid JSON was not.
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Error reports are never written into an existing directory.
    #[error("Output directory already exists: {}", .0.display())]
    OutputExists(PathBuf),

    /// Category configuration is inconsistent.
    #[error("Invalid category config: {0}")]
    InvalidConfig(String),
}

impl ResultsError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ResultsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        ResultsError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}
