//! Harness error types.

use std::path::PathBuf;

use personality_knot_core::KnotError;
use thiserror::Error;

/// Errors raised while loading data, configuring runs, or writing reports.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level document shape is not a profile list, wrapper object, or profile.
    #[error("Unsupported document shape in {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] KnotError),
}

/// Result type for harness operations.
pub type BenchResult<T> = Result<T, BenchError>;

impl BenchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        BenchError::Config(reason.into())
    }
}
