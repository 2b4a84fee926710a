//! Error types for listforge.
//!
//! Library crates use [`ListforgeError`] via `thiserror`.
//! The CLI crate wraps this with `color-eyre` for rich diagnostics.
//! Per-source fetch failures are NOT represented here — they are data
//! (carried inside each fetch outcome), not control flow.

use std::path::PathBuf;

/// Top-level error type for all listforge operations.
#[derive(Debug, thiserror::Error)]
pub enum ListforgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Failure to build the shared HTTP client.
    #[error("network error: {0}")]
    Network(String),

    /// Every source in a non-empty run failed to download.
    #[error("all {total} sources failed to download")]
    AllSourcesFailed { total: usize },

    /// Success ratio fell below the configured minimum.
    #[error("only {success} of {total} sources succeeded, below the {min_percent}% minimum")]
    BelowSuccessThreshold {
        success: usize,
        total: usize,
        min_percent: u8,
    },

    /// External rule compiler failed (spawn error or non-zero exit).
    #[error("compiler error: {0}")]
    Compiler(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ListforgeError>;

impl ListforgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
