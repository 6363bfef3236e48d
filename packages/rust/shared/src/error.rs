//! Error types for mxdocs.
//!
//! Library crates use [`MxDocsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all mxdocs operations.
#[derive(Debug, thiserror::Error)]
pub enum MxDocsError {
    /// Configuration loading or validation error (including a missing docs root).
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching remote content.
    #[error("network error: {0}")]
    Network(String),

    /// Malformed `BEGIN_*`/`END_*` directive in a documentation page.
    #[error("directive error: {message}")]
    Directive { message: String },

    /// Remote payload could not be decoded (e.g. notebook JSON).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (oversized response, check-mode failure, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MxDocsError>;

impl MxDocsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a directive error from any displayable message.
    pub fn directive(msg: impl Into<String>) -> Self {
        Self::Directive {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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
