//! # Error Types
//!
//! Errors raised while loading or saving catalog documents. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations and
//! carry the document origin so a report can name the offending file.

use thiserror::Error;

/// Top-level error type for catalog document handling.
#[derive(Error, Debug)]
pub enum GenIndexError {
    /// The document is not valid JSON or does not match the typed model.
    #[error("failed to parse index {origin}: {reason}")]
    Parse {
        /// File path or label of the document.
        origin: String,
        /// Parser message, including line and column when known.
        reason: String,
    },

    /// The in-memory index could not be serialized.
    #[error("failed to serialize index: {0}")]
    Serialization(String),

    /// Reading or writing the document failed.
    #[error("io error on {path}: {source}")]
    Io {
        /// Path of the file being read or written.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl GenIndexError {
    /// Build a `Parse` error from a `serde_json` failure.
    pub(crate) fn parse(origin: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::Parse {
            origin: origin.into(),
            reason: format!("{err} (line {}, column {})", err.line(), err.column()),
        }
    }
}
