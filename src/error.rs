//! Error types for idremap.
//!
//! Almost every irregularity in the account files is recoverable and
//! becomes a [`Diagnostic`](crate::diagnostics::Diagnostic) instead of an
//! error. What remains here are the conditions a caller explicitly asked
//! to be told about.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for idremap.
#[derive(Debug, Error)]
pub enum IdDbError {
    /// An account file could not be opened or read.
    ///
    /// Only returned under [`MissingFilePolicy::Fail`](crate::config::MissingFilePolicy::Fail).
    #[error("Unable to read account file {}: {source}", path.display())]
    Unreadable {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A report could not be serialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Serializer message.
        message: String,
    },
}

impl IdDbError {
    /// Creates an unreadable-file error.
    #[must_use]
    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error came from reading an account file.
    #[must_use]
    pub const fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }
}
