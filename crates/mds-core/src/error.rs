//! Error types for `mds-core`.
//!
//! This module provides a unified error type for every encode, decode and
//! block I/O operation of the crate.

use thiserror::Error;

/// Result type alias for `mds-core` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding, decoding or reading column blocks.
///
/// Error codes follow the pattern `MDS-XXX` for easy debugging.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error on the underlying stream (MDS-001).
    #[error("[MDS-001] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or truncated binary (MDS-002).
    ///
    /// Decoding is fail-fast: the first structural inconsistency aborts the chunk.
    #[error("[MDS-002] Corrupted binary: {0}")]
    Corrupted(String),

    /// A compressor failed to compress or decompress (MDS-003).
    #[error("[MDS-003] Compressor '{compressor}' failed: {message}")]
    Compression {
        /// Identifier of the failing compressor.
        compressor: String,
        /// Failure description.
        message: String,
    },

    /// No compressor registered under the identifier (MDS-004).
    #[error("[MDS-004] Unknown compressor '{0}'")]
    UnknownCompressor(String),

    /// Maker identifier outside the closed dispatch table (MDS-005).
    #[error("[MDS-005] Unknown column maker '{0}'")]
    UnknownMaker(String),

    /// Value type does not match the column type (MDS-006).
    #[error("[MDS-006] Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Column type.
        expected: String,
        /// Type of the offered value.
        actual: String,
    },

    /// Operation not supported on this column (MDS-007).
    ///
    /// Raised when mutating a read-only decoded column. This is a contract
    /// violation, not a data condition.
    #[error("[MDS-007] Unsupported operation: {0}")]
    Unsupported(String),

    /// Operation invalid in the current state (MDS-008).
    #[error("[MDS-008] Illegal state: {0}")]
    IllegalState(String),

    /// Configuration error (MDS-009).
    #[error("[MDS-009] Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code (e.g., "MDS-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "MDS-001",
            Self::Corrupted(_) => "MDS-002",
            Self::Compression { .. } => "MDS-003",
            Self::UnknownCompressor(_) => "MDS-004",
            Self::UnknownMaker(_) => "MDS-005",
            Self::TypeMismatch { .. } => "MDS-006",
            Self::Unsupported(_) => "MDS-007",
            Self::IllegalState(_) => "MDS-008",
            Self::Config(_) => "MDS-009",
        }
    }

    /// Returns true if the caller may reasonably retry or continue.
    ///
    /// Corrupted data and contract violations are never recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Corrupted(_) | Self::Unsupported(_) | Self::IllegalState(_)
        )
    }

    pub(crate) fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
