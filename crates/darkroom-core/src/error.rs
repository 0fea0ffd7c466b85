//! # Error Types
//!
//! Errors raised while constructing core values. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Schedule errors carry the offending timestamps so a rejected record can
//! be traced back to its source without re-fetching it.

use thiserror::Error;

use crate::temporal::Timestamp;

/// Top-level error type for core value construction.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Event timestamps are not ordered `starts_at <= ends_at <= release_at`.
    #[error("malformed schedule: starts_at={starts_at}, ends_at={ends_at}, release_at={release_at}")]
    MalformedSchedule {
        /// Capture window opening.
        starts_at: Timestamp,
        /// Capture window closing.
        ends_at: Timestamp,
        /// Reveal instant.
        release_at: Timestamp,
    },

    /// Join code has the wrong length or contains characters outside the alphabet.
    #[error("invalid join code {0:?}")]
    InvalidJoinCode(String),

    /// Timestamp could not be parsed or is outside the representable range.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Serialization/deserialization error at the remote-store boundary.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
