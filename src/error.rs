//! Error types for record update operations.
//!
//! This module provides the [`UpdateError`] type for all update rule operations
//! and the [`Result`] convenience type.
//!
//! Authorization rejections are not errors; they are reported as
//! [`ValidationMessage`](crate::messages::ValidationMessage) lists. The
//! variants here cover malformed payloads, bad configuration and repository
//! failures.

use thiserror::Error;

/// Error type for all update rule operations.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Error indicating an invalid or malformed record payload.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Error indicating a malformed field tag.
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// Error indicating a malformed tag set specification.
    #[error("Invalid tag set: {0}")]
    InvalidTagSet(String),

    /// Error from JSON serialization or deserialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the backing record repository.
    #[error("Repository error: {0}")]
    Repository(String),
}

/// Convenience type alias for [`std::result::Result`] with [`UpdateError`].
pub type Result<T> = std::result::Result<T, UpdateError>;
