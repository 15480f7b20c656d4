//! Error types for feedcal.

use thiserror::Error;

use crate::ics::DecodeError;

/// Errors that can occur in feedcal operations.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for feedcal operations.
pub type FeedResult<T> = Result<T, FeedError>;
