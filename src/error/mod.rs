//! Unified error handling for rback

use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The record source could not deliver a resource kind
    /// (kubectl failed, file missing, permission denied).
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// A record lacked an expected field or had an unexpected type.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the failure happened at the record source rather than in
    /// resolution. Used by the binary to pick an exit code.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, AppError::Retrieval(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Retrieval(err.to_string())
    }
}
