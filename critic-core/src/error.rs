//! Error types for critic

use thiserror::Error;

/// Result type alias for critic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for critic operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any external call
    #[error("{0}")]
    Validation(String),

    /// Analysis service call failed
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Feedback persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
