//! Error types for analysis API calls

use thiserror::Error;

/// Result type for analysis API calls
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the analysis API
#[derive(Error, Debug)]
pub enum Error {
    /// Transport error (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or rejected credentials
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-success status from the API
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The response carried no usable message
    #[error("API response contained no review text")]
    EmptyResponse,

    /// The response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid API base URL
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<Error> for critic_core::Error {
    fn from(err: Error) -> Self {
        critic_core::Error::Analysis(err.to_string())
    }
}
