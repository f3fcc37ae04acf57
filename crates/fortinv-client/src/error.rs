//! Error types for the controller client

use thiserror::Error;

/// Errors that can occur when talking to the controller
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed (connection refused, TLS failure, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid controller URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Controller returned an error status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
