//! Error types for the LLM layer.

use thiserror::Error;

/// Result type alias for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while talking to a chat model.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Backend is misconfigured (bad URL, empty model name).
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    /// The server answered with an error.
    #[error("model server error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Reply could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
