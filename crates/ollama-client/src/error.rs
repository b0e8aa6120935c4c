//! Error types for ollama-client

use thiserror::Error;

/// Errors that can occur while talking to an Ollama server
#[derive(Error, Debug)]
pub enum OllamaError {
    /// The server could not be reached at all
    #[error("Failed to connect to Ollama at {url}: {detail}. Is Ollama running?")]
    Unreachable { url: String, detail: String },

    /// The server answered but does not have the requested model
    #[error("Model not found on Ollama server: {0}")]
    ModelNotFound(String),

    /// Non-success status with an error message from the server
    #[error("Ollama returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Invalid response from Ollama: {0}")]
    InvalidResponse(String),

    /// Any other transport error
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for OllamaError {
    fn from(err: reqwest::Error) -> Self {
        OllamaError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for OllamaError {
    fn from(err: serde_json::Error) -> Self {
        OllamaError::InvalidResponse(err.to_string())
    }
}

/// Result type for Ollama operations
pub type Result<T> = std::result::Result<T, OllamaError>;
