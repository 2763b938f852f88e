//! Error types for the chat-completions client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// Chat-completions client errors.
///
/// Non-2xx responses keep their status code so callers can classify them
/// without parsing the message.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, HTTP client could not be built)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection refused, reset, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Endpoint answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response without usable content
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// HTTP status code, when the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenAIError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OpenAIError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OpenAIError::Timeout
        } else if e.is_decode() {
            OpenAIError::Parse(e.to_string())
        } else {
            OpenAIError::Network(e.to_string())
        }
    }
}
