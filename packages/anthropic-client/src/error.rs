//! Error types for Anthropic client.

use thiserror::Error;

/// Result type for Anthropic client operations.
pub type Result<T> = std::result::Result<T, AnthropicError>;

/// Anthropic client errors.
#[derive(Debug, Error)]
pub enum AnthropicError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request exceeded the client timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Network error (connection failed)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AnthropicError {
    /// Whether the failure came from the provider being slow or unreachable
    /// rather than from a rejected request.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Config(_) | Self::Parse(_) => false,
        }
    }
}
