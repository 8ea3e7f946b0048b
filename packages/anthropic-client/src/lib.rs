//! Pure Anthropic Messages REST API client
//!
//! A minimal client for the Anthropic Messages API with no domain-specific
//! logic. Callers own prompting and response parsing.
//!
//! # Example
//!
//! ```rust,ignore
//! use anthropic_client::{AnthropicClient, Message, MessagesRequest};
//!
//! let client = AnthropicClient::from_env()?;
//!
//! let response = client
//!     .messages(
//!         MessagesRequest::new("claude-3-haiku-20240307", 500)
//!             .temperature(0.1)
//!             .message(Message::user("Hello!")),
//!     )
//!     .await?;
//!
//! println!("{}", response.text);
//! ```

pub mod error;
pub mod types;

pub use error::{AnthropicError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pure Anthropic API client.
#[derive(Clone)]
pub struct AnthropicClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl AnthropicClient {
    /// Create a new Anthropic client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create from environment variable `CLAUDE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CLAUDE_API_KEY")
            .map_err(|_| AnthropicError::Config("CLAUDE_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies, test servers, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a Messages API request and return the flattened text response.
    pub async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        if self.api_key.is_empty() {
            return Err(AnthropicError::Config("Claude API key is missing".into()));
        }

        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, model = %request.model, "Anthropic request failed");
                if e.is_timeout() {
                    AnthropicError::Timeout(self.timeout.as_secs())
                } else {
                    AnthropicError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<types::ErrorEnvelope>(&error_text)
                .map(|env| format!("{}: {}", env.error.error_type, env.error.message))
                .unwrap_or(error_text);
            warn!(status = %status, error = %message, "Anthropic API error");
            return Err(AnthropicError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: types::MessagesResponseRaw = response
            .json()
            .await
            .map_err(|e| AnthropicError::Parse(e.to_string()))?;

        let response = raw.into_response();
        if response.text.is_empty() {
            return Err(AnthropicError::Parse("No text content in response".into()));
        }

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            stop_reason = ?response.stop_reason,
            "Anthropic message completion"
        );

        Ok(response)
    }
}
