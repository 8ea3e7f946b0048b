//! Anthropic Messages API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Messages
// =============================================================================

/// Messages API request.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    /// Model to use (e.g., "claude-3-haiku-20240307")
    pub model: String,

    /// Maximum tokens to generate (required by the API)
    pub max_tokens: u32,

    /// Conversation messages
    pub messages: Vec<Message>,

    /// Optional system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling temperature (0.0 to 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl MessagesRequest {
    /// Create a new request with the given model and token limit.
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages: Vec::new(),
            system: None,
            temperature: None,
        }
    }

    /// Add a message to the conversation.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Set the system prompt.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Conversation message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role: "user" or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message (used for prefilling).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Messages API response, flattened to the text the model produced.
#[derive(Debug, Clone)]
pub struct MessagesResponse {
    /// Concatenated text of all text content blocks
    pub text: String,

    /// Why the model stopped ("end_turn", "max_tokens", ...)
    pub stop_reason: Option<String>,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Raw response from the API (for internal parsing).
#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponseRaw {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A single content block. Only text blocks carry data we use.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl MessagesResponseRaw {
    pub(crate) fn into_response(self) -> MessagesResponse {
        let text = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        MessagesResponse {
            text,
            stop_reason: self.stop_reason,
            usage: self.usage,
        }
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    pub input_tokens: u32,

    /// Tokens in the completion
    pub output_tokens: u32,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}
