// AI implementation using Anthropic Claude
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain activities.

use anthropic_client::{AnthropicClient, Message, MessagesRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{BaseAI, CompletionOptions, ModelTier};

/// Claude implementation of AI capabilities.
///
/// Maps each `ModelTier` onto a configured model name.
#[derive(Clone)]
pub struct ClaudeAI {
    client: AnthropicClient,
    fast_model: String,
    extraction_model: String,
}

impl ClaudeAI {
    pub fn new(
        client: AnthropicClient,
        fast_model: impl Into<String>,
        extraction_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            fast_model: fast_model.into(),
            extraction_model: extraction_model.into(),
        }
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Extraction => &self.extraction_model,
        }
    }
}

#[async_trait]
impl BaseAI for ClaudeAI {
    async fn complete(&self, prompt: &str, options: CompletionOptions) -> Result<String> {
        let model = self.model_for(options.model);
        let request = MessagesRequest::new(model, options.max_tokens)
            .temperature(options.temperature)
            .message(Message::user(prompt));

        let response = self
            .client
            .messages(request)
            .await
            .with_context(|| format!("Claude completion failed (model {})", model))?;

        if let Some(usage) = &response.usage {
            debug!(
                model = %model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Claude completion"
            );
        }
        Ok(response.text)
    }
}
