use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{BaseDocumentRenderer, RenderRequest};

/// HTTP client for the external document rendering service.
pub struct RendererClient {
    base_url: String,
    client: reqwest::Client,
}

impl RendererClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/generate-document", self.base_url)
    }
}

#[async_trait]
impl BaseDocumentRenderer for RendererClient {
    async fn render(&self, request: &RenderRequest<'_>) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .context("Failed to reach document renderer")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Document renderer error {}: {}", status, body);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read rendered document")?;
        debug!(vendor = %request.vendor_name, size = bytes.len(), "Document rendered");
        Ok(bytes.to_vec())
    }
}
