use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{BaseSearchService, SearchHit, SearchOptions};

const EXA_SEARCH_URL: &str = "https://api.exa.ai/search";

/// Exa API client for highlighted web search
pub struct ExaClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

/// Exa API request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaRequest {
    query: String,
    num_results: usize,
    use_autoprompt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    contents: Option<ExaContents>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_published_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaContents {
    highlights: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlights_query: Option<String>,
}

/// Exa API response
#[derive(Debug, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
struct ExaResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    highlights: Vec<String>,
}

impl ExaClient {
    /// Create a new Exa client
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            base_url: EXA_SEARCH_URL.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request(query: &str, options: &SearchOptions) -> ExaRequest {
        let contents = options.want_highlights.then(|| ExaContents {
            highlights: true,
            highlights_query: options.highlights_query.clone(),
        });
        let start_published_date = options.recency_window_days.map(|days| {
            (Utc::now() - Duration::days(days as i64))
                .format("%Y-%m-%d")
                .to_string()
        });

        ExaRequest {
            query: query.to_string(),
            num_results: options.result_count,
            use_autoprompt: true,
            contents,
            include_domains: options.domain_whitelist.clone(),
            start_published_date,
        }
    }
}

#[async_trait]
impl BaseSearchService for ExaClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        if self.api_key.is_empty() {
            anyhow::bail!("Exa API key is missing");
        }

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .json(&Self::build_request(query, options))
            .send()
            .await
            .context("Failed to send Exa search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Exa API error {}: {}", status, body);
        }

        let exa_response: ExaResponse = response
            .json()
            .await
            .context("Failed to parse Exa response")?;

        Ok(exa_response
            .results
            .into_iter()
            .map(|r| SearchHit {
                url: r.url,
                title: r.title,
                highlights: r.highlights,
            })
            .collect())
    }
}
