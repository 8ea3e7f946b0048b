use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{BaseSearchService, SearchHit, SearchOptions};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Tavily API client for news search
pub struct TavilyClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

/// Tavily search topic
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Topic {
    General,
    News,
}

/// Tavily API request
#[derive(Debug, Serialize)]
struct TavilyRequest {
    api_key: String,
    query: String,
    topic: Topic,
    max_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include_domains: Vec<String>,
}

/// Tavily API response
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

/// Individual search result from Tavily
#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: Option<String>,
    url: String,
    #[serde(default)]
    content: Option<String>,
}

impl TavilyClient {
    /// Create a new Tavily client
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            base_url: TAVILY_SEARCH_URL.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request(&self, query: &str, options: &SearchOptions) -> TavilyRequest {
        TavilyRequest {
            api_key: self.api_key.clone(),
            query: query.to_string(),
            topic: if options.news_only { Topic::News } else { Topic::General },
            max_results: options.result_count,
            days: options.recency_window_days,
            include_domains: options.domain_whitelist.clone(),
        }
    }
}

#[async_trait]
impl BaseSearchService for TavilyClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        if self.api_key.is_empty() {
            anyhow::bail!("News search is not configured: TAVILY_API_KEY is missing");
        }

        let response = self
            .client
            .post(&self.base_url)
            .json(&self.build_request(query, options))
            .send()
            .await
            .context("Failed to send Tavily search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tavily API error {}: {}", status, body);
        }

        let tavily_response: TavilyResponse = response
            .json()
            .await
            .context("Failed to parse Tavily response")?;

        let results = tavily_response
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                highlights: r.content.into_iter().collect(),
            })
            .collect();

        Ok(results)
    }
}
