//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by the vendor
//! research activities and HTTP handlers. All external services use trait
//! abstractions to enable testing.

use std::sync::Arc;

use anthropic_client::AnthropicClient;
use anyhow::Result;
use sqlx::PgPool;

use crate::config::Config;
use crate::kernel::{
    ai::ClaudeAI, exa_client::ExaClient, renderer_client::RendererClient, stores::PostgresStore,
    supabase_auth::SupabaseAuth, tavily_client::TavilyClient, BaseAI, BaseDocumentRenderer,
    BaseIdentityProvider, BaseSearchService, BaseVendorStore,
};

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    /// LLM for resolution, extraction, ownership and news validation
    pub ai: Arc<dyn BaseAI>,
    /// Highlighted web search (Exa) for financial and ownership facts
    pub financial_search: Arc<dyn BaseSearchService>,
    /// News-topic search (Tavily)
    pub news_search: Arc<dyn BaseSearchService>,
    pub store: Arc<dyn BaseVendorStore>,
    pub identity: Arc<dyn BaseIdentityProvider>,
    pub renderer: Arc<dyn BaseDocumentRenderer>,
}

impl ServerDeps {
    pub fn new(
        ai: Arc<dyn BaseAI>,
        financial_search: Arc<dyn BaseSearchService>,
        news_search: Arc<dyn BaseSearchService>,
        store: Arc<dyn BaseVendorStore>,
        identity: Arc<dyn BaseIdentityProvider>,
        renderer: Arc<dyn BaseDocumentRenderer>,
    ) -> Self {
        Self {
            ai,
            financial_search,
            news_search,
            store,
            identity,
            renderer,
        }
    }

    /// Build the production clients once at startup.
    pub fn from_config(config: &Config, pool: PgPool) -> Result<Self> {
        let ai = ClaudeAI::new(
            AnthropicClient::new(config.claude_api_key.clone()),
            config.resolver_model.clone(),
            config.extraction_model.clone(),
        );

        Ok(Self::new(
            Arc::new(ai),
            Arc::new(ExaClient::new(config.exa_api_key.clone())?),
            Arc::new(TavilyClient::new(config.tavily_api_key.clone())?),
            Arc::new(PostgresStore::new(pool)),
            Arc::new(SupabaseAuth::new(
                config.supabase_url.clone(),
                config.supabase_service_role_key.clone(),
            )?),
            Arc::new(RendererClient::new(config.renderer_url.clone())?),
        ))
    }
}
