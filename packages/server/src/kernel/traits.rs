// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "resolve a vendor name") lives in domain activities
// that call through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseSearchService)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::domains::vendors::models::{NewProfile, Profile, ResearchRecord, VendorCacheEntry};

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

/// Which configured model a call should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Cheap, fast model for classification-style calls
    Fast,
    /// Stronger model for multi-field extraction
    Extraction,
}

/// Sampling parameters for a single completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub model: ModelTier,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionOptions {
    pub fn new(model: ModelTier, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model,
            max_tokens,
            temperature,
        }
    }
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response).
    /// Callers extract JSON from the text themselves.
    async fn complete(&self, prompt: &str, options: CompletionOptions) -> Result<String>;
}

// =============================================================================
// Search Trait (Infrastructure - web/news search providers)
// =============================================================================

/// One search result, normalized across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: Option<String>,
    /// Highlighted snippets (Exa) or the content summary (Tavily)
    pub highlights: Vec<String>,
}

/// Search request options. Providers ignore options they do not support.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct SearchOptions {
    pub result_count: usize,
    #[builder(default, setter(strip_option))]
    pub recency_window_days: Option<u32>,
    #[builder(default)]
    pub domain_whitelist: Vec<String>,
    #[builder(default)]
    pub want_highlights: bool,
    /// Steer which passages get highlighted (Exa)
    #[builder(default, setter(strip_option, into))]
    pub highlights_query: Option<String>,
    /// Restrict to news sources (Tavily `topic=news`)
    #[builder(default)]
    pub news_only: bool,
}

#[async_trait]
pub trait BaseSearchService: Send + Sync {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>>;
}

// =============================================================================
// Identity Provider Trait (Infrastructure - token verification)
// =============================================================================

/// A user as known to the external identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[async_trait]
pub trait BaseIdentityProvider: Send + Sync {
    /// Verify a bearer token. `Ok(None)` means the token was rejected.
    async fn verify_token(&self, token: &str) -> Result<Option<AuthenticatedUser>>;

    /// List known users (used to attribute history rows to emails).
    async fn list_users(&self) -> Result<Vec<AuthenticatedUser>>;
}

// =============================================================================
// Document Renderer Trait (Infrastructure - external document service)
// =============================================================================

/// Payload sent to the renderer. The document format is opaque to us.
#[derive(Debug, Clone, Serialize)]
pub struct RenderRequest<'a> {
    pub client_name: &'a str,
    pub vendor_name: &'a str,
    pub research_data: &'a ResearchRecord,
}

#[async_trait]
pub trait BaseDocumentRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest<'_>) -> Result<Vec<u8>>;
}

// =============================================================================
// Store Trait (Infrastructure - relational store)
// =============================================================================

/// Persistence for the vendor cache and generated-profile history.
///
/// The store is the only source of atomicity; callers take no locks.
#[async_trait]
pub trait BaseVendorStore: Send + Sync {
    /// Exact, case-sensitive lookup by the raw vendor name.
    async fn find_cache_entry(&self, vendor_name: &str) -> Result<Option<VendorCacheEntry>>;

    /// Insert or overwrite the cache row for `entry.vendor_name`.
    async fn upsert_cache_entry(&self, entry: &VendorCacheEntry) -> Result<()>;

    /// First profile whose trimmed vendor name equals `dedup_key` ignoring case.
    async fn find_profile_by_dedup_key(&self, dedup_key: &str) -> Result<Option<Profile>>;

    /// Delete every profile matching `dedup_key`. Returns rows removed.
    async fn delete_profiles_by_dedup_key(&self, dedup_key: &str) -> Result<u64>;

    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile>;

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>>;

    /// All profiles, newest first.
    async fn list_profiles(&self) -> Result<Vec<Profile>>;

    /// Cheap connectivity check for the health endpoint.
    async fn ping(&self) -> Result<()>;
}
