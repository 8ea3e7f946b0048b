// TestDependencies - mock implementations for testing
//
// Provides recording mock services that can be injected into ServerDeps for
// unit and integration tests. Responses are queued and consumed in order.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::stores::MemoryStore;
use super::{
    AuthenticatedUser, BaseAI, BaseDocumentRenderer, BaseIdentityProvider, BaseSearchService,
    CompletionOptions, RenderRequest, SearchHit, SearchOptions, ServerDeps,
};

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

pub struct MockAI {
    responses: Arc<Mutex<Vec<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<(String, CompletionOptions)>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(response.into()));
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.with_response(json)
    }

    /// Queue a provider failure
    pub fn with_error(self, message: &str) -> Self {
        self.responses.lock().unwrap().push(Err(message.to_string()));
        self
    }

    /// Get all prompts that were sent to the AI
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    /// Get the options of every call, in order
    pub fn options(&self) -> Vec<CompletionOptions> {
        self.calls.lock().unwrap().iter().map(|(_, o)| *o).collect()
    }

    /// Get the last prompt sent to the AI
    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(p, _)| p.clone())
    }

    /// Check if a prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|(p, _)| p.contains(text))
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str, options: CompletionOptions) -> Result<String> {
        // Record the call
        self.calls.lock().unwrap().push((prompt.to_string(), options));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok("Mock AI response".to_string());
        }
        responses.remove(0).map_err(|e| anyhow::anyhow!(e))
    }
}

// =============================================================================
// Mock Search Service
// =============================================================================

pub struct MockSearchService {
    responses: Arc<Mutex<Vec<Result<Vec<SearchHit>, String>>>>,
    calls: Arc<Mutex<Vec<(String, SearchOptions)>>>,
}

impl MockSearchService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue the hits returned by the next search
    pub fn with_hits(self, hits: Vec<SearchHit>) -> Self {
        self.responses.lock().unwrap().push(Ok(hits));
        self
    }

    /// Queue a provider failure
    pub fn with_error(self, message: &str) -> Self {
        self.responses.lock().unwrap().push(Err(message.to_string()));
        self
    }

    /// Get all queries, in order
    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    /// Get the options of every search, in order
    pub fn options(&self) -> Vec<SearchOptions> {
        self.calls.lock().unwrap().iter().map(|(_, o)| o.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockSearchService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSearchService for MockSearchService {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), options.clone()));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return empty results by default
            return Ok(vec![]);
        }
        responses.remove(0).map_err(|e| anyhow::anyhow!(e))
    }
}

// =============================================================================
// Mock Identity Provider
// =============================================================================

pub struct MockIdentityProvider {
    tokens: Arc<Mutex<Vec<(String, AuthenticatedUser)>>>,
    users: Arc<Mutex<Vec<AuthenticatedUser>>>,
    list_fails: bool,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(Mutex::new(Vec::new())),
            users: Arc::new(Mutex::new(Vec::new())),
            list_fails: false,
        }
    }

    /// Accept `token` as belonging to `email`. Returns the generated user too.
    pub fn with_user(self, token: &str, email: &str) -> Self {
        let user = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        self.users.lock().unwrap().push(user.clone());
        self.tokens.lock().unwrap().push((token.to_string(), user));
        self
    }

    /// The admin user listing errors
    pub fn with_failing_list(mut self) -> Self {
        self.list_fails = true;
        self
    }

    /// The user a token maps to, if any
    pub fn user_for(&self, token: &str) -> Option<AuthenticatedUser> {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, u)| u.clone())
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityProvider for MockIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<Option<AuthenticatedUser>> {
        Ok(self.user_for(token))
    }

    async fn list_users(&self) -> Result<Vec<AuthenticatedUser>> {
        if self.list_fails {
            anyhow::bail!("admin user listing unavailable");
        }
        Ok(self.users.lock().unwrap().clone())
    }
}

// =============================================================================
// Mock Document Renderer
// =============================================================================

/// Captured render payload
#[derive(Debug, Clone)]
pub struct RenderCall {
    pub client_name: String,
    pub vendor_name: String,
    pub research_data: serde_json::Value,
}

pub struct MockRenderer {
    document: Vec<u8>,
    fail: bool,
    calls: Arc<Mutex<Vec<RenderCall>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            document: b"PK\x03\x04mock-docx".to_vec(),
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn document(&self) -> &[u8] {
        &self.document
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDocumentRenderer for MockRenderer {
    async fn render(&self, request: &RenderRequest<'_>) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(RenderCall {
            client_name: request.client_name.to_string(),
            vendor_name: request.vendor_name.to_string(),
            research_data: serde_json::to_value(request.research_data)?,
        });
        if self.fail {
            anyhow::bail!("Document renderer error 500");
        }
        Ok(self.document.clone())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub financial_search: Arc<MockSearchService>,
    pub news_search: Arc<MockSearchService>,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<MockIdentityProvider>,
    pub renderer: Arc<MockRenderer>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            financial_search: Arc::new(MockSearchService::new()),
            news_search: Arc::new(MockSearchService::new()),
            store: Arc::new(MemoryStore::new()),
            identity: Arc::new(MockIdentityProvider::new()),
            renderer: Arc::new(MockRenderer::new()),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Set the financial/ownership search mock
    pub fn mock_financial_search(mut self, service: MockSearchService) -> Self {
        self.financial_search = Arc::new(service);
        self
    }

    /// Set the news search mock
    pub fn mock_news_search(mut self, service: MockSearchService) -> Self {
        self.news_search = Arc::new(service);
        self
    }

    pub fn mock_store(mut self, store: MemoryStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn mock_identity(mut self, identity: MockIdentityProvider) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    pub fn mock_renderer(mut self, renderer: MockRenderer) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Convert into ServerDeps for testing. Mocks stay shared with `self`.
    pub fn into_server_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.ai,
            self.financial_search,
            self.news_search,
            self.store,
            self.identity,
            self.renderer,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
