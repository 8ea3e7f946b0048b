//! Router harness for integration testing.
//!
//! Builds the real axum app over `TestDependencies` so every request goes
//! through routing, auth and error mapping, with no network or database.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

use vendor_core::kernel::test_dependencies::{MockIdentityProvider, TestDependencies};
use vendor_core::server::build_app;

pub const VALID_TOKEN: &str = "valid-test-token";
pub const TEST_EMAIL: &str = "analyst@example.org";

pub struct TestHarness {
    pub deps: TestDependencies,
    pub app: Router,
}

/// Response with the body already read.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or_default().to_string()
    }
}

impl TestHarness {
    /// Build the app over the given mocks. A user with `VALID_TOKEN` is added
    /// unless the identity mock was already replaced.
    pub fn new(deps: TestDependencies) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let app = build_app(deps.clone().into_server_deps(), &[]);
        Self { deps, app }
    }

    /// Harness with the default signed-in analyst.
    pub fn with_mocks(deps: TestDependencies) -> Self {
        Self::new(deps.mock_identity(MockIdentityProvider::new().with_user(VALID_TOKEN, TEST_EMAIL)))
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(VALID_TOKEN), None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(VALID_TOKEN), Some(body)).await
    }

    /// Wait for detached persistence to reach `expected` profile inserts.
    pub async fn wait_for_inserts(&self, expected: usize) {
        for _ in 0..100 {
            if self.deps.store.profile_inserts() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} profile inserts, saw {}",
            expected,
            self.deps.store.profile_inserts()
        );
    }

    /// Give a detached task that should do nothing time to (not) run.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
