use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

const STORE_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    store: StoreHealth,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StoreHealth {
    Ok,
    Error { error: String },
}

/// Liveness plus a store round-trip.
///
/// 200 when the store answers within 5s, 503 otherwise. Providers are not
/// probed: each call is metered.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = match tokio::time::timeout(STORE_PROBE_TIMEOUT, state.deps.store.ping()).await {
        Ok(Ok(())) => StoreHealth::Ok,
        Ok(Err(e)) => StoreHealth::Error {
            error: format!("Query failed: {}", e),
        },
        Err(_) => StoreHealth::Error {
            error: format!("Query timeout (>{}s)", STORE_PROBE_TIMEOUT.as_secs()),
        },
    };

    let (code, status) = match store {
        StoreHealth::Ok => (StatusCode::OK, "healthy"),
        StoreHealth::Error { .. } => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    (code, Json(HealthResponse { status, store }))
}
