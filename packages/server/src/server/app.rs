//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::kernel::ServerDeps;
use crate::server::middleware::require_auth;
use crate::server::routes::{
    download_handler, generate_handler, health_handler, list_profiles_handler, me_handler,
    research_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([CONTENT_DISPOSITION])
}

/// Build the Axum application router
///
/// Everything under `/api` requires a bearer token; `/health` is public.
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let identity = deps.identity.clone();
    let app_state = AppState {
        deps: Arc::new(deps),
    };

    let api = Router::new()
        .route("/auth/me", get(me_handler))
        .route("/vendor/research", post(research_handler))
        .route("/vendor/generate", post(generate_handler))
        .route("/vendor/download/:id", get(download_handler))
        .route("/profiles", get(list_profiles_handler))
        .route_layer(middleware::from_fn(move |req, next| {
            require_auth(identity.clone(), req, next)
        }));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
