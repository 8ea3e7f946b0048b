use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::kernel::BaseIdentityProvider;
use crate::server::error::ApiError;

/// Bearer-token authentication middleware
///
/// Verifies the token with the identity provider and adds the
/// `AuthenticatedUser` to request extensions. Unauthenticated requests are
/// rejected with 401.
pub async fn require_auth(
    identity: Arc<dyn BaseIdentityProvider>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Ok(token) => token.to_string(),
        Err(rejection) => return rejection.into_response(),
    };

    match identity.verify_token(&token).await {
        Ok(Some(user)) => {
            debug!(user_id = %user.id, "Authenticated user");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => ApiError::Unauthorized("Invalid token".into()).into_response(),
        Err(e) => {
            error!(error = %e, "Token verification failed");
            ApiError::Internal(anyhow::anyhow!("Authentication failed")).into_response()
        }
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(request: &Request<Body>) -> Result<&str, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("No authorization header provided".into()))?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.split_whitespace().nth(1))
        .ok_or_else(|| ApiError::Unauthorized("No token provided".into()))
}
