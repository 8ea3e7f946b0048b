//! HTTP error mapping.
//!
//! Every handler returns `ApiError`; the body is always `{"error": message}`.
//! Provider detail goes to the log, never to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::domains::vendors::ResearchError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Research(#[from] ResearchError),

    /// An external service (renderer, identity provider) failed.
    #[error("{message}: {cause:#}")]
    Upstream {
        message: &'static str,
        cause: anyhow::Error,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn upstream(message: &'static str, cause: anyhow::Error) -> Self {
        Self::Upstream { message, cause }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Research(e) => match e {
                ResearchError::UnrecognizedVendor { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ResearchError::NewsNotFound { .. } | ResearchError::NoRelevantNews { .. } => {
                    StatusCode::NOT_FOUND
                }
                ResearchError::ExtractionParse { .. } | ResearchError::ProviderUnavailable { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(m) | Self::Unauthorized(m) | Self::NotFound(m) => m.clone(),
            Self::Research(e) => e.user_message(),
            Self::Upstream { message, .. } => message.to_string(),
            Self::Internal(_) => "Something went wrong".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
