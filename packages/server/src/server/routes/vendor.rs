//! Vendor research and document generation endpoints.

use axum::{
    extract::{Extension, Path},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap, HeaderValue,
    },
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::common::profile_filename;
use crate::domains::vendors::activities::{
    fetch_news, research_vendor, spawn_persist_profile, ProfileWrite, ResearchOutcome,
};
use crate::domains::vendors::models::ResearchRecord;
use crate::kernel::{AuthenticatedUser, RenderRequest};
use crate::server::app::AppState;
use crate::server::error::ApiError;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

// =============================================================================
// Research (for review, nothing is rendered or persisted)
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    pub client_name: Option<String>,
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub force_regenerate: bool,
}

pub async fn research_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchOutcome>, ApiError> {
    if is_blank(&request.client_name) || is_blank(&request.vendor_name) {
        return Err(ApiError::BadRequest(
            "Client name and vendor name are required".into(),
        ));
    }
    let vendor_name = request.vendor_name.unwrap_or_default();

    let outcome = research_vendor(&state.deps, &vendor_name, request.force_regenerate).await?;
    Ok(Json(outcome))
}

// =============================================================================
// Generate (after the user confirmed the reviewed research)
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub client_name: Option<String>,
    pub vendor_name: Option<String>,
    pub research_data: Option<serde_json::Value>,
    #[serde(default = "default_cache_used")]
    pub cache_used: bool,
}

fn default_cache_used() -> bool {
    true
}

fn attachment_headers(filename: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(DOCX_CONTENT_TYPE));
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| ApiError::Internal(e.into()))?;
    headers.insert(CONTENT_DISPOSITION, disposition);
    Ok(headers)
}

/// Research data as reviewed by the user, with news attached.
///
/// News the client already reviewed is kept as-is, even when empty.
/// Otherwise news is fetched now and its failures are the request's failures.
async fn enrich_with_news(
    state: &AppState,
    vendor_name: &str,
    research_data: serde_json::Value,
) -> Result<ResearchRecord, ApiError> {
    let reviewed_news = research_data
        .get("recent_news")
        .is_some_and(serde_json::Value::is_array);

    let record: ResearchRecord = serde_json::from_value(research_data)
        .map_err(|e| ApiError::BadRequest(format!("researchData is malformed: {}", e)))?;

    if reviewed_news {
        return Ok(record);
    }

    let lookup_name = if record.matched_vendor_name.trim().is_empty() {
        vendor_name.to_string()
    } else {
        record.matched_vendor_name.clone()
    };
    let news = fetch_news(
        state.deps.ai.as_ref(),
        state.deps.news_search.as_ref(),
        &lookup_name,
        record.financials.company_type.as_deref(),
    )
    .await?;

    Ok(record.with_news(news))
}

pub async fn generate_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<GenerateRequest>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let (Some(client_name), Some(vendor_name), Some(research_data)) =
        (request.client_name, request.vendor_name, request.research_data)
    else {
        return Err(ApiError::BadRequest(
            "clientName, vendorName, and researchData are required".into(),
        ));
    };
    if client_name.trim().is_empty() || vendor_name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "clientName, vendorName, and researchData are required".into(),
        ));
    }

    let enriched = enrich_with_news(&state, &vendor_name, research_data).await?;

    let document = state
        .deps
        .renderer
        .render(&RenderRequest {
            client_name: &client_name,
            vendor_name: &vendor_name,
            research_data: &enriched,
        })
        .await
        .map_err(|e| ApiError::upstream("Failed to generate document", e))?;

    let headers = attachment_headers(&profile_filename(&client_name, &vendor_name, Utc::now()))?;
    info!(vendor = %vendor_name, cache_used = request.cache_used, size = document.len(), "Document generated");

    spawn_persist_profile(
        state.deps.store.clone(),
        ProfileWrite {
            user_id: user.id,
            client_name,
            vendor_name,
            research_data: enriched,
            cache_used: request.cache_used,
        },
    );

    Ok((headers, document))
}

// =============================================================================
// Download (re-render a stored profile)
// =============================================================================

pub async fn download_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let profile = state
        .deps
        .store
        .find_profile(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    let document = state
        .deps
        .renderer
        .render(&RenderRequest {
            client_name: &profile.client_name,
            vendor_name: &profile.vendor_name,
            research_data: &profile.research_data.0,
        })
        .await
        .map_err(|e| ApiError::upstream("Failed to download document", e))?;

    let generated_at: DateTime<Utc> = profile.created_at;
    let headers = attachment_headers(&profile_filename(
        &profile.client_name,
        &profile.vendor_name,
        generated_at,
    ))?;
    Ok((headers, document))
}
