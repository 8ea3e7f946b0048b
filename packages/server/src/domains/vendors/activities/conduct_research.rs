//! Research orchestration: resolve, extract, range, news.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::{
    apply_disclosure_ranges, cache_vendor, extract_financials, fetch_news, get_cached_vendor,
    resolve_vendor_name,
};
use crate::domains::vendors::models::ResearchRecord;
use crate::domains::vendors::ResearchError;
use crate::kernel::ServerDeps;

/// Run the full pipeline for one raw vendor name.
///
/// An unrecognized vendor fails before any search is issued.
pub async fn conduct_research(
    deps: &ServerDeps,
    raw_input: &str,
) -> Result<ResearchRecord, ResearchError> {
    let identity = resolve_vendor_name(deps.ai.as_ref(), raw_input).await?;
    info!(
        input = %raw_input,
        matched = %identity.matched_vendor_name,
        confidence = identity.confidence_score,
        "Vendor resolved"
    );

    let facts = extract_financials(
        deps.ai.as_ref(),
        deps.financial_search.as_ref(),
        &identity.matched_vendor_name,
    )
    .await?;
    let facts = apply_disclosure_ranges(facts);

    let news = fetch_news(
        deps.ai.as_ref(),
        deps.news_search.as_ref(),
        &identity.matched_vendor_name,
        facts.company_type.as_deref(),
    )
    .await?;

    Ok(ResearchRecord::assemble(identity, facts, news))
}

/// Research result as handed back to the client for review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchOutcome {
    pub research_data: ResearchRecord,
    pub cached: bool,
    pub updated_at: DateTime<Utc>,
}

/// Cache-aware research: serve a fresh cache entry unless forced, otherwise
/// run the pipeline and write the result back.
pub async fn research_vendor(
    deps: &ServerDeps,
    vendor_name: &str,
    force_regenerate: bool,
) -> Result<ResearchOutcome, ResearchError> {
    let now = Utc::now();

    if !force_regenerate {
        match get_cached_vendor(deps.store.as_ref(), vendor_name, now).await {
            Ok(Some(entry)) => {
                info!(vendor = %vendor_name, "Serving research from cache");
                let updated_at = entry.updated_at;
                return Ok(ResearchOutcome {
                    research_data: entry.into_record(),
                    cached: true,
                    updated_at,
                });
            }
            Ok(None) => {}
            Err(e) => warn!(vendor = %vendor_name, error = %e, "Cache lookup failed, researching"),
        }
    }

    let record = conduct_research(deps, vendor_name).await?;
    cache_vendor(deps.store.as_ref(), vendor_name, &record, now).await;

    Ok(ResearchOutcome {
        research_data: record,
        cached: false,
        updated_at: now,
    })
}
