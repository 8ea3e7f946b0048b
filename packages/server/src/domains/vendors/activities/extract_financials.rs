//! Financial fact extraction.
//!
//! Search for highlighted snippets about revenue/headcount/fiscal year,
//! have the model pull out structured fields with per-field confidence, then
//! escalate to an ownership check when the company type is uncertain.

use tracing::{debug, info};

use super::ownership::{verify_ownership, OwnershipEscalation};
use crate::common::extract_json_object;
use crate::domains::vendors::models::FinancialFacts;
use crate::domains::vendors::ResearchError;
use crate::kernel::{
    BaseAI, BaseSearchService, CompletionOptions, ModelTier, SearchHit, SearchOptions,
};

const STAGE: &str = "financial extraction";

fn financial_query(vendor_name: &str) -> String {
    format!("{} annual revenue employees fiscal year earnings", vendor_name)
}

fn highlights_query(vendor_name: &str) -> String {
    format!(
        "{} total annual revenue full year results reported actual not guidance not outlook not forecast",
        vendor_name
    )
}

/// Render hits as numbered source blocks for a prompt.
pub(crate) fn compile_sources(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("Source {} ({}):\n{}", i + 1, hit.url, hit.highlights.join("\n")))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

fn extraction_prompt(vendor_name: &str, sources: &str) -> String {
    format!(
        r#"Based on the following search result highlights about {name}, extract company information and return a JSON object with these exact fields:

- company_type (string): Return 'Private', 'Public (Nasdaq)', 'Public (NYSE)', 'Public (OTC)', or 'Subsidiary of [Parent Company]'. Pay close attention to any search results mentioning acquisitions, going-private transactions, delisting, or private equity ownership. If any source indicates the company was taken private, acquired, or delisted, set company_type to 'Private' or 'Subsidiary of [acquirer]' regardless of any historical Nasdaq/NYSE references. Do not rely solely on exchange listing pages; these may be outdated. Check the publication dates of your sources. If the most recent source confirming a public listing is more than 2 years old and no current source confirms active trading, set company_type to 'Private' and reduce the company_type confidence score below 60.
- estimated_annual_revenue (string): Total annual revenue from the most recent fiscal year (e.g. '$9.2 billion (FY 2025)'). For private companies, provide a specific figure like '$300 million' (ranges are calculated automatically). Only use figures explicitly labeled as reported actual results. Never use forward guidance, outlook ranges, or projected figures. If exact figures cannot be determined, provide a best estimate based on the available context.
- employees (string): Most recently reported headcount (e.g. '22,000 employees'). For private companies, provide a specific number (ranges are calculated automatically).
- fiscal_year_end (string): Month and day only (e.g. 'December 31')
- stock_exchange (string): Exchange name for public companies (e.g. 'Nasdaq', 'NYSE', 'OTC'), or null for private companies
- competitors_core (array): 4-6 direct competitors as strings
- vendor_profile_paragraph (string): Neutral 3-4 sentences describing what the company does and who it serves
- confidence (object): Per-field confidence scores (integers 0-100) with keys company_type, estimated_annual_revenue, employees, fiscal_year_end. Score each field independently based on source quality and recency. For company_type: 85-100 only if a source from the past 12 months confirms current active exchange listing; 50-70 if the most recent confirmation is 1-3 years old; below 50 if only historical sources are available or any source mentions a going-private transaction, acquisition, or delisting.

Search results:
{sources}

Return ONLY the JSON object, no additional text."#,
        name = vendor_name,
        sources = sources
    )
}

/// Blank strings from the model mean "unknown".
fn normalize(mut facts: FinancialFacts) -> FinancialFacts {
    for field in [
        &mut facts.company_type,
        &mut facts.estimated_annual_revenue,
        &mut facts.employees,
        &mut facts.fiscal_year_end,
        &mut facts.stock_exchange,
        &mut facts.vendor_profile_paragraph,
    ] {
        if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
            *field = None;
        }
    }
    facts.competitors_core.retain(|c| !c.trim().is_empty());
    facts
}

/// Extract financial facts for a canonical vendor name.
///
/// Zero search results is not an error: the facts come back all-null with
/// zero confidence. Malformed model output is.
pub async fn extract_financials(
    ai: &dyn BaseAI,
    search: &dyn BaseSearchService,
    canonical_name: &str,
) -> Result<FinancialFacts, ResearchError> {
    let options = SearchOptions::builder()
        .result_count(5)
        .want_highlights(true)
        .highlights_query(highlights_query(canonical_name))
        .build();

    let hits = search
        .search(&financial_query(canonical_name), &options)
        .await
        .map_err(|e| ResearchError::provider(STAGE, e))?;

    let sources: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
    info!(vendor = %canonical_name, ?sources, "Financial search sources");

    if hits.is_empty() {
        info!(vendor = %canonical_name, "No financial results found");
        return Ok(FinancialFacts::unknown());
    }

    let response = ai
        .complete(
            &extraction_prompt(canonical_name, &compile_sources(&hits)),
            CompletionOptions::new(ModelTier::Extraction, 2000, 0.1),
        )
        .await
        .map_err(|e| ResearchError::provider(STAGE, e))?;

    let facts = normalize(extract_json_object(&response).map_err(|e| ResearchError::parse(STAGE, e))?);
    debug!(vendor = %canonical_name, ?facts, "Extracted financial facts");

    let escalation = OwnershipEscalation::new(facts).advance();
    let resolved = if escalation.is_escalating() {
        info!(vendor = %canonical_name, "Low confidence on company_type, running ownership verification");
        let verdict = verify_ownership(ai, search, canonical_name).await?;
        escalation.resolve(verdict)
    } else {
        escalation
    };

    Ok(resolved.into_facts())
}
