//! Ownership verification escalation.
//!
//! When the extractor is unsure whether a vendor is still publicly traded,
//! a narrower search for take-private / acquisition / delisting signals is
//! run and a binary Public/Private classification is requested. The result
//! only replaces the original when it is strictly more confident.

use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::extract_financials::compile_sources;
use crate::common::extract_json_object;
use crate::domains::vendors::models::{research::deserialize_confidence, FinancialFacts};
use crate::domains::vendors::ResearchError;
use crate::kernel::{BaseAI, BaseSearchService, CompletionOptions, ModelTier, SearchOptions};

/// Company-type confidence below this triggers escalation.
pub const ESCALATION_THRESHOLD: u8 = 80;

const STAGE: &str = "ownership verification";

/// The escalated classification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OwnershipVerdict {
    pub company_type: String,
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence: u8,
}

/// Escalation progress for one extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnershipEscalation {
    Initial(FinancialFacts),
    Escalating(FinancialFacts),
    Resolved(FinancialFacts),
}

impl OwnershipEscalation {
    pub fn new(facts: FinancialFacts) -> Self {
        Self::Initial(facts)
    }

    /// Decide whether the facts need a second opinion.
    pub fn advance(self) -> Self {
        match self {
            Self::Initial(facts) if facts.confidence.company_type < ESCALATION_THRESHOLD => {
                Self::Escalating(facts)
            }
            Self::Initial(facts) => Self::Resolved(facts),
            other => other,
        }
    }

    /// Fold the escalated verdict (if any) in and finish.
    pub fn resolve(self, verdict: Option<OwnershipVerdict>) -> Self {
        match self {
            Self::Escalating(facts) => Self::Resolved(match verdict {
                Some(v) => merge_ownership(facts, v),
                None => facts,
            }),
            initial @ Self::Initial(_) => initial.advance().resolve(verdict),
            resolved @ Self::Resolved(_) => resolved,
        }
    }

    pub fn is_escalating(&self) -> bool {
        matches!(self, Self::Escalating(_))
    }

    pub fn into_facts(self) -> FinancialFacts {
        match self {
            Self::Initial(f) | Self::Escalating(f) | Self::Resolved(f) => f,
        }
    }
}

/// Monotonic merge: adopt the verdict only if strictly more confident.
pub fn merge_ownership(mut facts: FinancialFacts, verdict: OwnershipVerdict) -> FinancialFacts {
    let original = facts.confidence.company_type;
    if verdict.confidence > original && !verdict.company_type.trim().is_empty() {
        info!(
            from = original,
            to = verdict.confidence,
            company_type = %verdict.company_type,
            "Ownership verification improved confidence"
        );
        facts.company_type = Some(verdict.company_type);
        facts.confidence.company_type = verdict.confidence;
    } else {
        info!(
            original,
            escalated = verdict.confidence,
            "Ownership verification did not improve confidence"
        );
    }
    facts
}

fn ownership_query(vendor_name: &str) -> String {
    let year = Utc::now().year();
    format!(
        "{} private equity acquired delisted going private current ownership {} {} {}",
        vendor_name,
        year - 2,
        year - 1,
        year
    )
}

fn verification_prompt(sources: &str) -> String {
    format!(
        r#"Based only on these sources, is this company currently publicly traded or privately held? Return only a JSON object: {{ "company_type": string, "confidence": integer }}. Use 'Public (Nasdaq)', 'Public (NYSE)', 'Public (OTC)', 'Private', or 'Subsidiary of [Parent Company]' for company_type. If any source mentions a going-private transaction, private equity acquisition, or delisting after 2019, classify as Private.

Sources:
{}

Return ONLY the JSON object, no additional text."#,
        sources
    )
}

/// Run the narrower ownership search and classification.
///
/// Search failures and empty results yield `Ok(None)` (keep the original);
/// a malformed classification is a hard failure.
pub async fn verify_ownership(
    ai: &dyn BaseAI,
    search: &dyn BaseSearchService,
    vendor_name: &str,
) -> Result<Option<OwnershipVerdict>, ResearchError> {
    let options = SearchOptions::builder()
        .result_count(3)
        .want_highlights(true)
        .build();

    let hits = match search.search(&ownership_query(vendor_name), &options).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(vendor = %vendor_name, error = %e, "Ownership search failed, keeping original");
            return Ok(None);
        }
    };

    if hits.is_empty() {
        info!(vendor = %vendor_name, "Ownership search returned nothing");
        return Ok(None);
    }

    let response = match ai
        .complete(
            &verification_prompt(&compile_sources(&hits)),
            CompletionOptions::new(ModelTier::Fast, 500, 0.1),
        )
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!(vendor = %vendor_name, error = %e, "Ownership classification call failed, keeping original");
            return Ok(None);
        }
    };

    let verdict = extract_json_object(&response).map_err(|e| ResearchError::parse(STAGE, e))?;
    Ok(Some(verdict))
}
