//! Confidence-gated vendor name resolution.
//!
//! This runs before any search call. Every later call is metered, so a
//! vendor the model cannot identify is rejected here.

use tracing::{info, warn};

use crate::common::extract_json_object;
use crate::domains::vendors::models::{ResolvedIdentity, MIN_RESOLUTION_CONFIDENCE};
use crate::domains::vendors::ResearchError;
use crate::kernel::{BaseAI, CompletionOptions, ModelTier};

const STAGE: &str = "name resolution";

fn resolution_prompt(user_input: &str) -> String {
    format!(
        r#"Given this user input, identify the official full legal company name. The input may contain typos, abbreviations, or informal names. Return a JSON object with two fields only: matched_vendor_name (the official company name as it would appear in legal filings) and confidence_score (integer 0-100 reflecting how confident you are this is a real, identifiable company). If you cannot identify a real company from this input, return confidence_score below 70.

User input: "{}"

Return ONLY the JSON object, no additional text."#,
        user_input
    )
}

/// Map free-text vendor input to a canonical identity.
///
/// Fails with `UnrecognizedVendor` when confidence is under 70.
pub async fn resolve_vendor_name(
    ai: &dyn BaseAI,
    raw_input: &str,
) -> Result<ResolvedIdentity, ResearchError> {
    let response = ai
        .complete(
            &resolution_prompt(raw_input),
            CompletionOptions::new(ModelTier::Fast, 500, 0.1),
        )
        .await
        .map_err(|e| ResearchError::provider(STAGE, e))?;

    let identity: ResolvedIdentity =
        extract_json_object(&response).map_err(|e| ResearchError::parse(STAGE, e))?;

    if identity.matched_vendor_name.trim().is_empty() {
        return Err(ResearchError::parse(
            STAGE,
            crate::common::JsonExtractError::NoJsonObject,
        ));
    }

    if identity.confidence_score < MIN_RESOLUTION_CONFIDENCE {
        warn!(
            input = %raw_input,
            confidence = identity.confidence_score,
            "Vendor rejected before research"
        );
        return Err(ResearchError::UnrecognizedVendor {
            input: raw_input.to_string(),
            confidence: identity.confidence_score,
        });
    }

    info!(
        input = %raw_input,
        matched = %identity.matched_vendor_name,
        confidence = identity.confidence_score,
        "Vendor name resolved"
    );

    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockAI;

    #[tokio::test]
    async fn confident_match_is_returned() {
        let ai = MockAI::new()
            .with_response(r#"{"matched_vendor_name": "Salesforce, Inc.", "confidence_score": 96}"#);

        let identity = resolve_vendor_name(&ai, "salesforce").await.unwrap();

        assert_eq!(identity.matched_vendor_name, "Salesforce, Inc.");
        assert_eq!(identity.confidence_score, 96);
        assert!(ai.was_called_with("User input: \"salesforce\""));
        assert_eq!(ai.options()[0].temperature, 0.1);
    }

    #[tokio::test]
    async fn exactly_seventy_passes() {
        let ai = MockAI::new().with_json_response(&ResolvedIdentity {
            matched_vendor_name: "Borderline Co".into(),
            confidence_score: 70,
        });
        assert!(resolve_vendor_name(&ai, "borderline").await.is_ok());
    }

    #[tokio::test]
    async fn low_confidence_is_unrecognized() {
        let ai = MockAI::new()
            .with_response(r#"{"matched_vendor_name": "Unknown", "confidence_score": 35}"#);

        let err = resolve_vendor_name(&ai, "asdfgh corp").await.unwrap_err();

        assert!(matches!(
            err,
            ResearchError::UnrecognizedVendor { confidence: 35, .. }
        ));
    }

    #[tokio::test]
    async fn prose_answer_is_a_parse_failure() {
        let ai = MockAI::new().with_response("I'm not sure which company you mean.");
        let err = resolve_vendor_name(&ai, "??").await.unwrap_err();
        assert!(matches!(err, ResearchError::ExtractionParse { .. }));
    }

    #[tokio::test]
    async fn provider_error_is_normalized() {
        let ai = MockAI::new().with_error("connection reset");
        let err = resolve_vendor_name(&ai, "acme").await.unwrap_err();
        assert!(matches!(err, ResearchError::ProviderUnavailable { .. }));
    }
}
