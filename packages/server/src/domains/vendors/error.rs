//! Typed failures of the research pipeline.
//!
//! Every provider error is normalized into one of these at the activity
//! boundary; raw provider detail is kept for logs only.

use thiserror::Error;

use crate::common::JsonExtractError;

#[derive(Debug, Error)]
pub enum ResearchError {
    /// Resolver confidence under the threshold. The user must fix the input.
    #[error("vendor '{input}' not recognized (confidence {confidence})")]
    UnrecognizedVendor { input: String, confidence: u8 },

    /// News search returned nothing at all.
    #[error("no news found for '{vendor}'")]
    NewsNotFound { vendor: String },

    /// News was found but the validator rejected it, even after the retry.
    #[error("no relevant news found for '{vendor}'")]
    NoRelevantNews { vendor: String },

    /// A model answered with something that is not the JSON we asked for.
    #[error("{stage}: malformed model output: {source}")]
    ExtractionParse {
        stage: &'static str,
        #[source]
        source: JsonExtractError,
    },

    /// Network, HTTP or timeout failure of an external provider.
    #[error("{stage}: provider unavailable: {detail}")]
    ProviderUnavailable { stage: &'static str, detail: String },
}

impl ResearchError {
    pub fn parse(stage: &'static str, source: JsonExtractError) -> Self {
        Self::ExtractionParse { stage, source }
    }

    pub fn provider(stage: &'static str, error: anyhow::Error) -> Self {
        Self::ProviderUnavailable {
            stage,
            detail: format!("{:#}", error),
        }
    }

    /// Message safe to show to the person who submitted the request.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnrecognizedVendor { .. } => {
                "Could not verify this vendor. Please check the spelling and try again.".to_string()
            }
            Self::NewsNotFound { vendor } => format!(
                "Company not found. No news could be found for '{}'. Please verify the company name and try again.",
                vendor
            ),
            Self::NoRelevantNews { vendor } => format!(
                "No recent news about '{}' could be verified. Please verify the company name and try again.",
                vendor
            ),
            Self::ExtractionParse { .. } | Self::ProviderUnavailable { .. } => {
                "The research service failed. Please try again later.".to_string()
            }
        }
    }
}
