use serde::{Deserialize, Deserializer, Serialize};

/// Resolver confidence below this is a terminal "unrecognized vendor".
pub const MIN_RESOLUTION_CONFIDENCE: u8 = 70;

/// Tag recorded on every research record produced by this pipeline.
pub const DATA_SOURCE_EXA: &str = "exa";

/// Canonical identity for a free-text vendor input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub matched_vendor_name: String,
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence_score: u8,
}

/// Per-field confidence (0-100) reported by the extraction model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfidence {
    #[serde(default, deserialize_with = "deserialize_confidence")]
    pub company_type: u8,
    #[serde(default, deserialize_with = "deserialize_confidence")]
    pub estimated_annual_revenue: u8,
    #[serde(default, deserialize_with = "deserialize_confidence")]
    pub employees: u8,
    #[serde(default, deserialize_with = "deserialize_confidence")]
    pub fiscal_year_end: u8,
}

/// Financial and operational facts about a vendor.
///
/// Every scalar is optional: "nothing found" is a valid state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialFacts {
    #[serde(default)]
    pub company_type: Option<String>,
    #[serde(default)]
    pub estimated_annual_revenue: Option<String>,
    #[serde(default)]
    pub employees: Option<String>,
    #[serde(default)]
    pub fiscal_year_end: Option<String>,
    #[serde(default)]
    pub stock_exchange: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub competitors_core: Vec<String>,
    #[serde(default)]
    pub vendor_profile_paragraph: Option<String>,
    #[serde(default)]
    pub confidence: FieldConfidence,
}

impl FinancialFacts {
    /// All-null facts with zero confidence, used when search finds nothing.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// True for `Private` and `Subsidiary of ...` company types.
    pub fn is_private_or_subsidiary(&self) -> bool {
        matches!(
            self.company_type.as_deref(),
            Some(t) if t == "Private" || t.starts_with("Subsidiary of")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
}

/// The unit cached, reviewed by a human, and rendered into a document.
///
/// Serializes flat (identity and facts at the top level) with every key
/// present, so consumers see a stable schema whichever stage came up empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRecord {
    pub matched_vendor_name: String,
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence_score: u8,
    #[serde(flatten)]
    pub financials: FinancialFacts,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub recent_news: Vec<NewsItem>,
    #[serde(default = "default_data_source")]
    pub data_source: String,
}

impl ResearchRecord {
    pub fn assemble(
        identity: ResolvedIdentity,
        financials: FinancialFacts,
        recent_news: Vec<NewsItem>,
    ) -> Self {
        Self {
            matched_vendor_name: identity.matched_vendor_name,
            confidence_score: identity.confidence_score,
            financials,
            recent_news,
            data_source: DATA_SOURCE_EXA.to_string(),
        }
    }

    /// Same record with `recent_news` replaced.
    pub fn with_news(mut self, recent_news: Vec<NewsItem>) -> Self {
        self.recent_news = recent_news;
        self
    }
}

fn default_data_source() -> String {
    DATA_SOURCE_EXA.to_string()
}

/// Accept any JSON number (or null) and clamp it into 0..=100.
pub(crate) fn deserialize_confidence<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|v| v.round().clamp(0.0, 100.0) as u8).unwrap_or(0))
}

fn deserialize_null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> ResearchRecord {
        ResearchRecord::assemble(
            ResolvedIdentity {
                matched_vendor_name: "Okta, Inc.".into(),
                confidence_score: 95,
            },
            FinancialFacts {
                company_type: Some("Public (Nasdaq)".into()),
                estimated_annual_revenue: Some("$2.6 billion (FY 2025)".into()),
                employees: Some("5,900 employees".into()),
                fiscal_year_end: Some("January 31".into()),
                stock_exchange: Some("Nasdaq".into()),
                competitors_core: vec!["Microsoft Entra".into(), "Ping Identity".into()],
                vendor_profile_paragraph: Some("Okta provides identity services.".into()),
                confidence: FieldConfidence {
                    company_type: 92,
                    estimated_annual_revenue: 88,
                    employees: 80,
                    fiscal_year_end: 90,
                },
            },
            vec![NewsItem {
                title: "Okta reports Q2".into(),
                url: "https://www.reuters.com/okta".into(),
            }],
        )
    }

    #[test]
    fn serialized_record_is_flat_and_complete() {
        let record = ResearchRecord::assemble(
            ResolvedIdentity {
                matched_vendor_name: "Tiny LLC".into(),
                confidence_score: 71,
            },
            FinancialFacts::unknown(),
            vec![],
        );
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "matched_vendor_name",
            "confidence_score",
            "company_type",
            "estimated_annual_revenue",
            "employees",
            "fiscal_year_end",
            "stock_exchange",
            "competitors_core",
            "vendor_profile_paragraph",
            "confidence",
            "recent_news",
            "data_source",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert!(obj["company_type"].is_null());
        assert_eq!(obj["competitors_core"], json!([]));
        assert_eq!(obj["data_source"], "exa");
    }

    #[test]
    fn record_survives_json_round_trip() {
        let record = sample_record();
        let text = serde_json::to_string(&record).unwrap();
        let back: ResearchRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn confidence_is_clamped_and_nulls_tolerated() {
        let conf: FieldConfidence = serde_json::from_value(json!({
            "company_type": 140,
            "estimated_annual_revenue": -5,
            "employees": null,
            "fiscal_year_end": 77.6
        }))
        .unwrap();
        assert_eq!(conf.company_type, 100);
        assert_eq!(conf.estimated_annual_revenue, 0);
        assert_eq!(conf.employees, 0);
        assert_eq!(conf.fiscal_year_end, 78);
    }

    #[test]
    fn private_and_subsidiary_detection() {
        let mut facts = FinancialFacts::unknown();
        assert!(!facts.is_private_or_subsidiary());

        facts.company_type = Some("Private".into());
        assert!(facts.is_private_or_subsidiary());

        facts.company_type = Some("Subsidiary of Thoma Bravo".into());
        assert!(facts.is_private_or_subsidiary());

        facts.company_type = Some("Public (NYSE)".into());
        assert!(!facts.is_private_or_subsidiary());
    }
}
