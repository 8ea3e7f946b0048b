//! Canned provider responses shared by the integration tests.

use serde_json::{json, Value};
use vendor_core::kernel::test_dependencies::{MockAI, MockSearchService, TestDependencies};
use vendor_core::kernel::SearchHit;

pub fn resolver_answer(name: &str, confidence: u8) -> String {
    json!({ "matched_vendor_name": name, "confidence_score": confidence }).to_string()
}

pub fn public_extraction() -> String {
    json!({
        "company_type": "Public (Nasdaq)",
        "estimated_annual_revenue": "$2.6 billion (FY 2025)",
        "employees": "5,900 employees",
        "fiscal_year_end": "January 31",
        "stock_exchange": "Nasdaq",
        "competitors_core": ["Microsoft Entra ID", "Ping Identity", "CyberArk", "OneLogin"],
        "vendor_profile_paragraph": "Okta provides identity and access management for enterprises.",
        "confidence": {"company_type": 95, "estimated_annual_revenue": 90, "employees": 85, "fiscal_year_end": 92}
    })
    .to_string()
}

pub fn relevant(answer: bool) -> String {
    json!({ "relevant": answer }).to_string()
}

pub fn hit(url: &str, title: &str, highlight: &str) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: Some(title.to_string()),
        highlights: vec![highlight.to_string()],
    }
}

pub fn okta_news() -> Vec<SearchHit> {
    vec![
        hit("https://www.reuters.com/okta-q3", "Okta beats quarterly estimates", ""),
        hit("https://techcrunch.com/okta-ai", "Okta launches AI agent identity", ""),
    ]
}

/// Mocks for one successful research run on Okta.
pub fn okta_research() -> TestDependencies {
    TestDependencies::new()
        .mock_ai(
            MockAI::new()
                .with_response(resolver_answer("Okta, Inc.", 96))
                .with_response(public_extraction())
                .with_response(relevant(true)),
        )
        .mock_financial_search(MockSearchService::new().with_hits(vec![hit(
            "https://investor.okta.com/fy2025",
            "Okta FY2025 results",
            "Total revenue of $2.6 billion for fiscal 2025",
        )]))
        .mock_news_search(MockSearchService::new().with_hits(okta_news()))
}

/// Research data as a client would post it back after review.
pub fn reviewed_research(with_news: Option<Value>) -> Value {
    let mut data = json!({
        "matched_vendor_name": "Okta, Inc.",
        "confidence_score": 96,
        "company_type": "Public (Nasdaq)",
        "estimated_annual_revenue": "$2.6 billion (FY 2025)",
        "employees": "5,900 employees",
        "fiscal_year_end": "January 31",
        "stock_exchange": "Nasdaq",
        "competitors_core": ["Ping Identity", "CyberArk"],
        "vendor_profile_paragraph": "Okta provides identity and access management.",
        "confidence": {"company_type": 95, "estimated_annual_revenue": 90, "employees": 85, "fiscal_year_end": 92},
        "data_source": "exa"
    });
    if let Some(news) = with_news {
        data["recent_news"] = news;
    }
    data
}

pub fn generate_body(vendor_name: &str, cache_used: bool, research_data: Value) -> Value {
    json!({
        "clientName": "Acme Health",
        "vendorName": vendor_name,
        "researchData": research_data,
        "cacheUsed": cache_used
    })
}
