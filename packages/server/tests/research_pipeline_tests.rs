//! Research pipeline integration tests.
//!
//! Runs `conduct_research` / `research_vendor` over mocked providers to
//! check how the stages compose: ownership escalation feeding disclosure
//! ranges, and news retries feeding the final record.

mod common;

use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use common::*;
use vendor_core::domains::vendors::activities::{conduct_research, research_vendor};
use vendor_core::domains::vendors::ResearchError;
use vendor_core::kernel::test_dependencies::{MockAI, MockSearchService, TestDependencies};

fn uncertain_public_extraction() -> String {
    json!({
        "company_type": "Public (Nasdaq)",
        "estimated_annual_revenue": "$3.2 billion",
        "employees": "9,000 employees",
        "fiscal_year_end": "December 31",
        "stock_exchange": "Nasdaq",
        "competitors_core": ["VMware", "Microsoft"],
        "vendor_profile_paragraph": "Citrix provides virtualization and remote access software.",
        "confidence": {"company_type": 55, "estimated_annual_revenue": 70, "employees": 65, "fiscal_year_end": 80}
    })
    .to_string()
}

fn citrix_deps() -> TestDependencies {
    TestDependencies::new()
        .mock_ai(
            MockAI::new()
                .with_response(resolver_answer("Citrix Systems, Inc.", 92))
                .with_response(uncertain_public_extraction())
                .with_response(json!({"company_type": "Private", "confidence": 90}).to_string())
                .with_response(relevant(false))
                .with_response(relevant(true)),
        )
        .mock_financial_search(
            MockSearchService::new()
                .with_hits(vec![hit(
                    "https://www.sec.gov/citrix-10k",
                    "Citrix 10-K",
                    "Total revenue was $3.2 billion",
                )])
                .with_hits(vec![hit(
                    "https://www.reuters.com/citrix-take-private",
                    "Vista and Elliott complete Citrix buyout",
                    "Citrix was taken private in 2022",
                )]),
        )
        .mock_news_search(
            MockSearchService::new()
                .with_hits(vec![hit("https://www.theverge.com/citrus", "Citrus prices soar", "")])
                .with_hits(vec![hit(
                    "https://www.theregister.com/citrix-netscaler",
                    "Citrix patches NetScaler flaw",
                    "",
                )]),
        )
}

#[tokio::test]
async fn escalated_private_vendor_gets_ranges_and_retried_news() {
    let deps = citrix_deps();
    let server_deps = deps.clone().into_server_deps();

    let record = assert_ok!(conduct_research(&server_deps, "citrix").await);

    assert_eq!(record.matched_vendor_name, "Citrix Systems, Inc.");
    assert_eq!(record.financials.company_type.as_deref(), Some("Private"));
    assert_eq!(record.financials.confidence.company_type, 90);
    assert_eq!(
        record.financials.estimated_annual_revenue.as_deref(),
        Some("$2.2–4.2 billion")
    );
    assert_eq!(
        record.financials.employees.as_deref(),
        Some("~6,300–11,700 employees")
    );

    assert_eq!(record.recent_news.len(), 1);
    assert_eq!(record.recent_news[0].title, "Citrix patches NetScaler flaw");
    assert_eq!(
        deps.news_search.queries(),
        vec![
            "Citrix Systems, Inc. recent news".to_string(),
            "Citrix Systems, Inc. Private recent news".to_string(),
        ]
    );
    assert_eq!(deps.financial_search.call_count(), 2);
    assert_eq!(deps.ai.call_count(), 5);
}

#[tokio::test]
async fn less_confident_verdict_keeps_original_classification() {
    let deps = TestDependencies::new()
        .mock_ai(
            MockAI::new()
                .with_response(resolver_answer("Citrix Systems, Inc.", 92))
                .with_response(uncertain_public_extraction())
                .with_response(json!({"company_type": "Private", "confidence": 40}).to_string())
                .with_response(relevant(true)),
        )
        .mock_financial_search(
            MockSearchService::new()
                .with_hits(vec![hit("https://www.sec.gov/citrix", "Citrix 10-K", "revenue")])
                .with_hits(vec![hit("https://blog.example.com/citrix", "Rumor", "maybe private")]),
        )
        .mock_news_search(MockSearchService::new().with_hits(okta_news()));
    let server_deps = deps.clone().into_server_deps();

    let record = conduct_research(&server_deps, "citrix").await.unwrap();

    assert_eq!(record.financials.company_type.as_deref(), Some("Public (Nasdaq)"));
    assert_eq!(record.financials.confidence.company_type, 55);
    // Still public, so figures are left as extracted
    assert_eq!(record.financials.estimated_annual_revenue.as_deref(), Some("$3.2 billion"));
}

#[tokio::test]
async fn no_financial_results_still_produces_a_complete_record() {
    let deps = TestDependencies::new()
        .mock_ai(
            MockAI::new()
                .with_response(resolver_answer("Tiny Widgets LLC", 75))
                .with_response(relevant(true)),
        )
        .mock_news_search(MockSearchService::new().with_hits(vec![hit(
            "https://techcrunch.com/tiny-widgets",
            "Tiny Widgets raises seed round",
            "",
        )]));
    let server_deps = deps.clone().into_server_deps();

    let record = conduct_research(&server_deps, "tiny widgets").await.unwrap();

    assert!(record.financials.company_type.is_none());
    assert!(record.financials.competitors_core.is_empty());
    assert_eq!(record.financials.confidence.company_type, 0);
    assert_eq!(record.recent_news.len(), 1);
    assert_eq!(record.data_source, "exa");
    // Resolver and news validation only
    assert_eq!(deps.ai.call_count(), 2);
}

#[tokio::test]
async fn twice_rejected_news_fails_the_run_and_caches_nothing() {
    let deps = okta_research().mock_ai(
        MockAI::new()
            .with_response(resolver_answer("Okta, Inc.", 96))
            .with_response(public_extraction())
            .with_response(relevant(false))
            .with_response(relevant(false)),
    );
    let deps = deps.mock_news_search(
        MockSearchService::new()
            .with_hits(okta_news())
            .with_hits(okta_news()),
    );
    let server_deps = deps.clone().into_server_deps();

    let err = assert_err!(research_vendor(&server_deps, "okta", false).await);

    assert!(matches!(err, ResearchError::NoRelevantNews { .. }));
    assert_eq!(deps.store.cache_writes(), 0);
}

#[tokio::test]
async fn forced_regeneration_bypasses_a_fresh_entry() {
    let deps = okta_research();
    let server_deps = deps.clone().into_server_deps();
    research_vendor(&server_deps, "okta", false).await.unwrap();

    let deps = deps
        .mock_ai(
            MockAI::new()
                .with_response(resolver_answer("Okta, Inc.", 97))
                .with_response(public_extraction())
                .with_response(relevant(true)),
        )
        .mock_financial_search(MockSearchService::new().with_hits(vec![hit(
            "https://investor.okta.com/q1",
            "Okta Q1",
            "revenue",
        )]))
        .mock_news_search(MockSearchService::new().with_hits(okta_news()));
    let server_deps = deps.clone().into_server_deps();

    let outcome = research_vendor(&server_deps, "okta", true).await.unwrap();

    assert!(!outcome.cached);
    assert_eq!(outcome.research_data.confidence_score, 97);
    assert_eq!(deps.store.cache_writes(), 2);
}
