//! Recent news with topical validation.
//!
//! The validator is fail-open: if the validation call itself breaks, the
//! fetched news is accepted. An explicit "not relevant" answer triggers one
//! retry with a more specific query, and a second rejection is final.

use serde::Deserialize;
use tracing::{info, warn};

use crate::common::extract_json_object;
use crate::domains::vendors::models::NewsItem;
use crate::domains::vendors::ResearchError;
use crate::kernel::{BaseAI, BaseSearchService, CompletionOptions, ModelTier, SearchHit, SearchOptions};

/// Reputable outlets news is restricted to.
pub const NEWS_DOMAINS: &[&str] = &[
    "reuters.com",
    "apnews.com",
    "techcrunch.com",
    "theregister.com",
    "zdnet.com",
    "venturebeat.com",
    "theverge.com",
];

const NEWS_WINDOW_DAYS: u32 = 120;
const MAX_NEWS_ITEMS: usize = 2;
const STAGE: &str = "news search";

#[derive(Debug, Deserialize)]
struct RelevanceAnswer {
    relevant: bool,
}

/// Outcome of asking the validator about a batch of titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relevance {
    Relevant,
    NotRelevant,
    /// The validator failed; treated as relevant
    Unknown,
}

fn news_options() -> SearchOptions {
    SearchOptions::builder()
        .result_count(MAX_NEWS_ITEMS)
        .recency_window_days(NEWS_WINDOW_DAYS)
        .domain_whitelist(NEWS_DOMAINS.iter().map(|d| d.to_string()).collect())
        .news_only(true)
        .build()
}

fn to_news_items(hits: Vec<SearchHit>) -> Vec<NewsItem> {
    hits.into_iter()
        .take(MAX_NEWS_ITEMS)
        .map(|hit| NewsItem {
            title: hit
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            url: hit.url,
        })
        .collect()
}

fn validation_prompt(vendor_name: &str, company_type: &str, news: &[NewsItem]) -> String {
    let titles = news
        .iter()
        .map(|n| format!("- {}", n.title))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"Are these news headlines about {name}, a {kind}, and not about a competitor or an unrelated company with a similar name? Answer strictly yes or no as a JSON object: {{"relevant": true}} or {{"relevant": false}}.

Headlines:
{titles}

Return ONLY the JSON object, no additional text."#,
        name = vendor_name,
        kind = company_type,
        titles = titles
    )
}

async fn validate(ai: &dyn BaseAI, vendor_name: &str, company_type: &str, news: &[NewsItem]) -> Relevance {
    let response = match ai
        .complete(
            &validation_prompt(vendor_name, company_type, news),
            CompletionOptions::new(ModelTier::Fast, 100, 0.0),
        )
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!(vendor = %vendor_name, error = %e, "News validator failed, accepting results");
            return Relevance::Unknown;
        }
    };

    match extract_json_object::<RelevanceAnswer>(&response) {
        Ok(RelevanceAnswer { relevant: true }) => Relevance::Relevant,
        Ok(RelevanceAnswer { relevant: false }) => Relevance::NotRelevant,
        Err(e) => {
            warn!(vendor = %vendor_name, error = %e, "News validator answer unreadable, accepting results");
            Relevance::Unknown
        }
    }
}

async fn search_news(
    search: &dyn BaseSearchService,
    query: &str,
) -> Result<Vec<NewsItem>, ResearchError> {
    let hits = search
        .search(query, &news_options())
        .await
        .map_err(|e| ResearchError::provider(STAGE, e))?;
    let news = to_news_items(hits);
    let sources: Vec<&str> = news.iter().map(|n| n.url.as_str()).collect();
    info!(query = %query, ?sources, "News sources");
    Ok(news)
}

/// Fetch up to two recent, topically-validated news items.
pub async fn fetch_news(
    ai: &dyn BaseAI,
    search: &dyn BaseSearchService,
    canonical_name: &str,
    company_type: Option<&str>,
) -> Result<Vec<NewsItem>, ResearchError> {
    let kind = company_type.unwrap_or("company");

    let news = search_news(search, &format!("{} recent news", canonical_name)).await?;
    if news.is_empty() {
        return Err(ResearchError::NewsNotFound {
            vendor: canonical_name.to_string(),
        });
    }

    if validate(ai, canonical_name, kind, &news).await != Relevance::NotRelevant {
        return Ok(news);
    }

    info!(vendor = %canonical_name, "News rejected as off-topic, retrying with company type");
    let retry = search_news(search, &format!("{} {} recent news", canonical_name, kind)).await?;
    if retry.is_empty() || validate(ai, canonical_name, kind, &retry).await == Relevance::NotRelevant {
        return Err(ResearchError::NoRelevantNews {
            vendor: canonical_name.to_string(),
        });
    }

    Ok(retry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{MockAI, MockSearchService};

    fn hit(title: &str, url: &str) -> SearchHit {
        SearchHit {
            url: url.to_string(),
            title: Some(title.to_string()),
            highlights: vec![],
        }
    }

    fn two_hits() -> Vec<SearchHit> {
        vec![
            hit("Okta posts record quarter", "https://www.reuters.com/a"),
            hit("Okta ships new identity features", "https://techcrunch.com/b"),
        ]
    }

    #[tokio::test]
    async fn relevant_news_is_returned_with_news_options() {
        let ai = MockAI::new().with_response(r#"{"relevant": true}"#);
        let search = MockSearchService::new().with_hits(two_hits());

        let news = fetch_news(&ai, &search, "Okta, Inc.", Some("Public (Nasdaq)"))
            .await
            .unwrap();

        assert_eq!(news.len(), 2);
        assert_eq!(news[0].title, "Okta posts record quarter");
        let options = &search.options()[0];
        assert_eq!(options.result_count, 2);
        assert_eq!(options.recency_window_days, Some(120));
        assert!(options.news_only);
        assert!(options.domain_whitelist.contains(&"reuters.com".to_string()));
        assert_eq!(search.queries()[0], "Okta, Inc. recent news");
    }

    #[tokio::test]
    async fn no_results_is_news_not_found_without_validation() {
        let ai = MockAI::new();
        let search = MockSearchService::new();

        let err = fetch_news(&ai, &search, "Okta, Inc.", None).await.unwrap_err();

        assert!(matches!(err, ResearchError::NewsNotFound { .. }));
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn validator_error_fails_open_with_original_list() {
        let ai = MockAI::new().with_error("validator timed out");
        let search = MockSearchService::new().with_hits(two_hits());

        let news = fetch_news(&ai, &search, "Okta, Inc.", Some("Public (Nasdaq)"))
            .await
            .unwrap();

        assert_eq!(news, to_news_items(two_hits()));
        assert_eq!(search.call_count(), 1);
    }

    #[tokio::test]
    async fn unreadable_validator_answer_fails_open() {
        let ai = MockAI::new().with_response("Yes, I think so.");
        let search = MockSearchService::new().with_hits(two_hits());

        let news = fetch_news(&ai, &search, "Okta, Inc.", None).await.unwrap();
        assert_eq!(news.len(), 2);
    }

    #[tokio::test]
    async fn rejection_retries_with_company_type() {
        let ai = MockAI::new()
            .with_response(r#"{"relevant": false}"#)
            .with_response(r#"{"relevant": true}"#);
        let search = MockSearchService::new()
            .with_hits(vec![hit("Octa Bank merger", "https://apnews.com/x")])
            .with_hits(vec![hit("Okta identity breach update", "https://theregister.com/y")]);

        let news = fetch_news(&ai, &search, "Okta, Inc.", Some("Public (Nasdaq)"))
            .await
            .unwrap();

        assert_eq!(news[0].title, "Okta identity breach update");
        assert_eq!(search.queries()[1], "Okta, Inc. Public (Nasdaq) recent news");
    }

    #[tokio::test]
    async fn second_rejection_is_no_relevant_news() {
        let ai = MockAI::new()
            .with_response(r#"{"relevant": false}"#)
            .with_response(r#"{"relevant": false}"#);
        let search = MockSearchService::new()
            .with_hits(vec![hit("Octa Bank merger", "https://apnews.com/x")])
            .with_hits(vec![hit("Octa Bank again", "https://apnews.com/z")]);

        let err = fetch_news(&ai, &search, "Okta, Inc.", Some("Public (Nasdaq)"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResearchError::NoRelevantNews { .. }));
    }

    #[tokio::test]
    async fn empty_retry_is_no_relevant_news() {
        let ai = MockAI::new().with_response(r#"{"relevant": false}"#);
        let search = MockSearchService::new().with_hits(vec![hit("Octa Bank", "https://apnews.com/x")]);

        let err = fetch_news(&ai, &search, "Okta, Inc.", None).await.unwrap_err();

        assert!(matches!(err, ResearchError::NoRelevantNews { .. }));
        assert_eq!(search.queries()[1], "Okta, Inc. company recent news");
        assert_eq!(ai.call_count(), 1);
    }

    #[test]
    fn missing_titles_become_untitled() {
        let items = to_news_items(vec![SearchHit {
            url: "https://zdnet.com/a".into(),
            title: None,
            highlights: vec![],
        }]);
        assert_eq!(items[0].title, "Untitled");
    }
}
