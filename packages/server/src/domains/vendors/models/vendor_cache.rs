use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use super::research::{NewsItem, ResearchRecord};

/// How long a cached research record stays reusable.
pub const CACHE_FRESHNESS_DAYS: i64 = 7;

/// A cached research record, keyed by the vendor name exactly as submitted.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct VendorCacheEntry {
    pub vendor_name: String,
    pub research_data: Json<ResearchRecord>,
    pub news_results: Json<Vec<NewsItem>>,
    pub updated_at: DateTime<Utc>,
}

impl VendorCacheEntry {
    pub fn new(vendor_name: impl Into<String>, record: ResearchRecord, updated_at: DateTime<Utc>) -> Self {
        let news = record.recent_news.clone();
        Self {
            vendor_name: vendor_name.into(),
            research_data: Json(record),
            news_results: Json(news),
            updated_at,
        }
    }

    /// Valid iff `now - updated_at <= 7 days`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.updated_at) <= Duration::days(CACHE_FRESHNESS_DAYS)
    }

    /// The cached record with the separately-stored news merged back in.
    pub fn into_record(self) -> ResearchRecord {
        let Json(record) = self.research_data;
        let Json(news) = self.news_results;
        record.with_news(news)
    }

    pub async fn find_by_vendor_name(vendor_name: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT vendor_name, research_data, news_results, updated_at
             FROM vendor_cache WHERE vendor_name = $1",
        )
        .bind(vendor_name)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn upsert(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO vendor_cache (vendor_name, research_data, news_results, updated_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (vendor_name) DO UPDATE SET
                research_data = EXCLUDED.research_data,
                news_results = EXCLUDED.news_results,
                updated_at = EXCLUDED.updated_at",
        )
        .bind(&self.vendor_name)
        .bind(&self.research_data)
        .bind(&self.news_results)
        .bind(self.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::vendors::models::{FinancialFacts, ResolvedIdentity};

    fn entry_at(updated_at: DateTime<Utc>) -> VendorCacheEntry {
        let record = ResearchRecord::assemble(
            ResolvedIdentity {
                matched_vendor_name: "Acme Corporation".into(),
                confidence_score: 90,
            },
            FinancialFacts::unknown(),
            vec![],
        );
        VendorCacheEntry::new("Acme", record, updated_at)
    }

    #[test]
    fn freshness_window_is_inclusive_at_seven_days() {
        let now = Utc::now();
        assert!(entry_at(now - Duration::days(6)).is_fresh(now));
        assert!(entry_at(now - Duration::days(7)).is_fresh(now));
        assert!(!entry_at(now - Duration::days(7) - Duration::seconds(1)).is_fresh(now));
        assert!(!entry_at(now - Duration::days(8)).is_fresh(now));
    }

    #[test]
    fn news_column_is_merged_back_into_record() {
        let mut entry = entry_at(Utc::now());
        entry.news_results = Json(vec![NewsItem {
            title: "Acme expands".into(),
            url: "https://apnews.com/acme".into(),
        }]);
        let record = entry.into_record();
        assert_eq!(record.recent_news.len(), 1);
        assert_eq!(record.recent_news[0].title, "Acme expands");
    }
}
