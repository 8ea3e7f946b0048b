use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use super::research::ResearchRecord;

/// A generated profile kept in the history.
///
/// Never updated in place: superseded rows are deleted and replaced.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_name: String,
    pub vendor_name: String,
    pub research_data: Json<ResearchRecord>,
    pub cache_used: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a profile row.
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewProfile {
    pub user_id: Uuid,
    #[builder(setter(into))]
    pub client_name: String,
    #[builder(setter(into))]
    pub vendor_name: String,
    /// Must already carry `recent_news`
    pub research_data: ResearchRecord,
    pub cache_used: bool,
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

/// Characters stripped from both ends of a vendor name before comparing.
/// Must match `DEDUP_KEY_SQL` and the `idx_profiles_dedup_key` index.
pub const DEDUP_TRIM_CHARS: [char; 4] = [' ', '\t', '\r', '\n'];

/// SQL form of `dedup_key` over the stored column.
const DEDUP_KEY_SQL: &str = r"LOWER(BTRIM(vendor_name, E' \t\r\n'))";

/// Dedup key: trimmed vendor name, compared case-insensitively.
pub fn dedup_key(vendor_name: &str) -> String {
    vendor_name.trim_matches(DEDUP_TRIM_CHARS).to_lowercase()
}

impl Profile {
    pub async fn create(input: NewProfile, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO profiles (id, user_id, client_name, vendor_name, research_data, cache_used, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(input.client_name)
        .bind(input.vendor_name)
        .bind(Json(input.research_data))
        .bind(input.cache_used)
        .bind(input.created_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_first_by_dedup_key(key: &str, pool: &PgPool) -> Result<Option<Self>> {
        let sql = format!("SELECT * FROM profiles WHERE {} = $1 LIMIT 1", DEDUP_KEY_SQL);
        sqlx::query_as::<_, Self>(&sql)
            .bind(dedup_key(key))
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn delete_by_dedup_key(key: &str, pool: &PgPool) -> Result<u64> {
        let sql = format!("DELETE FROM profiles WHERE {} = $1", DEDUP_KEY_SQL);
        let result = sqlx::query(&sql)
            .bind(dedup_key(key))
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_all_recent(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
