//! PostgreSQL vendor store.
//!
//! Thin adapter over the model query methods so activities depend only on
//! `BaseVendorStore`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::vendors::models::{NewProfile, Profile, VendorCacheEntry};
use crate::kernel::BaseVendorStore;

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseVendorStore for PostgresStore {
    async fn find_cache_entry(&self, vendor_name: &str) -> Result<Option<VendorCacheEntry>> {
        VendorCacheEntry::find_by_vendor_name(vendor_name, &self.pool)
            .await
            .context("Failed to read vendor cache")
    }

    async fn upsert_cache_entry(&self, entry: &VendorCacheEntry) -> Result<()> {
        entry
            .upsert(&self.pool)
            .await
            .context("Failed to upsert vendor cache")
    }

    async fn find_profile_by_dedup_key(&self, dedup_key: &str) -> Result<Option<Profile>> {
        Profile::find_first_by_dedup_key(dedup_key, &self.pool)
            .await
            .context("Failed to look up existing profile")
    }

    async fn delete_profiles_by_dedup_key(&self, dedup_key: &str) -> Result<u64> {
        Profile::delete_by_dedup_key(dedup_key, &self.pool)
            .await
            .context("Failed to delete superseded profiles")
    }

    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile> {
        Profile::create(profile, &self.pool)
            .await
            .context("Failed to insert profile")
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        Profile::find_by_id(id, &self.pool)
            .await
            .context("Failed to load profile")
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        Profile::find_all_recent(&self.pool)
            .await
            .context("Failed to list profiles")
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}
