//! In-memory vendor store for testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domains::vendors::models::{dedup_key, NewProfile, Profile, VendorCacheEntry};
use crate::kernel::BaseVendorStore;

/// In-memory cache entries and profiles.
///
/// Not suitable for production as data is lost on restart. Write counters
/// let tests assert on side effects.
pub struct MemoryStore {
    cache: RwLock<HashMap<String, VendorCacheEntry>>,
    profiles: RwLock<Vec<Profile>>,
    cache_writes: AtomicUsize,
    profile_inserts: AtomicUsize,
    fail_writes: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            profiles: RwLock::new(Vec::new()),
            cache_writes: AtomicUsize::new(0),
            profile_inserts: AtomicUsize::new(0),
            fail_writes: false,
        }
    }

    /// Every write fails, reads still work.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Number of successful cache upserts.
    pub fn cache_writes(&self) -> usize {
        self.cache_writes.load(Ordering::SeqCst)
    }

    /// Number of successful profile inserts.
    pub fn profile_inserts(&self) -> usize {
        self.profile_inserts.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("store is read-only");
        }
        Ok(())
    }
}

#[async_trait]
impl BaseVendorStore for MemoryStore {
    async fn find_cache_entry(&self, vendor_name: &str) -> Result<Option<VendorCacheEntry>> {
        Ok(self.cache.read().unwrap().get(vendor_name).cloned())
    }

    async fn upsert_cache_entry(&self, entry: &VendorCacheEntry) -> Result<()> {
        self.check_writable()?;
        self.cache
            .write()
            .unwrap()
            .insert(entry.vendor_name.clone(), entry.clone());
        self.cache_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_profile_by_dedup_key(&self, key: &str) -> Result<Option<Profile>> {
        let key = dedup_key(key);
        Ok(self
            .profiles
            .read()
            .unwrap()
            .iter()
            .find(|p| dedup_key(&p.vendor_name) == key)
            .cloned())
    }

    async fn delete_profiles_by_dedup_key(&self, key: &str) -> Result<u64> {
        self.check_writable()?;
        let key = dedup_key(key);
        let mut profiles = self.profiles.write().unwrap();
        let before = profiles.len();
        profiles.retain(|p| dedup_key(&p.vendor_name) != key);
        Ok((before - profiles.len()) as u64)
    }

    async fn insert_profile(&self, input: NewProfile) -> Result<Profile> {
        self.check_writable()?;
        let profile = Profile {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            client_name: input.client_name,
            vendor_name: input.vendor_name,
            research_data: Json(input.research_data),
            cache_used: input.cache_used,
            created_at: input.created_at,
        };
        self.profiles.write().unwrap().push(profile.clone());
        self.profile_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(profile)
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        Ok(self
            .profiles
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let mut profiles = self.profiles.read().unwrap().clone();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::vendors::models::{FinancialFacts, ResearchRecord, ResolvedIdentity};
    use chrono::{Duration, Utc};

    fn new_profile(vendor: &str, minutes_ago: i64) -> NewProfile {
        NewProfile::builder()
            .user_id(Uuid::new_v4())
            .client_name("Acme Health")
            .vendor_name(vendor)
            .research_data(ResearchRecord::assemble(
                ResolvedIdentity {
                    matched_vendor_name: vendor.into(),
                    confidence_score: 90,
                },
                FinancialFacts::unknown(),
                vec![],
            ))
            .cache_used(false)
            .created_at(Utc::now() - Duration::minutes(minutes_ago))
            .build()
    }

    #[tokio::test]
    async fn profiles_list_newest_first() {
        let store = MemoryStore::new();
        store.insert_profile(new_profile("Okta", 30)).await.unwrap();
        store.insert_profile(new_profile("Ping Identity", 5)).await.unwrap();
        store.insert_profile(new_profile("CyberArk", 60)).await.unwrap();

        let names: Vec<String> = store
            .list_profiles()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.vendor_name)
            .collect();
        assert_eq!(names, vec!["Ping Identity", "Okta", "CyberArk"]);
    }

    #[tokio::test]
    async fn dedup_lookup_ignores_case_and_whitespace() {
        let store = MemoryStore::new();
        store.insert_profile(new_profile(" Okta ", 1)).await.unwrap();

        assert!(store.find_profile_by_dedup_key("OKTA").await.unwrap().is_some());
        assert_eq!(store.delete_profiles_by_dedup_key("okta").await.unwrap(), 1);
        assert!(store.list_profiles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dedup_lookup_strips_tabs_like_postgres() {
        let store = MemoryStore::new();
        store.insert_profile(new_profile("Okta\t", 1)).await.unwrap();
        store.insert_profile(new_profile("Okta\u{a0}", 2)).await.unwrap();

        assert_eq!(store.delete_profiles_by_dedup_key("okta").await.unwrap(), 1);
        assert_eq!(store.list_profiles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn profile_lookup_by_id() {
        let store = MemoryStore::new();
        let created = store.insert_profile(new_profile("Okta", 1)).await.unwrap();

        let found = store.find_profile(created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert!(store.find_profile(Uuid::new_v4()).await.unwrap().is_none());
    }
}
