//! Post-render persistence of generated profiles.
//!
//! Rules, in priority order, keyed on the trimmed case-insensitive vendor name:
//! 1. fresh research: delete every matching profile, then insert
//! 2. cached research with no matching profile: insert
//! 3. cached research with an existing profile: skip
//!
//! The existence check and the write are not atomic. Two concurrent
//! generates for the same vendor may both insert; dedup is best-effort.

use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::domains::vendors::models::{dedup_key, NewProfile, ResearchRecord};
use crate::kernel::BaseVendorStore;

/// Everything needed to persist one rendered profile.
#[derive(Debug, Clone)]
pub struct ProfileWrite {
    pub user_id: Uuid,
    pub client_name: String,
    pub vendor_name: String,
    /// Already carries `recent_news`
    pub research_data: ResearchRecord,
    pub cache_used: bool,
}

/// What the dedup engine did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    Replaced { removed: u64 },
    Inserted,
    Skipped,
}

pub async fn persist_profile(store: &dyn BaseVendorStore, write: ProfileWrite) -> Result<DedupOutcome> {
    let key = dedup_key(&write.vendor_name);

    let removed = if write.cache_used {
        if store.find_profile_by_dedup_key(&key).await?.is_some() {
            info!(vendor = %write.vendor_name, "Profile already stored for cached research, skipping");
            return Ok(DedupOutcome::Skipped);
        }
        None
    } else {
        Some(store.delete_profiles_by_dedup_key(&key).await?)
    };

    let profile = store
        .insert_profile(
            NewProfile::builder()
                .user_id(write.user_id)
                .client_name(write.client_name)
                .vendor_name(write.vendor_name)
                .research_data(write.research_data)
                .cache_used(write.cache_used)
                .build(),
        )
        .await?;

    let outcome = match removed {
        Some(removed) => DedupOutcome::Replaced { removed },
        None => DedupOutcome::Inserted,
    };
    info!(profile_id = %profile.id, vendor = %profile.vendor_name, ?outcome, "Profile persisted");
    Ok(outcome)
}

/// Persist on a detached task so the response is never held up.
/// Errors are logged and dropped.
pub fn spawn_persist_profile(store: Arc<dyn BaseVendorStore>, write: ProfileWrite) -> JoinHandle<()> {
    tokio::spawn(async move {
        let vendor = write.vendor_name.clone();
        if let Err(e) = persist_profile(store.as_ref(), write).await {
            error!(vendor = %vendor, error = %e, "Failed to persist profile");
        }
    })
}
