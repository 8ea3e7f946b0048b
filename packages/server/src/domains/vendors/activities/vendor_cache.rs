//! Cache reads and writes for research records.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domains::vendors::models::{ResearchRecord, VendorCacheEntry};
use crate::kernel::BaseVendorStore;

/// Look up a fresh cache entry for the vendor name exactly as submitted.
///
/// Stale rows read as a miss and are left in place for the next upsert.
pub async fn get_cached_vendor(
    store: &dyn BaseVendorStore,
    vendor_name: &str,
    now: DateTime<Utc>,
) -> Result<Option<VendorCacheEntry>> {
    let Some(entry) = store.find_cache_entry(vendor_name).await? else {
        debug!(vendor = %vendor_name, "Cache miss");
        return Ok(None);
    };

    if !entry.is_fresh(now) {
        debug!(vendor = %vendor_name, updated_at = %entry.updated_at, "Cache entry stale");
        return Ok(None);
    }

    debug!(vendor = %vendor_name, updated_at = %entry.updated_at, "Cache hit");
    Ok(Some(entry))
}

/// Upsert a freshly researched record. Failures are logged, never raised.
pub async fn cache_vendor(
    store: &dyn BaseVendorStore,
    vendor_name: &str,
    record: &ResearchRecord,
    now: DateTime<Utc>,
) -> Option<VendorCacheEntry> {
    let entry = VendorCacheEntry::new(vendor_name, record.clone(), now);
    match store.upsert_cache_entry(&entry).await {
        Ok(()) => Some(entry),
        Err(e) => {
            warn!(vendor = %vendor_name, error = %e, "Failed to write vendor cache");
            None
        }
    }
}
