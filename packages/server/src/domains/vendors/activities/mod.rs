//! Vendor research activities.
//!
//! Each activity takes the injected dependencies it needs and returns a
//! typed `ResearchError`, so the pipeline is testable without any network.

pub mod conduct_research;
pub mod disclosure;
pub mod extract_financials;
pub mod fetch_news;
pub mod ownership;
pub mod persist_profile;
pub mod resolve_name;
pub mod vendor_cache;

pub use conduct_research::{conduct_research, research_vendor, ResearchOutcome};
pub use disclosure::apply_disclosure_ranges;
pub use extract_financials::extract_financials;
pub use fetch_news::{fetch_news, NEWS_DOMAINS};
pub use ownership::{merge_ownership, OwnershipEscalation, OwnershipVerdict};
pub use persist_profile::{persist_profile, spawn_persist_profile, DedupOutcome, ProfileWrite};
pub use resolve_name::resolve_vendor_name;
pub use vendor_cache::{cache_vendor, get_cached_vendor};
