//! Vendor research domain.
//!
//! Name resolution, financial extraction with ownership escalation,
//! disclosure ranges, news, the vendor cache, and deduplicated profile
//! persistence.

pub mod activities;
pub mod error;
pub mod models;

pub use error::ResearchError;
