// Vendor Profile Research - API Core
//
// Resolves a vendor's identity, researches financial/ownership facts and
// recent news through external providers, and keeps a deduplicated history
// of generated due-diligence profiles.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
