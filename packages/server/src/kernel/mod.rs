//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod exa_client;
pub mod renderer_client;
pub mod stores;
pub mod supabase_auth;
pub mod tavily_client;
pub mod test_dependencies;
pub mod traits;

pub use ai::ClaudeAI;
pub use deps::ServerDeps;
pub use exa_client::ExaClient;
pub use renderer_client::RendererClient;
pub use stores::{MemoryStore, PostgresStore};
pub use supabase_auth::SupabaseAuth;
pub use tavily_client::TavilyClient;
pub use test_dependencies::TestDependencies;
pub use traits::*;
