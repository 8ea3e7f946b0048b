use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Default models: a cheap model for name resolution and validation, a newer
/// one for the heavier financial extraction.
pub const DEFAULT_RESOLVER_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_EXTRACTION_MODEL: &str = "claude-haiku-4-5-20251001";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub claude_api_key: String,
    pub exa_api_key: String,
    pub tavily_api_key: String,
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    pub renderer_url: String,
    pub allowed_origins: Vec<String>,
    pub resolver_model: String,
    pub extraction_model: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            claude_api_key: env::var("CLAUDE_API_KEY").context("CLAUDE_API_KEY must be set")?,
            exa_api_key: env::var("EXA_API_KEY").context("EXA_API_KEY must be set")?,
            tavily_api_key: env::var("TAVILY_API_KEY").context(
                "TAVILY_API_KEY must be set (news search is not configured without it)",
            )?,
            supabase_url: env::var("SUPABASE_URL").context("SUPABASE_URL must be set")?,
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .context("SUPABASE_SERVICE_ROLE_KEY must be set")?,
            renderer_url: env::var("RENDERER_URL")
                .or_else(|_| env::var("PYTHON_SERVICE_URL"))
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            allowed_origins: parse_origins(env::var("ALLOWED_ORIGINS").ok().as_deref()),
            resolver_model: env::var("RESOLVER_MODEL")
                .unwrap_or_else(|_| DEFAULT_RESOLVER_MODEL.to_string()),
            extraction_model: env::var("EXTRACTION_MODEL")
                .unwrap_or_else(|_| DEFAULT_EXTRACTION_MODEL.to_string()),
        })
    }
}

/// Comma-separated origin list. Empty means "allow any".
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
