// Supabase Auth implementation of BaseIdentityProvider
//
// Tokens are verified by asking the auth server who they belong to; we never
// decode JWTs locally. The service-role key is used for the admin user list.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{AuthenticatedUser, BaseIdentityProvider};

pub struct SupabaseAuth {
    base_url: String,
    service_role_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UserList {
    #[serde(default)]
    users: Vec<AuthenticatedUser>,
}

impl SupabaseAuth {
    pub fn new(base_url: impl Into<String>, service_role_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_role_key: service_role_key.into(),
            client,
        })
    }
}

#[async_trait]
impl BaseIdentityProvider for SupabaseAuth {
    async fn verify_token(&self, token: &str) -> Result<Option<AuthenticatedUser>> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.service_role_key)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to reach identity provider")?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!(status = %response.status(), "Token rejected");
                Ok(None)
            }
            status if status.is_success() => {
                let user = response
                    .json::<AuthenticatedUser>()
                    .await
                    .context("Failed to parse identity provider user")?;
                Ok(Some(user))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Identity provider error {}: {}", status, body);
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<AuthenticatedUser>> {
        let response = self
            .client
            .get(format!("{}/auth/v1/admin/users", self.base_url))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await
            .context("Failed to reach identity provider")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Identity provider error {}: {}", status, body);
        }

        let list: UserList = response
            .json()
            .await
            .context("Failed to parse identity provider user list")?;
        Ok(list.users)
    }
}
