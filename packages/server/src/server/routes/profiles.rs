use std::collections::HashMap;

use axum::{extract::Extension, Json};
use serde::Serialize;
use tracing::warn;

use crate::domains::vendors::models::Profile;
use crate::server::app::AppState;
use crate::server::error::ApiError;

const UNKNOWN_EMAIL: &str = "Unknown";

/// History row: the stored profile plus who generated it.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub user_email: String,
}

/// Generated-profile history, newest first.
///
/// Emails come from the identity provider's user list. If that list is
/// unavailable every row reads `Unknown` rather than failing the request.
pub async fn list_profiles_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<ProfileView>>, ApiError> {
    let profiles = state.deps.store.list_profiles().await?;

    let emails: HashMap<_, _> = match state.deps.identity.list_users().await {
        Ok(users) => users
            .into_iter()
            .filter_map(|u| u.email.map(|email| (u.id, email)))
            .collect(),
        Err(e) => {
            warn!(error = %e, "Could not list users, history emails will read Unknown");
            HashMap::new()
        }
    };

    let views = profiles
        .into_iter()
        .map(|profile| ProfileView {
            user_email: emails
                .get(&profile.user_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_EMAIL.to_string()),
            profile,
        })
        .collect();

    Ok(Json(views))
}
