use axum::{extract::Extension, Json};

use crate::kernel::AuthenticatedUser;

/// Current user, as verified by the auth middleware.
pub async fn me_handler(Extension(user): Extension<AuthenticatedUser>) -> Json<AuthenticatedUser> {
    Json(user)
}
