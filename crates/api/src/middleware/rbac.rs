//! Level-gated extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use qiita_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] at the `admin` level.
///
/// Rejects with 403 during extraction, so the handler body (and any catalog
/// lookup in it) never runs for other users.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.requester().is_admin() {
            tracing::info!(user = %user.email, level = %user.level, "Admin access denied");
            return Err(CoreError::Forbidden(format!(
                "User {} does not have admin permissions",
                user.email
            ))
            .into());
        }
        Ok(RequireAdmin(user))
    }
}
