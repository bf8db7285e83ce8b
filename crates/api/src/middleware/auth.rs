use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use qiita_core::access::Requester;
use qiita_core::error::CoreError;

use crate::auth::jwt::verify_session_token;
use crate::error::AppError;
use crate::state::AppState;

/// The portal user a request is made on behalf of, taken from the session
/// token in the `Authorization: Bearer` header.
///
/// The user is not looked up in the catalog; handlers that need the stored
/// user record fetch it themselves.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub level: String,
}

impl AuthUser {
    /// Borrow this user for the access predicates in `qiita_core::access`.
    pub fn requester(&self) -> Requester<'_> {
        Requester::new(&self.email, &self.level)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, CoreError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| CoreError::Unauthorized("Malformed Authorization header".into()))?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        CoreError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = verify_session_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            CoreError::Unauthorized("Invalid or expired session".into())
        })?;

        Ok(AuthUser {
            email: claims.sub,
            level: claims.level,
        })
    }
}
