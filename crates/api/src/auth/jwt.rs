//! Bearer session tokens.
//!
//! The login service signs one HS256 token per session naming the user by
//! email together with their access level. This server only verifies them;
//! [`issue_session_token`] exists for local tooling and the test suite.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The user's email.
    pub sub: String,
    /// The user's access level, one of `qiita_core::levels`.
    pub level: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret shared with the login service.
    pub secret: String,
    /// Required `iss` claim, when set.
    pub issuer: Option<String>,
    /// Lifetime of tokens minted by [`issue_session_token`].
    pub session_ttl_mins: i64,
}

const DEFAULT_SESSION_TTL_MINS: i64 = 60;

impl JwtConfig {
    /// | Env Var                | Required | Default |
    /// |------------------------|----------|---------|
    /// | `JWT_SECRET`           | **yes**  | --      |
    /// | `JWT_ISSUER`           | no       | unset   |
    /// | `JWT_SESSION_TTL_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty());

        let session_ttl_mins: i64 = std::env::var("JWT_SESSION_TTL_MINS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_MINS.to_string())
            .parse()
            .expect("JWT_SESSION_TTL_MINS must be a valid i64");

        Self {
            secret,
            issuer,
            session_ttl_mins,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.issuer {
            validation.set_required_spec_claims(&["exp", "sub", "iss"]);
            validation.set_issuer(&[issuer]);
        } else {
            validation.set_required_spec_claims(&["exp", "sub"]);
        }
        validation
    }
}

/// Mint a session token for `email`.
pub fn issue_session_token(
    email: &str,
    level: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: email.to_string(),
        level: level.to_string(),
        iat,
        exp: iat + config.session_ttl_mins * 60,
        iss: config.issuer.clone(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check the signature, expiry and issuer of `token`.
pub fn verify_session_token(
    token: &str,
    config: &JwtConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )
    .map(|data| data.claims)
}
