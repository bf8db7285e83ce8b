//! Repository for the `users` table.

use sqlx::PgPool;
use qiita_core::types::DbId;

use crate::models::user::User;

/// Provides user lookups.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by email, resolving owned and shared study ids.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let Some((email, name, level)) = sqlx::query_as::<_, (String, Option<String>, String)>(
            "SELECT email, name, level FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?
        else {
            return Ok(None);
        };

        let private_studies: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM studies WHERE email = $1 ORDER BY id")
                .bind(&email)
                .fetch_all(pool)
                .await?;

        let shared_studies: Vec<DbId> = sqlx::query_scalar(
            "SELECT study_id FROM study_users WHERE email = $1 ORDER BY study_id",
        )
        .bind(&email)
        .fetch_all(pool)
        .await?;

        Ok(Some(User {
            email,
            name,
            level,
            private_studies,
            shared_studies,
        }))
    }

    /// List all user emails, ascending.
    pub async fn list_emails(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT email FROM users ORDER BY email")
            .fetch_all(pool)
            .await
    }
}
