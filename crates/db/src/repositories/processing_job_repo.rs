//! Repository for the `processing_jobs` table.

use sqlx::PgPool;
use uuid::Uuid;

/// Reads processing job state written by the compute service.
pub struct ProcessingJobRepo;

impl ProcessingJobRepo {
    /// Current status of a job, or `None` if the id is unknown.
    pub async fn status(pool: &PgPool, id: Uuid) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM processing_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
