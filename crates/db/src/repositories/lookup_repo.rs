//! Repository for the controlled-vocabulary lookup tables.

use sqlx::PgPool;

use crate::models::lookup::Lookup;

/// Reads `filepath_types`, `data_types` and `filetypes`.
pub struct LookupRepo;

impl LookupRepo {
    pub async fn filepath_types(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM filepath_types ORDER BY name")
            .fetch_all(pool)
            .await
    }

    pub async fn data_types(pool: &PgPool) -> Result<Vec<Lookup>, sqlx::Error> {
        sqlx::query_as::<_, Lookup>("SELECT id, name FROM data_types ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn filetypes(pool: &PgPool) -> Result<Vec<Lookup>, sqlx::Error> {
        sqlx::query_as::<_, Lookup>("SELECT id, name FROM filetypes ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
