//! Repository for the `raw_data` and `study_raw_data` tables.

use sqlx::PgPool;
use qiita_core::types::DbId;

use crate::models::raw_data::RawData;

/// Provides raw data lookups and creation.
pub struct RawDataRepo;

impl RawDataRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RawData>, sqlx::Error> {
        let Some(filetype_id) =
            sqlx::query_scalar::<_, DbId>("SELECT filetype_id FROM raw_data WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        else {
            return Ok(None);
        };

        let prep_template_ids: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM prep_templates WHERE raw_data_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let study_ids: Vec<DbId> = sqlx::query_scalar(
            "SELECT study_id FROM study_raw_data WHERE raw_data_id = $1
             ORDER BY linked_at, study_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(RawData {
            id,
            filetype_id,
            prep_template_ids,
            study_ids,
        }))
    }

    /// Insert a raw data object linked to `study_ids` in one transaction.
    pub async fn create(
        pool: &PgPool,
        filetype_id: DbId,
        study_ids: &[DbId],
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId =
            sqlx::query_scalar("INSERT INTO raw_data (filetype_id) VALUES ($1) RETURNING id")
                .bind(filetype_id)
                .fetch_one(&mut *tx)
                .await?;

        for study_id in study_ids {
            sqlx::query("INSERT INTO study_raw_data (study_id, raw_data_id) VALUES ($1, $2)")
                .bind(study_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(id)
    }
}
