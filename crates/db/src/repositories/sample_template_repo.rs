//! Repository for the `sample_templates` table.

use sqlx::types::Json;
use sqlx::PgPool;
use qiita_core::template::MetadataTable;
use qiita_core::types::DbId;

use crate::models::template::SampleTemplate;

/// Provides CRUD operations for sample templates (one per study).
pub struct SampleTemplateRepo;

impl SampleTemplateRepo {
    pub async fn exists(pool: &PgPool, study_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM sample_templates WHERE study_id = $1)")
            .bind(study_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find(pool: &PgPool, study_id: DbId) -> Result<Option<SampleTemplate>, sqlx::Error> {
        let content = sqlx::query_scalar::<_, Json<MetadataTable>>(
            "SELECT content FROM sample_templates WHERE study_id = $1",
        )
        .bind(study_id)
        .fetch_optional(pool)
        .await?;

        Ok(content.map(|Json(table)| SampleTemplate { study_id, table }))
    }

    /// Insert the sample template of a study. Fails with a unique violation
    /// if the study already has one.
    pub async fn create(
        pool: &PgPool,
        study_id: DbId,
        table: &MetadataTable,
    ) -> Result<SampleTemplate, sqlx::Error> {
        sqlx::query("INSERT INTO sample_templates (study_id, content) VALUES ($1, $2)")
            .bind(study_id)
            .bind(Json(table))
            .execute(pool)
            .await?;

        Ok(SampleTemplate {
            study_id,
            table: table.clone(),
        })
    }

    /// Replace the study's metadata in one transaction: drop the prep
    /// templates of its raw data and its sample template, then insert
    /// `table`.
    pub async fn replace(
        pool: &PgPool,
        study_id: DbId,
        table: &MetadataTable,
    ) -> Result<SampleTemplate, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM prep_templates WHERE raw_data_id IN \
             (SELECT raw_data_id FROM study_raw_data WHERE study_id = $1)",
        )
        .bind(study_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sample_templates WHERE study_id = $1")
            .bind(study_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO sample_templates (study_id, content) VALUES ($1, $2)")
            .bind(study_id)
            .bind(Json(table))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(SampleTemplate {
            study_id,
            table: table.clone(),
        })
    }

    /// Delete a study's sample template. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, study_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sample_templates WHERE study_id = $1")
            .bind(study_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
