//! Repository for the `prep_templates` table.

use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use qiita_core::template::MetadataTable;
use qiita_core::types::DbId;

use crate::models::template::{CreatePrepTemplate, PrepTemplate};

const COLUMNS: &str = "id, raw_data_id, study_id, data_type_id, content";

#[derive(FromRow)]
struct PrepTemplateRow {
    id: DbId,
    raw_data_id: DbId,
    study_id: DbId,
    data_type_id: DbId,
    content: Json<MetadataTable>,
}

impl From<PrepTemplateRow> for PrepTemplate {
    fn from(row: PrepTemplateRow) -> Self {
        PrepTemplate {
            id: row.id,
            raw_data_id: row.raw_data_id,
            study_id: row.study_id,
            data_type_id: row.data_type_id,
            table: row.content.0,
        }
    }
}

/// Provides CRUD operations for prep templates.
pub struct PrepTemplateRepo;

impl PrepTemplateRepo {
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM prep_templates WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PrepTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prep_templates WHERE id = $1");
        let row = sqlx::query_as::<_, PrepTemplateRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(PrepTemplate::from))
    }

    /// Insert a new prep template, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePrepTemplate,
    ) -> Result<PrepTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO prep_templates (raw_data_id, study_id, data_type_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PrepTemplateRow>(&query)
            .bind(input.raw_data_id)
            .bind(input.study_id)
            .bind(input.data_type_id)
            .bind(Json(&input.table))
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Delete a prep template. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prep_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
