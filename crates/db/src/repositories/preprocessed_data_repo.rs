//! Repository for the `preprocessed_data` and `preprocessed_filepaths` tables.

use sqlx::PgPool;
use qiita_core::types::DbId;

use crate::models::preprocessed_data::{Filepath, PreprocessedData};

/// Provides preprocessed data lookups.
pub struct PreprocessedDataRepo;

impl PreprocessedDataRepo {
    /// Find preprocessed data by id together with its filepaths.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PreprocessedData>, sqlx::Error> {
        let Some(study_id) =
            sqlx::query_scalar::<_, DbId>("SELECT study_id FROM preprocessed_data WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        else {
            return Ok(None);
        };

        let filepaths = sqlx::query_as::<_, Filepath>(
            "SELECT pf.filepath, ft.name AS filepath_type
             FROM preprocessed_filepaths pf
             JOIN filepath_types ft ON ft.id = pf.filepath_type_id
             WHERE pf.preprocessed_data_id = $1
             ORDER BY pf.filepath",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(PreprocessedData {
            id,
            study_id,
            filepaths,
        }))
    }
}
