//! Repository for the `studies` table and its link tables
//! (`study_users`, `study_pmids`, `study_raw_data`, `preprocessed_data`).

use sqlx::PgPool;
use qiita_core::study::StudyStatus;
use qiita_core::types::DbId;

use crate::models::study::{CreateStudy, Study, StudyRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, email, status, principal_investigator_id, lab_person_id, \
     metadata_complete, number_samples_collected, mixs_compliant, timeseries_type_id, \
     portal_type_id, study_alias, study_abstract, study_description, efo, created_at";

/// Provides study lookups and mutators.
pub struct StudyRepo;

impl StudyRepo {
    /// Find a study by id and resolve its link tables. Returns `None` if unknown.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Study>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM studies WHERE id = $1");
        let Some(row) = sqlx::query_as::<_, StudyRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let status: StudyStatus = row
            .status
            .parse()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Some(Study {
            id: row.id,
            title: row.title.clone(),
            owner: row.email.clone(),
            status,
            info: row.info(),
            efo: row.efo.clone(),
            shared_with: Self::shared_with(pool, id).await?,
            pmids: Self::pmids(pool, id).await?,
            raw_data_ids: Self::raw_data_ids(pool, id).await?,
            preprocessed_data_ids: Self::preprocessed_data_ids(pool, id).await?,
            created_at: row.created_at,
        }))
    }

    pub async fn shared_with(pool: &PgPool, id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT email FROM study_users WHERE study_id = $1 ORDER BY email")
            .bind(id)
            .fetch_all(pool)
            .await
    }

    pub async fn pmids(pool: &PgPool, id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT pmid FROM study_pmids WHERE study_id = $1 ORDER BY pmid")
            .bind(id)
            .fetch_all(pool)
            .await
    }

    pub async fn raw_data_ids(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT raw_data_id FROM study_raw_data WHERE study_id = $1 ORDER BY raw_data_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    pub async fn preprocessed_data_ids(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM preprocessed_data WHERE study_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(pool)
            .await
    }

    pub async fn title_exists(pool: &PgPool, title: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM studies WHERE title = $1)")
            .bind(title)
            .fetch_one(pool)
            .await
    }

    pub async fn public_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM studies WHERE status = 'public' ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Insert a new study, returning its id.
    pub async fn create(pool: &PgPool, input: &CreateStudy) -> Result<DbId, sqlx::Error> {
        let info = &input.info;
        sqlx::query_scalar(
            "INSERT INTO studies (title, email, principal_investigator_id, lab_person_id,
                 metadata_complete, number_samples_collected, mixs_compliant,
                 timeseries_type_id, portal_type_id, study_alias, study_abstract,
                 study_description, efo)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.owner)
        .bind(info.principal_investigator_id)
        .bind(info.lab_person_id)
        .bind(info.metadata_complete)
        .bind(info.number_samples_collected)
        .bind(info.mixs_compliant)
        .bind(info.timeseries_type_id)
        .bind(info.portal_type_id)
        .bind(&info.study_alias)
        .bind(&info.study_abstract)
        .bind(&info.study_description)
        .bind(&input.efo)
        .fetch_one(pool)
        .await
    }

    pub async fn add_pmid(pool: &PgPool, id: DbId, pmid: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO study_pmids (study_id, pmid) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(pmid)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn share(pool: &PgPool, id: DbId, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO study_users (study_id, email) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(email)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn unshare(pool: &PgPool, id: DbId, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM study_users WHERE study_id = $1 AND email = $2")
            .bind(id)
            .bind(email)
            .execute(pool)
            .await?;
        Ok(())
    }
}
