//! PostgreSQL-backed [`Catalog`].

use async_trait::async_trait;
use qiita_core::contact::NewContact;
use qiita_core::template::MetadataTable;
use qiita_core::types::DbId;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::models::lookup::Lookup;
use crate::models::preprocessed_data::PreprocessedData;
use crate::models::raw_data::RawData;
use crate::models::study::{CreateStudy, Study};
use crate::models::study_person::StudyPerson;
use crate::models::template::{CreatePrepTemplate, PrepTemplate, SampleTemplate};
use crate::models::user::User;
use crate::repositories::{
    LookupRepo, PrepTemplateRepo, PreprocessedDataRepo, ProcessingJobRepo, RawDataRepo,
    SampleTemplateRepo, StudyPersonRepo, StudyRepo, UserRepo,
};
use crate::DbPool;

/// [`Catalog`] over a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fail with `NotFound` unless the study exists.
    async fn require_study(&self, id: DbId) -> CatalogResult<Study> {
        StudyRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Study", id))
    }

    async fn require_user(&self, email: &str) -> CatalogResult<User> {
        UserRepo::find_by_email(&self.pool, email)
            .await?
            .ok_or_else(|| CatalogError::not_found("User", email))
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn health_check(&self) -> CatalogResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn study(&self, id: DbId) -> CatalogResult<Study> {
        self.require_study(id).await
    }

    async fn study_title_exists(&self, title: &str) -> CatalogResult<bool> {
        Ok(StudyRepo::title_exists(&self.pool, title).await?)
    }

    async fn public_study_ids(&self) -> CatalogResult<Vec<DbId>> {
        Ok(StudyRepo::public_ids(&self.pool).await?)
    }

    async fn create_study(&self, input: &CreateStudy) -> CatalogResult<Study> {
        let id = StudyRepo::create(&self.pool, input).await?;
        tracing::debug!(study_id = id, owner = %input.owner, "Study row inserted");
        self.require_study(id).await
    }

    async fn add_pmid(&self, study_id: DbId, pmid: &str) -> CatalogResult<()> {
        self.require_study(study_id).await?;
        Ok(StudyRepo::add_pmid(&self.pool, study_id, pmid).await?)
    }

    async fn share_study(&self, study_id: DbId, email: &str) -> CatalogResult<()> {
        self.require_user(email).await?;
        Ok(StudyRepo::share(&self.pool, study_id, email).await?)
    }

    async fn unshare_study(&self, study_id: DbId, email: &str) -> CatalogResult<()> {
        self.require_user(email).await?;
        Ok(StudyRepo::unshare(&self.pool, study_id, email).await?)
    }

    async fn user(&self, email: &str) -> CatalogResult<User> {
        self.require_user(email).await
    }

    async fn user_emails(&self) -> CatalogResult<Vec<String>> {
        Ok(UserRepo::list_emails(&self.pool).await?)
    }

    async fn study_person(&self, id: DbId) -> CatalogResult<StudyPerson> {
        StudyPersonRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CatalogError::not_found("StudyPerson", id))
    }

    async fn study_people(&self) -> CatalogResult<Vec<StudyPerson>> {
        Ok(StudyPersonRepo::list(&self.pool).await?)
    }

    async fn create_study_person(&self, input: &NewContact) -> CatalogResult<StudyPerson> {
        Ok(StudyPersonRepo::create(&self.pool, input).await?)
    }

    async fn raw_data(&self, id: DbId) -> CatalogResult<RawData> {
        RawDataRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CatalogError::not_found("RawData", id))
    }

    async fn create_raw_data(&self, filetype_id: DbId, study_ids: &[DbId]) -> CatalogResult<RawData> {
        let id = RawDataRepo::create(&self.pool, filetype_id, study_ids).await?;
        self.raw_data(id).await
    }

    async fn prep_template_exists(&self, id: DbId) -> CatalogResult<bool> {
        Ok(PrepTemplateRepo::exists(&self.pool, id).await?)
    }

    async fn prep_template(&self, id: DbId) -> CatalogResult<PrepTemplate> {
        PrepTemplateRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CatalogError::not_found("PrepTemplate", id))
    }

    async fn create_prep_template(&self, input: &CreatePrepTemplate) -> CatalogResult<PrepTemplate> {
        self.raw_data(input.raw_data_id).await?;
        Ok(PrepTemplateRepo::create(&self.pool, input).await?)
    }

    async fn delete_prep_template(&self, id: DbId) -> CatalogResult<()> {
        if !PrepTemplateRepo::delete(&self.pool, id).await? {
            return Err(CatalogError::not_found("PrepTemplate", id));
        }
        Ok(())
    }

    async fn sample_template_exists(&self, study_id: DbId) -> CatalogResult<bool> {
        Ok(SampleTemplateRepo::exists(&self.pool, study_id).await?)
    }

    async fn sample_template(&self, study_id: DbId) -> CatalogResult<SampleTemplate> {
        SampleTemplateRepo::find(&self.pool, study_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("SampleTemplate", study_id))
    }

    async fn create_sample_template(
        &self,
        study_id: DbId,
        table: &MetadataTable,
    ) -> CatalogResult<SampleTemplate> {
        Ok(SampleTemplateRepo::create(&self.pool, study_id, table).await?)
    }

    async fn delete_sample_template(&self, study_id: DbId) -> CatalogResult<()> {
        if !SampleTemplateRepo::delete(&self.pool, study_id).await? {
            return Err(CatalogError::not_found("SampleTemplate", study_id));
        }
        Ok(())
    }

    async fn replace_sample_template(
        &self,
        study_id: DbId,
        table: &MetadataTable,
    ) -> CatalogResult<SampleTemplate> {
        self.require_study(study_id).await?;
        let template = SampleTemplateRepo::replace(&self.pool, study_id, table).await?;
        tracing::debug!(study_id, samples = table.len(), "Sample template replaced");
        Ok(template)
    }

    async fn preprocessed_data(&self, id: DbId) -> CatalogResult<PreprocessedData> {
        PreprocessedDataRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CatalogError::not_found("PreprocessedData", id))
    }

    async fn filepath_types(&self) -> CatalogResult<Vec<String>> {
        Ok(LookupRepo::filepath_types(&self.pool).await?)
    }

    async fn data_types(&self) -> CatalogResult<Vec<Lookup>> {
        Ok(LookupRepo::data_types(&self.pool).await?)
    }

    async fn filetypes(&self) -> CatalogResult<Vec<Lookup>> {
        Ok(LookupRepo::filetypes(&self.pool).await?)
    }

    async fn processing_job_status(&self, job_id: &str) -> CatalogResult<String> {
        let id = Uuid::parse_str(job_id)
            .map_err(|_| CatalogError::not_found("ProcessingJob", job_id))?;
        ProcessingJobRepo::status(&self.pool, id)
            .await?
            .ok_or_else(|| CatalogError::not_found("ProcessingJob", job_id))
    }
}
