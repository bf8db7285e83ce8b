//! The data-access interface consumed by the portal.
//!
//! Every entity is fetched fresh per request. Lookups of unknown ids fail
//! with [`CatalogError::NotFound`]; mutators are transactional on the
//! implementation side.

use async_trait::async_trait;
use qiita_core::contact::NewContact;
use qiita_core::template::MetadataTable;
use qiita_core::types::DbId;

use crate::error::CatalogResult;
use crate::models::lookup::Lookup;
use crate::models::preprocessed_data::PreprocessedData;
use crate::models::raw_data::RawData;
use crate::models::study::{CreateStudy, Study};
use crate::models::study_person::StudyPerson;
use crate::models::template::{CreatePrepTemplate, PrepTemplate, SampleTemplate};
use crate::models::user::User;

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> CatalogResult<()>;

    // --- Studies ---

    async fn study(&self, id: DbId) -> CatalogResult<Study>;

    async fn study_title_exists(&self, title: &str) -> CatalogResult<bool>;

    /// Ids of every public study, ascending.
    async fn public_study_ids(&self) -> CatalogResult<Vec<DbId>>;

    async fn create_study(&self, input: &CreateStudy) -> CatalogResult<Study>;

    async fn add_pmid(&self, study_id: DbId, pmid: &str) -> CatalogResult<()>;

    /// Share a study with a user. Sharing twice is a no-op.
    async fn share_study(&self, study_id: DbId, email: &str) -> CatalogResult<()>;

    /// Stop sharing a study with a user. Unsharing a non-shared user is a no-op.
    async fn unshare_study(&self, study_id: DbId, email: &str) -> CatalogResult<()>;

    // --- Users ---

    async fn user(&self, email: &str) -> CatalogResult<User>;

    /// Every registered email, ascending.
    async fn user_emails(&self) -> CatalogResult<Vec<String>>;

    // --- Study people ---

    async fn study_person(&self, id: DbId) -> CatalogResult<StudyPerson>;

    async fn study_people(&self) -> CatalogResult<Vec<StudyPerson>>;

    async fn create_study_person(&self, input: &NewContact) -> CatalogResult<StudyPerson>;

    // --- Raw data ---

    async fn raw_data(&self, id: DbId) -> CatalogResult<RawData>;

    async fn create_raw_data(&self, filetype_id: DbId, study_ids: &[DbId]) -> CatalogResult<RawData>;

    // --- Prep templates ---

    async fn prep_template_exists(&self, id: DbId) -> CatalogResult<bool>;

    async fn prep_template(&self, id: DbId) -> CatalogResult<PrepTemplate>;

    async fn create_prep_template(&self, input: &CreatePrepTemplate) -> CatalogResult<PrepTemplate>;

    async fn delete_prep_template(&self, id: DbId) -> CatalogResult<()>;

    // --- Sample templates (keyed by study id) ---

    async fn sample_template_exists(&self, study_id: DbId) -> CatalogResult<bool>;

    async fn sample_template(&self, study_id: DbId) -> CatalogResult<SampleTemplate>;

    async fn create_sample_template(
        &self,
        study_id: DbId,
        table: &MetadataTable,
    ) -> CatalogResult<SampleTemplate>;

    async fn delete_sample_template(&self, study_id: DbId) -> CatalogResult<()>;

    /// Swap in a new sample template for a study, as one unit of work.
    ///
    /// Drops every prep template of the study's raw data and the current
    /// sample template, if any, then stores `table`. On error none of it is
    /// applied.
    async fn replace_sample_template(
        &self,
        study_id: DbId,
        table: &MetadataTable,
    ) -> CatalogResult<SampleTemplate>;

    // --- Preprocessed data ---

    async fn preprocessed_data(&self, id: DbId) -> CatalogResult<PreprocessedData>;

    // --- Lookups ---

    /// Filepath type names, ascending.
    async fn filepath_types(&self) -> CatalogResult<Vec<String>>;

    async fn data_types(&self) -> CatalogResult<Vec<Lookup>>;

    async fn filetypes(&self) -> CatalogResult<Vec<Lookup>>;

    // --- Processing jobs ---

    /// Current status string of a processing job (e.g. `queued`, `running`,
    /// `success`, `error`).
    async fn processing_job_status(&self, job_id: &str) -> CatalogResult<String>;
}
