//! PostgreSQL repositories, one per table family.
//!
//! Repositories are zero-sized structs with associated async functions taking
//! a `&PgPool`. They return raw `sqlx::Error`s; [`PgCatalog`](crate::PgCatalog)
//! classifies them into [`CatalogError`](crate::CatalogError)s.

pub mod lookup_repo;
pub mod preprocessed_data_repo;
pub mod prep_template_repo;
pub mod processing_job_repo;
pub mod raw_data_repo;
pub mod sample_template_repo;
pub mod study_person_repo;
pub mod study_repo;
pub mod user_repo;

pub use lookup_repo::LookupRepo;
pub use preprocessed_data_repo::PreprocessedDataRepo;
pub use prep_template_repo::PrepTemplateRepo;
pub use processing_job_repo::ProcessingJobRepo;
pub use raw_data_repo::RawDataRepo;
pub use sample_template_repo::SampleTemplateRepo;
pub use study_person_repo::StudyPersonRepo;
pub use study_repo::StudyRepo;
pub use user_repo::UserRepo;
