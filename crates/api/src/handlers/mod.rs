pub mod ebi_submission;
pub mod jobs;
pub mod metadata_summary;
pub mod study_create;
pub mod study_description;
pub mod study_listing;
pub mod study_share;
