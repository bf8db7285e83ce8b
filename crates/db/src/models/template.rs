//! Sample and prep metadata template models.

use serde::Serialize;
use qiita_core::template::MetadataTable;
use qiita_core::types::DbId;

/// The sample template of a study. Its id is the study id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleTemplate {
    pub study_id: DbId,
    pub table: MetadataTable,
}

impl SampleTemplate {
    pub fn id(&self) -> DbId {
        self.study_id
    }
}

/// A preparation template linked to one raw data object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepTemplate {
    pub id: DbId,
    pub raw_data_id: DbId,
    pub study_id: DbId,
    pub data_type_id: DbId,
    pub table: MetadataTable,
}

/// DTO for creating a prep template.
#[derive(Debug, Clone)]
pub struct CreatePrepTemplate {
    pub raw_data_id: DbId,
    pub study_id: DbId,
    pub data_type_id: DbId,
    pub table: MetadataTable,
}
