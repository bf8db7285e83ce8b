//! Study entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use qiita_core::access::StudyAccess;
use qiita_core::study::StudyStatus;
use qiita_core::types::{DbId, Timestamp};

/// Descriptive fields recorded for every study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyInfo {
    pub principal_investigator_id: DbId,
    pub lab_person_id: Option<DbId>,
    pub metadata_complete: bool,
    pub number_samples_collected: Option<i32>,
    pub mixs_compliant: bool,
    pub timeseries_type_id: DbId,
    pub portal_type_id: DbId,
    pub study_alias: String,
    pub study_abstract: String,
    pub study_description: String,
}

/// A study with its sharing, publication and data links resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Study {
    pub id: DbId,
    pub title: String,
    /// Email of the owning user.
    pub owner: String,
    pub status: StudyStatus,
    pub info: StudyInfo,
    pub efo: Vec<i64>,
    /// Emails of users the study is shared with, ascending.
    pub shared_with: Vec<String>,
    pub pmids: Vec<String>,
    /// Raw data linked to the study, ascending.
    pub raw_data_ids: Vec<DbId>,
    /// Preprocessed data of the study, oldest first.
    pub preprocessed_data_ids: Vec<DbId>,
    pub created_at: Timestamp,
}

impl StudyAccess for Study {
    fn study_id(&self) -> DbId {
        self.id
    }

    fn owner_email(&self) -> &str {
        &self.owner
    }

    fn shared_with(&self) -> &[String] {
        &self.shared_with
    }

    fn status(&self) -> StudyStatus {
        self.status
    }
}

/// A row from the `studies` table, before link tables are joined in.
#[derive(Debug, Clone, FromRow)]
pub struct StudyRow {
    pub id: DbId,
    pub title: String,
    pub email: String,
    pub status: String,
    pub principal_investigator_id: DbId,
    pub lab_person_id: Option<DbId>,
    pub metadata_complete: bool,
    pub number_samples_collected: Option<i32>,
    pub mixs_compliant: bool,
    pub timeseries_type_id: DbId,
    pub portal_type_id: DbId,
    pub study_alias: String,
    pub study_abstract: String,
    pub study_description: String,
    pub efo: Vec<i64>,
    pub created_at: Timestamp,
}

impl StudyRow {
    pub fn info(&self) -> StudyInfo {
        StudyInfo {
            principal_investigator_id: self.principal_investigator_id,
            lab_person_id: self.lab_person_id,
            metadata_complete: self.metadata_complete,
            number_samples_collected: self.number_samples_collected,
            mixs_compliant: self.mixs_compliant,
            timeseries_type_id: self.timeseries_type_id,
            portal_type_id: self.portal_type_id,
            study_alias: self.study_alias.clone(),
            study_abstract: self.study_abstract.clone(),
            study_description: self.study_description.clone(),
        }
    }
}

/// DTO for creating a new study. New studies start in `sandbox` status.
#[derive(Debug, Clone)]
pub struct CreateStudy {
    pub owner: String,
    pub title: String,
    pub efo: Vec<i64>,
    pub info: StudyInfo,
}
