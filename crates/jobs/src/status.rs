//! Records kept in the job status store.

use qiita_core::types::DbId;
use serde::{Deserialize, Serialize};

/// `status_msg` of a job that is still executing.
pub const STATUS_RUNNING: &str = "Running";

/// `status_msg` written when a job is first queued.
pub const STATUS_QUEUED: &str = "Queued";

/// Processing job states after which the job no longer changes.
pub const TERMINAL_STATUSES: [&str; 2] = ["success", "error"];

pub fn is_terminal(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

/// Points at the job working on an entity.
///
/// Structured (`is_qiita_job`) jobs report their status through the catalog's
/// processing jobs; the rest keep a [`JobStatusRecord`] under `job_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub job_id: String,
    pub is_qiita_job: bool,
}

/// Store key of the descriptor for the job processing a prep template.
pub fn prep_template_key(prep_id: DbId) -> String {
    format!("prep_template_{prep_id}")
}

/// JSON record stored under a job id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusRecord {
    pub status_msg: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub args: serde_json::Value,
}
