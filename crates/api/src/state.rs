use std::path::PathBuf;
use std::sync::Arc;

use qiita_core::types::DbId;
use qiita_db::Catalog;
use qiita_jobs::{JobDispatcher, JobStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Study, user, template and data catalog.
    pub catalog: Arc<dyn Catalog>,
    pub config: Arc<ServerConfig>,
    /// Key-value job status store shared with the compute service.
    pub job_store: Arc<dyn JobStore>,
    /// Queues work for the compute service.
    pub dispatcher: Arc<dyn JobDispatcher>,
}

impl AppState {
    /// Directory uploaded files for `study_id` are read from.
    pub fn study_upload_dir(&self, study_id: DbId) -> PathBuf {
        self.config.upload_dir.join(study_id.to_string())
    }
}
