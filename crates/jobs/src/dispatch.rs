//! Hands work to the external compute service.

use std::sync::Arc;

use async_trait::async_trait;
use qiita_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::JobError;
use crate::status::{JobStatusRecord, STATUS_QUEUED};
use crate::store::{set_json, JobStore};

/// A named job and its JSON arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub job: String,
    pub args: serde_json::Value,
}

impl JobRequest {
    pub fn new(job: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            job: job.into(),
            args,
        }
    }

    pub fn submit_to_ebi(study_id: DbId) -> Self {
        Self::new("submit_to_ebi", serde_json::json!([study_id]))
    }
}

#[async_trait]
pub trait JobDispatcher: Send + Sync {
    /// Queue `request` on `channel`, returning the new job id.
    async fn submit(&self, channel: &str, request: JobRequest) -> Result<String, JobError>;
}

/// Name of the list the compute service consumes for `channel`.
pub fn queue_key(channel: &str) -> String {
    format!("jobs:{channel}")
}

/// [`JobDispatcher`] that writes the job record to the status store and
/// pushes its id onto the channel's queue.
pub struct QueueDispatcher {
    store: Arc<dyn JobStore>,
}

impl QueueDispatcher {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl JobDispatcher for QueueDispatcher {
    async fn submit(&self, channel: &str, request: JobRequest) -> Result<String, JobError> {
        let job_id = Uuid::new_v4().to_string();
        let record = JobStatusRecord {
            status_msg: STATUS_QUEUED.to_string(),
            channel: channel.to_string(),
            job: request.job,
            args: request.args,
        };

        set_json(self.store.as_ref(), &job_id, &record).await?;
        self.store.push(&queue_key(channel), &job_id).await?;

        tracing::info!(job_id = %job_id, channel, job = %record.job, "Job queued");
        Ok(job_id)
    }
}
