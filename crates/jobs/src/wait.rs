//! Fixed-interval waits on dispatched jobs.
//!
//! Only test code uses these to synchronize with asynchronously processed
//! work. There is no backoff and no timeout: a job that never finishes blocks
//! the caller forever.

use std::time::Duration;

use qiita_core::types::DbId;
use qiita_db::Catalog;

use crate::error::JobError;
use crate::status::{is_terminal, prep_template_key, JobDescriptor, JobStatusRecord, STATUS_RUNNING};
use crate::store::{get_json, JobStore};

pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait for the job whose descriptor is stored under `key`.
///
/// A missing descriptor is an error when `raise_if_none` is set and returns
/// immediately otherwise.
pub async fn wait_for_job(
    store: &dyn JobStore,
    catalog: &dyn Catalog,
    key: &str,
    raise_if_none: bool,
) -> Result<(), JobError> {
    let Some(descriptor) = get_json::<JobDescriptor>(store, key).await? else {
        if raise_if_none {
            return Err(JobError::MissingDescriptor(key.to_string()));
        }
        return Ok(());
    };

    tracing::debug!(key, job_id = %descriptor.job_id, "Waiting for job");

    if descriptor.is_qiita_job {
        while !is_terminal(&catalog.processing_job_status(&descriptor.job_id).await?) {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    } else {
        loop {
            let record = get_json::<JobStatusRecord>(store, &descriptor.job_id)
                .await?
                .ok_or_else(|| JobError::MissingRecord(descriptor.job_id.clone()))?;
            if record.status_msg != STATUS_RUNNING {
                break;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    tokio::time::sleep(POLL_INTERVAL).await;
    Ok(())
}

pub async fn wait_for_prep_information_job(
    store: &dyn JobStore,
    catalog: &dyn Catalog,
    prep_id: DbId,
    raise_if_none: bool,
) -> Result<(), JobError> {
    wait_for_job(store, catalog, &prep_template_key(prep_id), raise_if_none).await
}
