//! Handler for polling dispatched jobs.

use axum::extract::{Path, State};
use axum::Json;
use qiita_core::error::CoreError;
use qiita_jobs::store::get_json;
use qiita_jobs::{JobError, JobStatusRecord};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/jobs/{job_id}
///
/// Only the channel owner (the user who dispatched the job) or an admin may
/// read the record.
pub async fn status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<String>,
) -> AppResult<Json<DataResponse<JobStatusRecord>>> {
    // Descriptors and channel lists share the key space; only status
    // records are readable here.
    let record = match get_json::<JobStatusRecord>(state.job_store.as_ref(), &job_id).await {
        Ok(record) => record,
        Err(JobError::Malformed { .. }) => None,
        Err(JobError::Store(e)) if e.code() == Some("WRONGTYPE") => None,
        Err(e) => return Err(e.into()),
    }
    .ok_or_else(|| JobError::MissingRecord(job_id.clone()))?;

    if record.channel != auth.email && !auth.requester().is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "User {} cannot read job {job_id}",
            auth.email
        ))));
    }

    Ok(DataResponse::json(record))
}
