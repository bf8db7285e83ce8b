//! Handlers for submitting a study to the EBI archive. Admin only.

use std::path::PathBuf;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use qiita_core::demux::demux_stats;
use qiita_core::types::DbId;
use qiita_db::models::lookup::FILEPATH_TYPE_PREPROCESSED_DEMUX;
use qiita_db::models::preprocessed_data::PreprocessedData;
use qiita_db::models::template::SampleTemplate;
use qiita_db::CatalogError;
use qiita_jobs::JobRequest;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EbiStat {
    pub label: &'static str,
    pub value: usize,
}

#[derive(Debug, Serialize)]
pub struct EbiSubmissionPage {
    pub study_id: DbId,
    pub study_title: String,
    pub stats: Vec<EbiStat>,
    /// Why the study cannot be submitted, if it cannot.
    pub error: Option<String>,
}

/// Turn a not-found lookup into `None`; other failures propagate.
fn optional<T>(result: Result<T, CatalogError>) -> AppResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(CatalogError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Submission stats for a study whose sample template and preprocessed data
/// were both found.
///
/// Exactly one demultiplexed file is required; zero or several leave the
/// template counts in place and report an error.
pub async fn submission_stats(
    sample_template: &SampleTemplate,
    preprocessed: &PreprocessedData,
) -> AppResult<(Vec<EbiStat>, Option<String>)> {
    let mut stats = vec![
        EbiStat {
            label: "Number of samples",
            value: sample_template.table.len(),
        },
        EbiStat {
            label: "Number of metadata headers",
            value: sample_template.table.metadata_headers().len(),
        },
    ];

    let demux: Vec<&str> = preprocessed
        .filepaths_of_type(FILEPATH_TYPE_PREPROCESSED_DEMUX)
        .collect();

    let error = match demux.as_slice() {
        [] => Some("Study does not appear to have demultiplexed sequences associated".to_string()),
        [path] => {
            let path = PathBuf::from(*path);
            let demux = tokio::task::spawn_blocking(move || demux_stats(&path))
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?
                .map_err(|e| AppError::InternalError(format!("Demultiplexed file stats failed: {e}")))?;
            stats.push(EbiStat {
                label: "Number of sequences",
                value: demux.n,
            });
            None
        }
        _ => Some("Study appears to have multiple demultiplexed files!".to_string()),
    };

    Ok((stats, error))
}

/// GET /api/v1/ebi-submission/{id}
pub async fn page(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(study_id): Path<DbId>,
) -> AppResult<Json<DataResponse<EbiSubmissionPage>>> {
    let catalog = state.catalog.as_ref();
    let study = catalog.study(study_id).await?;

    let mut error = None;

    let sample_template = optional(catalog.sample_template(study_id).await)?;
    if sample_template.is_none() {
        error = Some(format!("There is no sample template for study: {study_id}"));
    }

    // Only the most recent preprocessed data is submitted.
    let preprocessed = match study.preprocessed_data_ids.last() {
        Some(&id) => optional(catalog.preprocessed_data(id).await)?,
        None => None,
    };
    if preprocessed.is_none() {
        error = Some(format!("There is no preprocessed data for study: {study_id}"));
    }

    let (stats, error) = match (error, &sample_template, &preprocessed) {
        (None, Some(template), Some(preprocessed)) => {
            submission_stats(template, preprocessed).await?
        }
        (error, _, _) => (Vec::new(), error),
    };

    Ok(Json(DataResponse {
        data: EbiSubmissionPage {
            study_id,
            study_title: study.title,
            stats,
            error,
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct JobDispatched {
    pub job_id: String,
    pub title: &'static str,
    pub completion_redirect: String,
}

/// POST /api/v1/ebi-submission/{id}
///
/// Queues the submission on the admin's own channel and returns the job to
/// poll.
pub async fn submit(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(study_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<JobDispatched>>)> {
    state.catalog.study(study_id).await?;

    let job_id = state
        .dispatcher
        .submit(&admin.email, JobRequest::submit_to_ebi(study_id))
        .await?;
    tracing::info!(study_id, job_id = %job_id, user = %admin.email, "EBI submission dispatched");

    let completion_redirect = format!("/compute_complete/{job_id}");
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: JobDispatched {
                job_id,
                title: "EBI Submission",
                completion_redirect,
            },
        }),
    ))
}
