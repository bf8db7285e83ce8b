use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use qiita_core::error::CoreError;
use qiita_db::CatalogError;
use qiita_jobs::JobError;
use serde::Serialize;

/// Everything a handler can fail with.
///
/// Rendered as `{ "error": <message>, "code": <CODE> }`. Storage and queue
/// failures are logged and replaced by a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Job(#[from] JobError),

    /// Malformed request input, such as an unsafe upload file name.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl AppError {
    /// Status, machine-readable code and user-facing message.
    fn classify(&self) -> (StatusCode, &'static str, Option<String>) {
        use StatusCode as S;

        match self {
            AppError::Core(err) => {
                let (status, code) = match err {
                    CoreError::NotFound { .. } => (S::NOT_FOUND, "NOT_FOUND"),
                    CoreError::Validation(_) => (S::BAD_REQUEST, "VALIDATION_ERROR"),
                    CoreError::Unauthorized(_) => (S::UNAUTHORIZED, "UNAUTHORIZED"),
                    CoreError::Forbidden(_) => (S::FORBIDDEN, "FORBIDDEN"),
                };
                (status, code, Some(err.to_string()))
            }
            AppError::Catalog(err) => match err {
                CatalogError::NotFound { .. } => (S::NOT_FOUND, "NOT_FOUND", Some(err.to_string())),
                CatalogError::Duplicate(_) => (S::CONFLICT, "CONFLICT", Some(err.to_string())),
                CatalogError::Column(_) | CatalogError::Execution(_) => {
                    (S::BAD_REQUEST, "VALIDATION_ERROR", Some(err.to_string()))
                }
                CatalogError::Database(_) => (S::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None),
            },
            AppError::Job(err) => match err {
                JobError::MissingRecord(_) | JobError::MissingDescriptor(_) => {
                    (S::NOT_FOUND, "NOT_FOUND", Some(err.to_string()))
                }
                _ => (S::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None),
            },
            AppError::BadRequest(msg) => (S::BAD_REQUEST, "BAD_REQUEST", Some(msg.clone())),
            AppError::InternalError(_) => (S::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();
        let error = message.unwrap_or_else(|| {
            tracing::error!(error = %self, "Request failed");
            "An internal error occurred".to_string()
        });

        (status, Json(ErrorBody { error, code })).into_response()
    }
}
