use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /{job_id}    -> jobs::status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{job_id}", get(jobs::status))
}
