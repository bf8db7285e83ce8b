//! Route definitions for EBI submission.

use axum::routing::get;
use axum::Router;

use crate::handlers::ebi_submission;
use crate::state::AppState;

/// Routes mounted at `/ebi-submission`.
///
/// ```text
/// GET    /{id}    -> ebi_submission::page
/// POST   /{id}    -> ebi_submission::submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(ebi_submission::page).post(ebi_submission::submit))
}
