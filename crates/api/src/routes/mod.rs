pub mod ebi;
pub mod health;
pub mod jobs;
pub mod studies;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /studies                         listing (GET ?visibility=), create (POST)
/// /studies/private                 private + shared listing
/// /studies/public                  public listing
/// /studies/create                  creation form choices
/// /studies/check-title             title availability
/// /studies/share                   share / unshare (owner only)
/// /studies/metadata-summary        template column statistics
/// /studies/{id}                    description page (GET), upload actions (POST)
///
/// /ebi-submission/{id}             submission page (GET), dispatch (POST); admin only
///
/// /jobs/{job_id}                   job status record
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/studies", studies::router())
        .nest("/ebi-submission", ebi::router())
        .nest("/jobs", jobs::router())
}
