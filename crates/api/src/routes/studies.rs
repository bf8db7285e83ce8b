//! Route definitions for the `/studies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{metadata_summary, study_create, study_description, study_listing, study_share};
use crate::state::AppState;

/// Routes mounted at `/studies`.
///
/// ```text
/// GET    /                    -> study_listing::list
/// POST   /                    -> study_create::create
/// GET    /private             -> study_listing::private_studies
/// GET    /public              -> study_listing::public_studies
/// GET    /create              -> study_create::form_choices
/// GET    /check-title         -> study_create::check_title
/// GET    /share               -> study_share::share
/// GET    /metadata-summary    -> metadata_summary::summary
/// GET    /{id}                -> study_description::get_page
/// POST   /{id}                -> study_description::post_action
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(study_listing::list).post(study_create::create))
        .route("/private", get(study_listing::private_studies))
        .route("/public", get(study_listing::public_studies))
        .route("/create", get(study_create::form_choices))
        .route("/check-title", get(study_create::check_title))
        .route("/share", get(study_share::share))
        .route("/metadata-summary", get(metadata_summary::summary))
        .route(
            "/{id}",
            get(study_description::get_page).post(study_description::post_action),
        )
}
