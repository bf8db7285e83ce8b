//! Handler for sharing a study with other users.

use axum::extract::{Query, State};
use axum::Json;
use qiita_core::access::check_owner;
use qiita_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::study_listing::shared_links;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ShareParams {
    pub study_id: DbId,
    /// User to start sharing with.
    pub selected: Option<String>,
    /// User to stop sharing with.
    pub deselected: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SharedUsers {
    pub users: Vec<String>,
    /// Linkified `users`, comma separated.
    pub links: String,
}

/// GET /api/v1/studies/share?study_id=&selected=&deselected=
///
/// Owner only. Sharing is applied before unsharing when both are given.
pub async fn share(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ShareParams>,
) -> AppResult<Json<DataResponse<SharedUsers>>> {
    let catalog = state.catalog.as_ref();
    let study = catalog.study(params.study_id).await?;
    check_owner(&auth.email, &study)?;

    if let Some(email) = &params.selected {
        catalog.share_study(study.id, email).await?;
        tracing::info!(study_id = study.id, user = %email, "Study shared");
    }
    if let Some(email) = &params.deselected {
        catalog.unshare_study(study.id, email).await?;
        tracing::info!(study_id = study.id, user = %email, "Study unshared");
    }

    let study = catalog.study(study.id).await?;
    let links = shared_links(catalog, &study).await?;
    Ok(Json(DataResponse {
        data: SharedUsers {
            users: study.shared_with,
            links,
        },
    }))
}
