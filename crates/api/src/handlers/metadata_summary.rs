//! Handler for the metadata template summary.

use axum::extract::{Query, State};
use axum::Json;
use qiita_core::access::has_access;
use qiita_core::error::CoreError;
use qiita_core::stats::{stats_from_table, TableStats};
use qiita_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub study_id: DbId,
    /// Sample template id (the id of its study). Wins over `prep_template`.
    pub sample_template: Option<DbId>,
    pub prep_template: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct MetadataSummary {
    pub study_id: DbId,
    pub study_title: String,
    pub stats: TableStats,
}

/// GET /api/v1/studies/metadata-summary?study_id=&sample_template=&prep_template=
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SummaryParams>,
) -> AppResult<Json<DataResponse<MetadataSummary>>> {
    let catalog = state.catalog.as_ref();

    let (owning_study, table) = match (params.sample_template, params.prep_template) {
        (Some(id), _) => {
            let template = catalog.sample_template(id).await?;
            (template.study_id, template.table)
        }
        (None, Some(id)) => {
            let template = catalog.prep_template(id).await?;
            (template.study_id, template.table)
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either sample_template or prep_template is required".into(),
            ))
        }
    };

    let study = catalog.study(owning_study).await?;
    if !has_access(&auth.requester(), &study, false) {
        return Err(CoreError::Forbidden(
            "You do not have access to access this information.".into(),
        )
        .into());
    }

    Ok(Json(DataResponse {
        data: MetadataSummary {
            study_id: params.study_id,
            study_title: study.title,
            stats: stats_from_table(&table),
        },
    }))
}
