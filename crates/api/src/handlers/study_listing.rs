//! Handlers for the study listings.

use axum::extract::{Query, State};
use axum::Json;
use qiita_core::error::CoreError;
use qiita_core::linkify::{join_links, pubmed_link, study_person_link};
use qiita_core::study::{ListingFilter, StudyStatus};
use qiita_core::types::DbId;
use qiita_db::models::study::Study;
use qiita_db::models::user::User;
use qiita_db::Catalog;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One row of a study listing.
#[derive(Debug, Clone, Serialize)]
pub struct StudySummary {
    pub id: DbId,
    pub title: String,
    pub meta_complete: bool,
    pub num_samples_collected: Option<i32>,
    /// Linkified users the study is shared with, comma separated.
    pub shared: String,
    pub num_raw_data: usize,
    /// Linkified principal investigator.
    pub pi: String,
    /// Linkified PubMed ids, comma separated.
    pub pmids: String,
    /// Linkified owner email.
    pub owner: String,
    pub status: StudyStatus,
}

/// Linkified, comma-joined list of the users `study` is shared with.
pub async fn shared_links(catalog: &dyn Catalog, study: &Study) -> AppResult<String> {
    let mut links = Vec::with_capacity(study.shared_with.len());
    for email in &study.shared_with {
        let user = catalog.user(email).await?;
        links.push(study_person_link(&user.email, user.display_name()));
    }
    Ok(join_links(links))
}

/// Build the listing rows for `filter`.
///
/// `Private` and `Shared` list the studies of `user`; `Public` lists every
/// public study and ignores `user`.
pub async fn build_study_info(
    catalog: &dyn Catalog,
    filter: ListingFilter,
    user: Option<&User>,
) -> AppResult<Vec<StudySummary>> {
    let ids = match (filter, user) {
        (ListingFilter::Private, Some(user)) => user.private_studies.clone(),
        (ListingFilter::Shared, Some(user)) => user.shared_studies.clone(),
        (ListingFilter::Public, _) => catalog.public_study_ids().await?,
        (_, None) => {
            return Err(CoreError::Validation(format!(
                "Listing {} studies requires a user",
                filter.as_str()
            ))
            .into())
        }
    };

    let mut infolist = Vec::with_capacity(ids.len());
    for id in ids {
        let study = catalog.study(id).await?;
        let pi = catalog
            .study_person(study.info.principal_investigator_id)
            .await?;

        infolist.push(StudySummary {
            id: study.id,
            title: study.title.clone(),
            meta_complete: study.info.metadata_complete,
            num_samples_collected: study.info.number_samples_collected,
            shared: shared_links(catalog, &study).await?,
            num_raw_data: study.raw_data_ids.len(),
            pi: study_person_link(&pi.email, &pi.name),
            pmids: join_links(study.pmids.iter().map(|p| pubmed_link(p))),
            // Users are not required to have a name, so the email doubles as one.
            owner: study_person_link(&study.owner, &study.owner),
            status: study.status,
        });
    }
    Ok(infolist)
}

#[derive(Debug, Deserialize)]
pub struct ListingParams {
    pub visibility: String,
}

/// GET /api/v1/studies?visibility={private|shared|public}
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListingParams>,
) -> AppResult<Json<DataResponse<Vec<StudySummary>>>> {
    let filter: ListingFilter = params.visibility.parse()?;
    let user = match filter {
        ListingFilter::Public => None,
        _ => Some(state.catalog.user(&auth.email).await?),
    };
    let studies = build_study_info(state.catalog.as_ref(), filter, user.as_ref()).await?;
    Ok(DataResponse::json(studies))
}

#[derive(Debug, Serialize)]
pub struct PrivateStudiesPage {
    pub user_studies: Vec<StudySummary>,
    pub shared_studies: Vec<StudySummary>,
    pub all_emails_except_current: Vec<String>,
}

/// GET /api/v1/studies/private
pub async fn private_studies(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<PrivateStudiesPage>>> {
    let catalog = state.catalog.as_ref();
    let user = catalog.user(&auth.email).await?;

    let user_studies = build_study_info(catalog, ListingFilter::Private, Some(&user)).await?;
    let shared_studies = build_study_info(catalog, ListingFilter::Shared, Some(&user)).await?;
    let all_emails_except_current = catalog
        .user_emails()
        .await?
        .into_iter()
        .filter(|email| *email != auth.email)
        .collect();

    Ok(Json(DataResponse {
        data: PrivateStudiesPage {
            user_studies,
            shared_studies,
            all_emails_except_current,
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct PublicStudiesPage {
    pub public_studies: Vec<StudySummary>,
}

/// GET /api/v1/studies/public
pub async fn public_studies(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<PublicStudiesPage>>> {
    let public_studies = build_study_info(state.catalog.as_ref(), ListingFilter::Public, None).await?;
    Ok(Json(DataResponse {
        data: PublicStudiesPage { public_studies },
    }))
}
