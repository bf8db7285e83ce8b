//! Handlers for creating studies.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use qiita_core::contact::ContactSelection;
use qiita_core::error::CoreError;
use qiita_core::study::{
    is_environmental_package, DEFAULT_EFO, DEFAULT_PORTAL_TYPE_ID, DEFAULT_TIMESERIES_TYPE_ID,
    ENVIRONMENTAL_PACKAGES,
};
use qiita_core::types::DbId;
use qiita_db::models::study::{CreateStudy, StudyInfo};
use qiita_db::Catalog;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Form choices
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PersonChoice {
    pub id: DbId,
    /// `"name, affiliation"`
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct PackageChoice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CreationFormChoices {
    pub people: Vec<PersonChoice>,
    pub environmental_packages: Vec<PackageChoice>,
}

/// GET /api/v1/studies/create
pub async fn form_choices(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<CreationFormChoices>>> {
    let people = state
        .catalog
        .study_people()
        .await?
        .into_iter()
        .map(|person| PersonChoice {
            id: person.id,
            label: format!("{}, {}", person.name, person.affiliation),
        })
        .collect();

    let environmental_packages = ENVIRONMENTAL_PACKAGES
        .iter()
        .map(|&(value, label)| PackageChoice { value, label })
        .collect();

    Ok(Json(DataResponse {
        data: CreationFormChoices {
            people,
            environmental_packages,
        },
    }))
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudyForm {
    #[validate(length(min = 1, message = "Study title is required"))]
    pub study_title: String,
    #[validate(length(min = 1, message = "Study alias is required"))]
    pub study_alias: String,
    #[validate(length(min = 1, message = "Study abstract is required"))]
    pub study_abstract: String,
    #[validate(length(min = 1, message = "Study description is required"))]
    pub study_description: String,
    #[validate(length(min = 1, message = "Select at least one environmental package"))]
    pub environmental_packages: Vec<String>,
    #[serde(default)]
    pub is_timeseries: bool,
    #[serde(default)]
    pub pubmed_id: Option<String>,
    pub principal_investigator: ContactSelection,
    #[serde(default)]
    pub lab_person: Option<ContactSelection>,
}

impl CreateStudyForm {
    fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let blank = [
            ("study_title", &self.study_title),
            ("study_alias", &self.study_alias),
            ("study_abstract", &self.study_abstract),
            ("study_description", &self.study_description),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());
        if let Some((field, _)) = blank {
            return Err(CoreError::Validation(format!("{field} must not be blank")));
        }

        if let Some(unknown) = self
            .environmental_packages
            .iter()
            .find(|p| !is_environmental_package(p))
        {
            return Err(CoreError::Validation(format!(
                "Unknown environmental package: {unknown}"
            )));
        }
        Ok(())
    }
}

/// Resolve a contact selection to a study person id, creating the contact
/// when the selection carries new contact details.
pub async fn resolve_contact(catalog: &dyn Catalog, selection: ContactSelection) -> AppResult<DbId> {
    match selection {
        ContactSelection::Existing(id) => Ok(id),
        ContactSelection::New(contact) => {
            let contact = contact.normalized()?;
            let person = catalog.create_study_person(&contact).await?;
            tracing::info!(person_id = person.id, name = %person.name, "Study person created");
            Ok(person.id)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudyCreated {
    pub message: String,
    pub level: &'static str,
    pub study_id: DbId,
}

/// POST /api/v1/studies
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(form): Json<CreateStudyForm>,
) -> AppResult<(StatusCode, Json<DataResponse<StudyCreated>>)> {
    form.check()?;
    let catalog = state.catalog.as_ref();

    let principal_investigator_id = resolve_contact(catalog, form.principal_investigator).await?;
    let lab_person_id = match form.lab_person {
        Some(selection) => Some(resolve_contact(catalog, selection).await?),
        None => None,
    };

    let input = CreateStudy {
        owner: auth.email.clone(),
        title: form.study_title.clone(),
        efo: DEFAULT_EFO.to_vec(),
        info: StudyInfo {
            principal_investigator_id,
            lab_person_id,
            metadata_complete: false,
            number_samples_collected: None,
            mixs_compliant: true,
            timeseries_type_id: DEFAULT_TIMESERIES_TYPE_ID,
            portal_type_id: DEFAULT_PORTAL_TYPE_ID,
            study_alias: form.study_alias,
            study_abstract: form.study_abstract,
            study_description: form.study_description,
        },
    };
    let study = catalog.create_study(&input).await?;

    if let Some(pmid) = form.pubmed_id.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        catalog.add_pmid(study.id, pmid).await?;
    }

    tracing::info!(
        study_id = study.id,
        user = %auth.email,
        is_timeseries = form.is_timeseries,
        packages = ?form.environmental_packages,
        "Study created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: StudyCreated {
                message: format!("Study \"{}\" successfully created", study.title),
                level: "success",
                study_id: study.id,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Title availability
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CheckTitleParams {
    pub study_title: Option<String>,
}

/// GET /api/v1/studies/check-title?study_title=
///
/// `true` when the title is free to use.
pub async fn check_title(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<CheckTitleParams>,
) -> AppResult<Json<DataResponse<bool>>> {
    let available = match params.study_title {
        Some(title) => !state.catalog.study_title_exists(&title).await?,
        None => false,
    };
    Ok(DataResponse::json(available))
}
