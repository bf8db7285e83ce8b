//! Handlers for the study description page and its upload actions.
//!
//! The page lists the files uploaded for the study together with the raw data
//! and metadata templates already attached to it. Posting an action ingests
//! one of the uploaded files. Ingestion failures caused by the file contents
//! or by catalog constraints are reported in the page message instead of
//! failing the request.

use std::collections::BTreeMap;
use std::path::{Path as FsPath, PathBuf};

use axum::extract::{Path, State};
use axum::Json;
use qiita_core::access::check_access;
use qiita_core::template::{parse_template, MetadataTable, TemplateError};
use qiita_core::types::DbId;
use qiita_db::models::lookup::{Lookup, RAW_FILEPATH_TYPE_PREFIX};
use qiita_db::models::raw_data::RawData;
use qiita_db::models::study::{Study, StudyInfo};
use qiita_db::models::template::{CreatePrepTemplate, PrepTemplate};
use qiita_db::{Catalog, CatalogError};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Page model
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct OtherStudyRawData {
    pub raw_data_id: DbId,
    /// `"id: <raw data id>, study: <title>"`
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct StudyDescriptionPage {
    pub study_id: DbId,
    pub study_title: String,
    pub study_info: StudyInfo,
    pub msg: String,
    pub tab_to_display: String,
    /// Files waiting in the study upload directory, sorted.
    pub files: Vec<String>,
    /// Raw filepath types without their `raw_` prefix, e.g. `forward seqs`.
    pub filepath_types: Vec<String>,
    pub data_types: Vec<Lookup>,
    pub filetypes: Vec<Lookup>,
    pub available_raw_data: Vec<RawData>,
    /// Existing prep templates keyed by raw data id.
    pub available_prep_templates: BTreeMap<DbId, Vec<PrepTemplate>>,
    pub sample_template_exists: bool,
    pub user_level: String,
    pub can_upload: bool,
    pub other_studies_raw_data: Vec<OtherStudyRawData>,
}

/// Names of the regular files in `dir`, sorted. A missing directory is empty.
async fn list_uploads(dir: &FsPath) -> AppResult<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(AppError::InternalError(format!("Failed to list {}: {e}", dir.display()))),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
    {
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

/// Raw data of the user's other private studies, labelled with the title of
/// the last study each raw data was linked to.
async fn raw_data_from_other_studies(
    catalog: &dyn Catalog,
    private_studies: &[DbId],
    study_id: DbId,
) -> AppResult<Vec<OtherStudyRawData>> {
    let mut labels = BTreeMap::new();
    for &sid in private_studies.iter().filter(|&&sid| sid != study_id) {
        for rd_id in catalog.study(sid).await?.raw_data_ids {
            let raw = catalog.raw_data(rd_id).await?;
            if let Some(&last) = raw.study_ids.last() {
                labels.insert(rd_id, catalog.study(last).await?.title);
            }
        }
    }

    Ok(labels
        .into_iter()
        .map(|(raw_data_id, title)| OtherStudyRawData {
            raw_data_id,
            label: format!("id: {raw_data_id}, study: {title}"),
        })
        .collect())
}

/// Assemble the description page of `study_id`.
///
/// Fails with not-found for unknown studies and forbidden when `auth` has no
/// access.
pub async fn build_page(
    state: &AppState,
    auth: &AuthUser,
    study_id: DbId,
    msg: String,
    tab_to_display: String,
) -> AppResult<StudyDescriptionPage> {
    let catalog = state.catalog.as_ref();
    let study = catalog.study(study_id).await?;
    let requester = auth.requester();
    check_access(&requester, &study, false)?;

    let files = list_uploads(&state.study_upload_dir(study_id)).await?;

    let filepath_types = catalog
        .filepath_types()
        .await?
        .into_iter()
        .filter_map(|t| {
            t.strip_prefix(RAW_FILEPATH_TYPE_PREFIX)
                .map(|rest| rest.replace('_', " "))
        })
        .collect();

    let mut available_raw_data = Vec::with_capacity(study.raw_data_ids.len());
    let mut available_prep_templates = BTreeMap::new();
    for &rd_id in &study.raw_data_ids {
        let raw = catalog.raw_data(rd_id).await?;
        let mut templates = Vec::new();
        for &pt_id in &raw.prep_template_ids {
            if catalog.prep_template_exists(pt_id).await? {
                templates.push(catalog.prep_template(pt_id).await?);
            }
        }
        available_prep_templates.insert(rd_id, templates);
        available_raw_data.push(raw);
    }

    let mut data_types = catalog.data_types().await?;
    data_types.sort_by_key(|d| d.id);
    let mut filetypes = catalog.filetypes().await?;
    filetypes.sort_by_key(|f| f.id);

    let user = catalog.user(&auth.email).await?;
    let other_studies_raw_data =
        raw_data_from_other_studies(catalog, &user.private_studies, study_id).await?;

    Ok(StudyDescriptionPage {
        study_id,
        study_title: study.title.clone(),
        study_info: study.info.clone(),
        msg,
        tab_to_display,
        files,
        filepath_types,
        data_types,
        filetypes,
        available_raw_data,
        available_prep_templates,
        sample_template_exists: catalog.sample_template_exists(study_id).await?,
        user_level: user.level,
        can_upload: check_access(&requester, &study, true)?,
        other_studies_raw_data,
    })
}

/// GET /api/v1/studies/{id}
pub async fn get_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(study_id): Path<DbId>,
) -> AppResult<Json<DataResponse<StudyDescriptionPage>>> {
    let page = build_page(&state, &auth, study_id, String::new(), String::new()).await?;
    Ok(DataResponse::json(page))
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Upload action posted from the description page. At most one branch runs,
/// checked in field order.
#[derive(Debug, Default, Deserialize)]
pub struct StudyAction {
    /// Uploaded file to replace the sample template with.
    #[serde(default)]
    pub sample_template: Option<String>,
    /// Filetype id of a new raw data object.
    #[serde(default)]
    pub filetype: Option<DbId>,
    /// Raw data of another study to attach.
    #[serde(default)]
    pub previous_raw_data: Option<DbId>,
    /// Uploaded file to add as a prep template.
    #[serde(default)]
    pub add_prep_template: Option<String>,
    #[serde(default)]
    pub raw_data_id: Option<DbId>,
    #[serde(default)]
    pub data_type_id: Option<DbId>,
}

/// Path of an uploaded file, which must already exist.
///
/// Only bare file names are accepted.
pub fn upload_path(upload_dir: &FsPath, name: &str) -> AppResult<PathBuf> {
    if FsPath::new(name).file_name().and_then(|n| n.to_str()) != Some(name) {
        return Err(AppError::BadRequest(format!("Invalid upload file name: {name}")));
    }
    let path = upload_dir.join(name);
    if !path.is_file() {
        return Err(AppError::BadRequest(format!(
            "This file doesn't exist: {}",
            path.display()
        )));
    }
    Ok(path)
}

/// Why an ingestion did not go through. Shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Catalog(CatalogError),
}

/// Split catalog failures into ones to report in the page and ones that fail
/// the request.
fn absorb(err: CatalogError) -> Result<IngestError, AppError> {
    if err.is_constraint_violation() {
        Ok(IngestError::Catalog(err))
    } else {
        Err(err.into())
    }
}

async fn read_template(path: &FsPath) -> Result<MetadataTable, TemplateError> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_template(&content)
}

/// Replace the study's metadata with the sample template in `path`.
///
/// The file is parsed before the catalog is touched, so a bad file leaves the
/// study untouched. The catalog swaps the prep templates of the study's raw
/// data and its sample template for the new one in a single unit of work.
/// The uploaded file is removed once the template is stored.
pub async fn replace_sample_template(
    catalog: &dyn Catalog,
    study: &Study,
    path: &FsPath,
) -> AppResult<Result<(), IngestError>> {
    let table = match read_template(path).await {
        Ok(table) => table,
        Err(e) => return Ok(Err(e.into())),
    };

    if let Err(e) = catalog.replace_sample_template(study.id, &table).await {
        return Ok(Err(absorb(e)?));
    }

    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove ingested upload");
    }

    tracing::info!(
        study_id = study.id,
        samples = table.len(),
        "Sample template replaced",
    );
    Ok(Ok(()))
}

/// Create a prep template for `raw_data_id` from the file in `path`.
pub async fn add_prep_template(
    catalog: &dyn Catalog,
    study: &Study,
    path: &FsPath,
    raw_data_id: DbId,
    data_type_id: DbId,
) -> AppResult<Result<PrepTemplate, IngestError>> {
    let table = match read_template(path).await {
        Ok(table) => table,
        Err(e) => return Ok(Err(e.into())),
    };

    let input = CreatePrepTemplate {
        raw_data_id,
        study_id: study.id,
        data_type_id,
        table,
    };
    match catalog.create_prep_template(&input).await {
        Ok(template) => {
            tracing::info!(
                study_id = study.id,
                raw_data_id,
                prep_template_id = template.id,
                "Prep template added",
            );
            Ok(Ok(template))
        }
        Err(e) => Ok(Err(absorb(e)?)),
    }
}

fn basename(path: &FsPath) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/v1/studies/{id}
pub async fn post_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(study_id): Path<DbId>,
    Json(action): Json<StudyAction>,
) -> AppResult<Json<DataResponse<StudyDescriptionPage>>> {
    let catalog = state.catalog.as_ref();
    let study = catalog.study(study_id).await?;
    check_access(&auth.requester(), &study, false)?;

    let upload_dir = state.study_upload_dir(study_id);

    let (msg, tab_to_display) = if let Some(name) = non_empty(action.sample_template) {
        let path = upload_path(&upload_dir, &name)?;
        match replace_sample_template(catalog, &study, &path).await? {
            Ok(()) => (format!("The sample template {name} has been added"), String::new()),
            Err(e) => (
                format!(
                    "An error occurred parsing the sample template: {}: {e}",
                    basename(&path)
                ),
                String::new(),
            ),
        }
    } else if action.filetype.is_some() || action.previous_raw_data.is_some() {
        let msg = match (action.filetype, action.previous_raw_data) {
            (Some(_), Some(_)) => {
                "You can not specify both a new raw data and a previously used one".to_string()
            }
            (Some(filetype), None) => match catalog.create_raw_data(filetype, &[study_id]).await {
                Ok(raw) => {
                    tracing::info!(study_id, raw_data_id = raw.id, "Raw data created");
                    String::new()
                }
                Err(e) => format!("An error occurred creating a new raw data object: {}", absorb(e)?),
            },
            _ => "adding other study's raw data is being implemented".to_string(),
        };
        (msg, String::new())
    } else if let (Some(name), Some(raw_data_id), Some(data_type_id)) = (
        non_empty(action.add_prep_template),
        action.raw_data_id,
        action.data_type_id,
    ) {
        if !study.raw_data_ids.contains(&raw_data_id) {
            return Err(AppError::BadRequest(format!(
                "Raw data {raw_data_id} does not belong to study {study_id}"
            )));
        }
        let path = upload_path(&upload_dir, &name)?;
        let msg = match add_prep_template(catalog, &study, &path, raw_data_id, data_type_id).await? {
            Ok(_) => "Your prep template was added".to_string(),
            Err(e) => format!(
                "An error occurred parsing the prep template: {}: {e}",
                basename(&path)
            ),
        };
        (msg, raw_data_id.to_string())
    } else {
        (
            "Error, did you select a valid uploaded file or are passing the correct parameters?"
                .to_string(),
            String::new(),
        )
    };

    let page = build_page(&state, &auth, study_id, msg, tab_to_display).await?;
    Ok(DataResponse::json(page))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn upload_path_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(upload_path(dir.path(), "../secret.txt"), Err(AppError::BadRequest(_)));
        assert_matches!(upload_path(dir.path(), "a/b.txt"), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn upload_path_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            upload_path(dir.path(), "missing.txt"),
            Err(AppError::BadRequest(msg)) if msg.starts_with("This file doesn't exist")
        );

        std::fs::write(dir.path().join("present.txt"), "sample_name\nS1\n").unwrap();
        assert_eq!(
            upload_path(dir.path(), "present.txt").unwrap(),
            dir.path().join("present.txt")
        );
    }

    #[test]
    fn non_empty_drops_blank_values() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn only_constraint_failures_are_absorbed() {
        assert_matches!(
            absorb(CatalogError::Duplicate("dup".into())),
            Ok(IngestError::Catalog(_))
        );
        assert_matches!(
            absorb(CatalogError::not_found("Study", 1)),
            Err(AppError::Catalog(CatalogError::NotFound { .. }))
        );
    }
}
