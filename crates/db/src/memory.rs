//! In-process [`Catalog`] used by tests and local development.
//!
//! Mirrors the constraints of the PostgreSQL schema (unique titles, foreign
//! keys, one sample template per study) and records every mutation and study
//! read in a journal so callers can assert on ordering.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use qiita_core::contact::NewContact;
use qiita_core::study::StudyStatus;
use qiita_core::template::MetadataTable;
use qiita_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::models::lookup::Lookup;
use crate::models::preprocessed_data::{Filepath, PreprocessedData};
use crate::models::raw_data::RawData;
use crate::models::study::{CreateStudy, Study, StudyInfo};
use crate::models::study_person::StudyPerson;
use crate::models::template::{CreatePrepTemplate, PrepTemplate, SampleTemplate};
use crate::models::user::User;

/// One entry of the [`MemoryCatalog`] journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOp {
    ReadStudy(DbId),
    CreateStudy(DbId),
    AddPmid(DbId, String),
    Share(DbId, String),
    Unshare(DbId, String),
    CreateStudyPerson(DbId),
    CreateRawData(DbId),
    CreatePrepTemplate(DbId),
    DeletePrepTemplate(DbId),
    CreateSampleTemplate(DbId),
    DeleteSampleTemplate(DbId),
}

struct UserRecord {
    name: Option<String>,
    level: String,
}

struct StudyRecord {
    title: String,
    owner: String,
    status: StudyStatus,
    info: StudyInfo,
    efo: Vec<i64>,
    shared_with: BTreeSet<String>,
    pmids: BTreeSet<String>,
    created_at: Timestamp,
}

struct RawDataRecord {
    filetype_id: DbId,
    study_ids: Vec<DbId>,
}

struct State {
    next_id: DbId,
    users: BTreeMap<String, UserRecord>,
    people: BTreeMap<DbId, StudyPerson>,
    studies: BTreeMap<DbId, StudyRecord>,
    raw_data: BTreeMap<DbId, RawDataRecord>,
    prep_templates: BTreeMap<DbId, PrepTemplate>,
    sample_templates: BTreeMap<DbId, MetadataTable>,
    preprocessed: BTreeMap<DbId, PreprocessedData>,
    processing_jobs: HashMap<String, String>,
    filepath_types: Vec<String>,
    data_types: Vec<Lookup>,
    filetypes: Vec<Lookup>,
    journal: Vec<CatalogOp>,
    /// When set, template writes fail as if the database went away.
    template_writes_fail: bool,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn study(&self, id: DbId) -> CatalogResult<Study> {
        let record = self
            .studies
            .get(&id)
            .ok_or_else(|| CatalogError::not_found("Study", id))?;

        Ok(Study {
            id,
            title: record.title.clone(),
            owner: record.owner.clone(),
            status: record.status,
            info: record.info.clone(),
            efo: record.efo.clone(),
            shared_with: record.shared_with.iter().cloned().collect(),
            pmids: record.pmids.iter().cloned().collect(),
            raw_data_ids: self
                .raw_data
                .iter()
                .filter(|(_, rd)| rd.study_ids.contains(&id))
                .map(|(rd_id, _)| *rd_id)
                .collect(),
            preprocessed_data_ids: self
                .preprocessed
                .values()
                .filter(|p| p.study_id == id)
                .map(|p| p.id)
                .collect(),
            created_at: record.created_at,
        })
    }

    fn check_template_writes(&self) -> CatalogResult<()> {
        if self.template_writes_fail {
            return Err(CatalogError::Database(sqlx::Error::Protocol(
                "template writes are unavailable".into(),
            )));
        }
        Ok(())
    }

    fn require_user(&self, email: &str) -> CatalogResult<()> {
        if !self.users.contains_key(email) {
            return Err(CatalogError::not_found("User", email));
        }
        Ok(())
    }
}

fn lookups(names: &[&str]) -> Vec<Lookup> {
    names
        .iter()
        .zip(1..)
        .map(|(name, id)| Lookup {
            id,
            name: name.to_string(),
        })
        .collect()
}

/// [`Catalog`] that keeps everything in memory behind a `tokio` lock.
pub struct MemoryCatalog {
    state: RwLock<State>,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    /// An empty catalog with the same lookup vocabularies as the SQL seed data.
    pub fn new() -> Self {
        let filepath_types = [
            "biom",
            "directory",
            "log",
            "plain_text",
            "preprocessed_demux",
            "preprocessed_fasta",
            "preprocessed_fastq",
            "raw_barcodes",
            "raw_fasta",
            "raw_forward_seqs",
            "raw_qual",
            "raw_reverse_seqs",
            "raw_sff",
            "raw_spectra",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            state: RwLock::new(State {
                next_id: 0,
                users: BTreeMap::new(),
                people: BTreeMap::new(),
                studies: BTreeMap::new(),
                raw_data: BTreeMap::new(),
                prep_templates: BTreeMap::new(),
                sample_templates: BTreeMap::new(),
                preprocessed: BTreeMap::new(),
                processing_jobs: HashMap::new(),
                filepath_types,
                data_types: lookups(&["16S", "18S", "ITS", "Proteomic", "Metabolomic", "Metagenomic"]),
                filetypes: lookups(&["SFF", "FASTA_Sanger", "FASTQ", "FASTA", "per_sample_FASTQ"]),
                journal: Vec::new(),
                template_writes_fail: false,
            }),
        }
    }

    // --- Seeding helpers (no journal entries) ---

    pub async fn add_user(&self, email: &str, name: Option<&str>, level: &str) {
        self.state.write().await.users.insert(
            email.to_string(),
            UserRecord {
                name: name.map(str::to_string),
                level: level.to_string(),
            },
        );
    }

    pub async fn set_study_status(&self, study_id: DbId, status: StudyStatus) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        let record = state
            .studies
            .get_mut(&study_id)
            .ok_or_else(|| CatalogError::not_found("Study", study_id))?;
        record.status = status;
        Ok(())
    }

    pub async fn set_samples_collected(&self, study_id: DbId, count: i32) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        let record = state
            .studies
            .get_mut(&study_id)
            .ok_or_else(|| CatalogError::not_found("Study", study_id))?;
        record.info.number_samples_collected = Some(count);
        Ok(())
    }

    /// Attach preprocessed data with the given `(path, filepath type)` files.
    pub async fn add_preprocessed_data(
        &self,
        study_id: DbId,
        filepaths: &[(&str, &str)],
    ) -> CatalogResult<DbId> {
        let mut state = self.state.write().await;
        if !state.studies.contains_key(&study_id) {
            return Err(CatalogError::not_found("Study", study_id));
        }
        let id = state.next_id();
        state.preprocessed.insert(
            id,
            PreprocessedData {
                id,
                study_id,
                filepaths: filepaths
                    .iter()
                    .map(|(path, kind)| Filepath {
                        filepath: path.to_string(),
                        filepath_type: kind.to_string(),
                    })
                    .collect(),
            },
        );
        Ok(id)
    }

    pub async fn set_processing_job_status(&self, job_id: &str, status: &str) {
        self.state
            .write()
            .await
            .processing_jobs
            .insert(job_id.to_string(), status.to_string());
    }

    /// Make sample and prep template writes fail with a database error
    /// until switched off again. Nothing is changed by a failed write.
    pub async fn fail_template_writes(&self, fail: bool) {
        self.state.write().await.template_writes_fail = fail;
    }

    /// Every recorded operation, oldest first.
    pub async fn journal(&self) -> Vec<CatalogOp> {
        self.state.read().await.journal.clone()
    }

    pub async fn clear_journal(&self) {
        self.state.write().await.journal.clear();
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn health_check(&self) -> CatalogResult<()> {
        Ok(())
    }

    async fn study(&self, id: DbId) -> CatalogResult<Study> {
        let mut state = self.state.write().await;
        state.journal.push(CatalogOp::ReadStudy(id));
        state.study(id)
    }

    async fn study_title_exists(&self, title: &str) -> CatalogResult<bool> {
        let state = self.state.read().await;
        Ok(state.studies.values().any(|s| s.title == title))
    }

    async fn public_study_ids(&self) -> CatalogResult<Vec<DbId>> {
        let state = self.state.read().await;
        Ok(state
            .studies
            .iter()
            .filter(|(_, s)| s.status == StudyStatus::Public)
            .map(|(id, _)| *id)
            .collect())
    }

    async fn create_study(&self, input: &CreateStudy) -> CatalogResult<Study> {
        let mut state = self.state.write().await;
        if state.studies.values().any(|s| s.title == input.title) {
            return Err(CatalogError::Duplicate(format!(
                "study title '{}' already exists",
                input.title
            )));
        }
        if !state.users.contains_key(&input.owner) {
            return Err(CatalogError::Execution(format!(
                "owner {} is not a registered user",
                input.owner
            )));
        }
        let people = [
            Some(input.info.principal_investigator_id),
            input.info.lab_person_id,
        ];
        for person in people.into_iter().flatten() {
            if !state.people.contains_key(&person) {
                return Err(CatalogError::Execution(format!(
                    "study person {person} does not exist"
                )));
            }
        }

        let id = state.next_id();
        state.studies.insert(
            id,
            StudyRecord {
                title: input.title.clone(),
                owner: input.owner.clone(),
                status: StudyStatus::Sandbox,
                info: input.info.clone(),
                efo: input.efo.clone(),
                shared_with: BTreeSet::new(),
                pmids: BTreeSet::new(),
                created_at: Utc::now(),
            },
        );
        state.journal.push(CatalogOp::CreateStudy(id));
        state.study(id)
    }

    async fn add_pmid(&self, study_id: DbId, pmid: &str) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        let record = state
            .studies
            .get_mut(&study_id)
            .ok_or_else(|| CatalogError::not_found("Study", study_id))?;
        record.pmids.insert(pmid.to_string());
        state.journal.push(CatalogOp::AddPmid(study_id, pmid.to_string()));
        Ok(())
    }

    async fn share_study(&self, study_id: DbId, email: &str) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        state.require_user(email)?;
        let record = state
            .studies
            .get_mut(&study_id)
            .ok_or_else(|| CatalogError::not_found("Study", study_id))?;
        record.shared_with.insert(email.to_string());
        state.journal.push(CatalogOp::Share(study_id, email.to_string()));
        Ok(())
    }

    async fn unshare_study(&self, study_id: DbId, email: &str) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        state.require_user(email)?;
        let record = state
            .studies
            .get_mut(&study_id)
            .ok_or_else(|| CatalogError::not_found("Study", study_id))?;
        record.shared_with.remove(email);
        state.journal.push(CatalogOp::Unshare(study_id, email.to_string()));
        Ok(())
    }

    async fn user(&self, email: &str) -> CatalogResult<User> {
        let state = self.state.read().await;
        let record = state
            .users
            .get(email)
            .ok_or_else(|| CatalogError::not_found("User", email))?;

        Ok(User {
            email: email.to_string(),
            name: record.name.clone(),
            level: record.level.clone(),
            private_studies: state
                .studies
                .iter()
                .filter(|(_, s)| s.owner == email)
                .map(|(id, _)| *id)
                .collect(),
            shared_studies: state
                .studies
                .iter()
                .filter(|(_, s)| s.shared_with.contains(email))
                .map(|(id, _)| *id)
                .collect(),
        })
    }

    async fn user_emails(&self) -> CatalogResult<Vec<String>> {
        Ok(self.state.read().await.users.keys().cloned().collect())
    }

    async fn study_person(&self, id: DbId) -> CatalogResult<StudyPerson> {
        self.state
            .read()
            .await
            .people
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("StudyPerson", id))
    }

    async fn study_people(&self) -> CatalogResult<Vec<StudyPerson>> {
        let state = self.state.read().await;
        let mut people: Vec<StudyPerson> = state.people.values().cloned().collect();
        people.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(people)
    }

    async fn create_study_person(&self, input: &NewContact) -> CatalogResult<StudyPerson> {
        let mut state = self.state.write().await;
        if state
            .people
            .values()
            .any(|p| p.name == input.name && p.affiliation == input.affiliation)
        {
            return Err(CatalogError::Duplicate(format!(
                "study person '{}' at '{}' already exists",
                input.name, input.affiliation
            )));
        }
        let id = state.next_id();
        let person = StudyPerson {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
            affiliation: input.affiliation.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
        };
        state.people.insert(id, person.clone());
        state.journal.push(CatalogOp::CreateStudyPerson(id));
        Ok(person)
    }

    async fn raw_data(&self, id: DbId) -> CatalogResult<RawData> {
        let state = self.state.read().await;
        let record = state
            .raw_data
            .get(&id)
            .ok_or_else(|| CatalogError::not_found("RawData", id))?;
        Ok(RawData {
            id,
            filetype_id: record.filetype_id,
            prep_template_ids: state
                .prep_templates
                .values()
                .filter(|p| p.raw_data_id == id)
                .map(|p| p.id)
                .collect(),
            study_ids: record.study_ids.clone(),
        })
    }

    async fn create_raw_data(&self, filetype_id: DbId, study_ids: &[DbId]) -> CatalogResult<RawData> {
        let id = {
            let mut state = self.state.write().await;
            if !state.filetypes.iter().any(|f| f.id == filetype_id) {
                return Err(CatalogError::Execution(format!(
                    "filetype {filetype_id} does not exist"
                )));
            }
            if let Some(missing) = study_ids.iter().find(|id| !state.studies.contains_key(id)) {
                return Err(CatalogError::Execution(format!("study {missing} does not exist")));
            }
            let id = state.next_id();
            state.raw_data.insert(
                id,
                RawDataRecord {
                    filetype_id,
                    study_ids: study_ids.to_vec(),
                },
            );
            state.journal.push(CatalogOp::CreateRawData(id));
            id
        };
        self.raw_data(id).await
    }

    async fn prep_template_exists(&self, id: DbId) -> CatalogResult<bool> {
        Ok(self.state.read().await.prep_templates.contains_key(&id))
    }

    async fn prep_template(&self, id: DbId) -> CatalogResult<PrepTemplate> {
        self.state
            .read()
            .await
            .prep_templates
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("PrepTemplate", id))
    }

    async fn create_prep_template(&self, input: &CreatePrepTemplate) -> CatalogResult<PrepTemplate> {
        let mut state = self.state.write().await;
        state.check_template_writes()?;
        if !state.raw_data.contains_key(&input.raw_data_id) {
            return Err(CatalogError::not_found("RawData", input.raw_data_id));
        }
        if !state.studies.contains_key(&input.study_id) {
            return Err(CatalogError::not_found("Study", input.study_id));
        }
        if !state.data_types.iter().any(|d| d.id == input.data_type_id) {
            return Err(CatalogError::Execution(format!(
                "data type {} does not exist",
                input.data_type_id
            )));
        }
        let id = state.next_id();
        let template = PrepTemplate {
            id,
            raw_data_id: input.raw_data_id,
            study_id: input.study_id,
            data_type_id: input.data_type_id,
            table: input.table.clone(),
        };
        state.prep_templates.insert(id, template.clone());
        state.journal.push(CatalogOp::CreatePrepTemplate(id));
        Ok(template)
    }

    async fn delete_prep_template(&self, id: DbId) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        if state.prep_templates.remove(&id).is_none() {
            return Err(CatalogError::not_found("PrepTemplate", id));
        }
        state.journal.push(CatalogOp::DeletePrepTemplate(id));
        Ok(())
    }

    async fn sample_template_exists(&self, study_id: DbId) -> CatalogResult<bool> {
        Ok(self.state.read().await.sample_templates.contains_key(&study_id))
    }

    async fn sample_template(&self, study_id: DbId) -> CatalogResult<SampleTemplate> {
        self.state
            .read()
            .await
            .sample_templates
            .get(&study_id)
            .map(|table| SampleTemplate {
                study_id,
                table: table.clone(),
            })
            .ok_or_else(|| CatalogError::not_found("SampleTemplate", study_id))
    }

    async fn create_sample_template(
        &self,
        study_id: DbId,
        table: &MetadataTable,
    ) -> CatalogResult<SampleTemplate> {
        let mut state = self.state.write().await;
        state.check_template_writes()?;
        if !state.studies.contains_key(&study_id) {
            return Err(CatalogError::not_found("Study", study_id));
        }
        if state.sample_templates.contains_key(&study_id) {
            return Err(CatalogError::Duplicate(format!(
                "study {study_id} already has a sample template"
            )));
        }
        state.sample_templates.insert(study_id, table.clone());
        state.journal.push(CatalogOp::CreateSampleTemplate(study_id));
        Ok(SampleTemplate {
            study_id,
            table: table.clone(),
        })
    }

    async fn delete_sample_template(&self, study_id: DbId) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        if state.sample_templates.remove(&study_id).is_none() {
            return Err(CatalogError::not_found("SampleTemplate", study_id));
        }
        state.journal.push(CatalogOp::DeleteSampleTemplate(study_id));
        Ok(())
    }

    async fn replace_sample_template(
        &self,
        study_id: DbId,
        table: &MetadataTable,
    ) -> CatalogResult<SampleTemplate> {
        // One write guard for the whole swap; every check runs before the
        // first change.
        let mut state = self.state.write().await;
        if !state.studies.contains_key(&study_id) {
            return Err(CatalogError::not_found("Study", study_id));
        }
        state.check_template_writes()?;

        let raw_data_ids: BTreeSet<DbId> = state
            .raw_data
            .iter()
            .filter(|(_, rd)| rd.study_ids.contains(&study_id))
            .map(|(id, _)| *id)
            .collect();
        let doomed: Vec<DbId> = state
            .prep_templates
            .values()
            .filter(|pt| raw_data_ids.contains(&pt.raw_data_id))
            .map(|pt| pt.id)
            .collect();

        for id in doomed {
            state.prep_templates.remove(&id);
            state.journal.push(CatalogOp::DeletePrepTemplate(id));
        }
        if state.sample_templates.remove(&study_id).is_some() {
            state.journal.push(CatalogOp::DeleteSampleTemplate(study_id));
        }
        state.sample_templates.insert(study_id, table.clone());
        state.journal.push(CatalogOp::CreateSampleTemplate(study_id));

        Ok(SampleTemplate {
            study_id,
            table: table.clone(),
        })
    }

    async fn preprocessed_data(&self, id: DbId) -> CatalogResult<PreprocessedData> {
        self.state
            .read()
            .await
            .preprocessed
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("PreprocessedData", id))
    }

    async fn filepath_types(&self) -> CatalogResult<Vec<String>> {
        Ok(self.state.read().await.filepath_types.clone())
    }

    async fn data_types(&self) -> CatalogResult<Vec<Lookup>> {
        Ok(self.state.read().await.data_types.clone())
    }

    async fn filetypes(&self) -> CatalogResult<Vec<Lookup>> {
        Ok(self.state.read().await.filetypes.clone())
    }

    async fn processing_job_status(&self, job_id: &str) -> CatalogResult<String> {
        self.state
            .read()
            .await
            .processing_jobs
            .get(job_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("ProcessingJob", job_id))
    }
}
