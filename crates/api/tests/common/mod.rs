#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use qiita_core::contact::NewContact;
use qiita_core::levels::{LEVEL_ADMIN, LEVEL_USER};
use qiita_core::types::DbId;
use qiita_db::models::study::{CreateStudy, Study, StudyInfo};
use qiita_db::{Catalog, MemoryCatalog};
use qiita_jobs::{MemoryJobStore, QueueDispatcher};
use tempfile::TempDir;
use tower::ServiceExt;

use qiita_api::auth::jwt::{issue_session_token, JwtConfig};
use qiita_api::config::ServerConfig;
use qiita_api::router::build_app_router;
use qiita_api::state::AppState;

pub const OWNER: &str = "test@foo.bar";
pub const SHARED: &str = "shared@foo.bar";
pub const ADMIN: &str = "admin@foo.bar";
pub const STRANGER: &str = "demo@microbio.me";

/// Build a test `ServerConfig` with safe defaults, reading uploads from
/// `upload_dir`.
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir,
        redis_url: "redis://127.0.0.1:6379".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            issuer: None,
            session_ttl_mins: 60,
        },
    }
}

/// The application wired to in-memory collaborators the test can inspect.
pub struct TestApp {
    pub catalog: Arc<MemoryCatalog>,
    pub job_store: Arc<MemoryJobStore>,
    pub config: ServerConfig,
    /// Contact seeded as the principal investigator of test studies.
    pub pi_id: DbId,
    _uploads: TempDir,
}

impl TestApp {
    /// An app with one user per role and one study person. The journal is
    /// cleared after seeding.
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let catalog = Arc::new(MemoryCatalog::new());

        catalog.add_user(OWNER, Some("Dude"), LEVEL_USER).await;
        catalog.add_user(SHARED, Some("Shared"), LEVEL_USER).await;
        catalog.add_user(ADMIN, Some("Admin"), LEVEL_ADMIN).await;
        catalog.add_user(STRANGER, None, LEVEL_USER).await;

        let pi = catalog
            .create_study_person(&NewContact {
                name: "PIDude".into(),
                email: "PI_dude@foo.bar".into(),
                affiliation: "Wash U".into(),
                phone: None,
                address: Some("123 PI address".into()),
            })
            .await
            .unwrap();
        catalog.clear_journal().await;

        Self {
            catalog,
            job_store: Arc::new(MemoryJobStore::new()),
            config: test_config(uploads.path().to_path_buf()),
            pi_id: pi.id,
            _uploads: uploads,
        }
    }

    /// A fresh router over the shared state.
    ///
    /// `oneshot` consumes the router, so build one per request.
    pub fn router(&self) -> Router {
        let state = AppState {
            catalog: self.catalog.clone(),
            config: Arc::new(self.config.clone()),
            job_store: self.job_store.clone(),
            dispatcher: Arc::new(QueueDispatcher::new(self.job_store.clone())),
        };
        build_app_router(state, &self.config)
    }

    pub fn token(&self, email: &str) -> String {
        let level = if email == ADMIN { LEVEL_ADMIN } else { LEVEL_USER };
        issue_session_token(email, level, &self.config.jwt).unwrap()
    }

    /// Create a sandbox study owned by `owner` and clear the journal.
    pub async fn create_study(&self, title: &str, owner: &str) -> Study {
        let study = self
            .catalog
            .create_study(&CreateStudy {
                owner: owner.to_string(),
                title: title.to_string(),
                efo: vec![1],
                info: StudyInfo {
                    principal_investigator_id: self.pi_id,
                    lab_person_id: None,
                    metadata_complete: true,
                    number_samples_collected: None,
                    mixs_compliant: true,
                    timeseries_type_id: 1,
                    portal_type_id: 3,
                    study_alias: "alias".into(),
                    study_abstract: "abstract".into(),
                    study_description: "description".into(),
                },
            })
            .await
            .unwrap();
        self.catalog.clear_journal().await;
        study
    }

    /// Place a file in the upload directory of `study_id`.
    pub fn upload(&self, study_id: DbId, name: &str, content: &str) -> PathBuf {
        let dir = self.config.upload_dir.join(study_id.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write a file outside any study upload directory.
    pub fn scratch_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.config.upload_dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

pub const SAMPLE_TEMPLATE: &str = "sample_name\tcollection_timestamp\tcountry\tph\n\
S1\t2014-05-29 12:24:51\tUSA\t7.1\n\
S2\t2014-05-29 12:24:51\tUSA\t6.8\n\
S3\t2014-05-29 12:24:51\tPeru\t7.0\n";

pub const PREP_TEMPLATE: &str = "sample_name\tbarcode\tlinkerprimersequence\n\
S1\tAGCTAGCT\tGTGCCAGCMGCCGCGGTAA\n\
S2\tTTGCAGCA\tGTGCCAGCMGCCGCGGTAA\n";

/// Send a GET request without credentials.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_vec(&json).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
