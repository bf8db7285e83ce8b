//! Integration tests for the PostgreSQL catalog.
//!
//! Exercises the repository layer against a real database:
//! - Study creation and link table resolution
//! - Sharing and unsharing
//! - Template storage and deletion
//! - Constraint violation classification

use assert_matches::assert_matches;
use qiita_core::contact::NewContact;
use qiita_core::study::StudyStatus;
use qiita_core::template::parse_template;
use qiita_db::models::study::{CreateStudy, StudyInfo};
use qiita_db::models::template::CreatePrepTemplate;
use qiita_db::{Catalog, CatalogError, PgCatalog};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_user(pool: &PgPool, email: &str, level: &str) {
    sqlx::query("INSERT INTO users (email, level) VALUES ($1, $2)")
        .bind(email)
        .bind(level)
        .execute(pool)
        .await
        .unwrap();
}

fn new_contact(name: &str) -> NewContact {
    NewContact {
        name: name.to_string(),
        email: "pi@example.org".to_string(),
        affiliation: "Example University".to_string(),
        phone: None,
        address: Some("1 Lab Way".to_string()),
    }
}

fn new_study(owner: &str, title: &str, pi: i64) -> CreateStudy {
    CreateStudy {
        owner: owner.to_string(),
        title: title.to_string(),
        efo: vec![1],
        info: StudyInfo {
            principal_investigator_id: pi,
            lab_person_id: None,
            metadata_complete: false,
            number_samples_collected: None,
            mixs_compliant: true,
            timeseries_type_id: 1,
            portal_type_id: 1,
            study_alias: "alias".to_string(),
            study_abstract: "abstract".to_string(),
            study_description: "description".to_string(),
        },
    }
}

async fn seeded(pool: PgPool) -> (PgCatalog, i64) {
    insert_user(&pool, "owner@foo.bar", "user").await;
    insert_user(&pool, "friend@foo.bar", "user").await;
    let catalog = PgCatalog::new(pool);
    let pi = catalog.create_study_person(&new_contact("Dr. PI")).await.unwrap();
    let study = catalog
        .create_study(&new_study("owner@foo.bar", "Soil study", pi.id))
        .await
        .unwrap();
    (catalog, study.id)
}

// ---------------------------------------------------------------------------
// Studies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn health_check_succeeds(pool: PgPool) {
    qiita_db::health_check(&pool).await.unwrap();
    PgCatalog::new(pool).health_check().await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn create_study_resolves_owner_and_defaults(pool: PgPool) {
    let (catalog, study_id) = seeded(pool).await;

    let study = catalog.study(study_id).await.unwrap();
    assert_eq!(study.title, "Soil study");
    assert_eq!(study.owner, "owner@foo.bar");
    assert_eq!(study.status, StudyStatus::Sandbox);
    assert_eq!(study.efo, vec![1]);
    assert!(study.shared_with.is_empty());

    let owner = catalog.user("owner@foo.bar").await.unwrap();
    assert_eq!(owner.private_studies, vec![study_id]);
    assert!(catalog.study_title_exists("Soil study").await.unwrap());
    assert!(!catalog.study_title_exists("Other").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_title_is_classified_as_duplicate(pool: PgPool) {
    let (catalog, study_id) = seeded(pool).await;
    let pi = catalog.study(study_id).await.unwrap().info.principal_investigator_id;

    let err = catalog
        .create_study(&new_study("owner@foo.bar", "Soil study", pi))
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::Duplicate(_));
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_study_is_not_found(pool: PgPool) {
    let catalog = PgCatalog::new(pool);
    assert_matches!(
        catalog.study(4242).await,
        Err(CatalogError::NotFound { entity: "Study", .. })
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn public_study_ids_only_lists_public(pool: PgPool) {
    let (catalog, study_id) = seeded(pool.clone()).await;
    assert!(catalog.public_study_ids().await.unwrap().is_empty());

    sqlx::query("UPDATE studies SET status = 'public' WHERE id = $1")
        .bind(study_id)
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(catalog.public_study_ids().await.unwrap(), vec![study_id]);
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn share_and_unshare_round_trip(pool: PgPool) {
    let (catalog, study_id) = seeded(pool).await;

    catalog.share_study(study_id, "friend@foo.bar").await.unwrap();
    catalog.share_study(study_id, "friend@foo.bar").await.unwrap();
    assert_eq!(
        catalog.study(study_id).await.unwrap().shared_with,
        vec!["friend@foo.bar".to_string()]
    );
    assert_eq!(
        catalog.user("friend@foo.bar").await.unwrap().shared_studies,
        vec![study_id]
    );

    catalog.unshare_study(study_id, "friend@foo.bar").await.unwrap();
    assert!(catalog.study(study_id).await.unwrap().shared_with.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn sharing_with_unknown_user_fails(pool: PgPool) {
    let (catalog, study_id) = seeded(pool).await;
    assert_matches!(
        catalog.share_study(study_id, "ghost@foo.bar").await,
        Err(CatalogError::NotFound { entity: "User", .. })
    );
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn sample_template_is_stored_and_deleted(pool: PgPool) {
    let (catalog, study_id) = seeded(pool).await;
    let table = parse_template("sample_name\tph\tcountry\nS1\t7.1\tUSA\nS2\t6.8\tPeru\n").unwrap();

    assert!(!catalog.sample_template_exists(study_id).await.unwrap());
    catalog.create_sample_template(study_id, &table).await.unwrap();
    assert!(catalog.sample_template_exists(study_id).await.unwrap());

    let stored = catalog.sample_template(study_id).await.unwrap();
    assert_eq!(stored.table, table);

    assert_matches!(
        catalog.create_sample_template(study_id, &table).await,
        Err(CatalogError::Duplicate(_))
    );

    catalog.delete_sample_template(study_id).await.unwrap();
    assert_matches!(
        catalog.delete_sample_template(study_id).await,
        Err(CatalogError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn prep_template_links_to_raw_data(pool: PgPool) {
    let (catalog, study_id) = seeded(pool).await;
    let table = parse_template("sample_name\tbarcode\nS1\tAAAC\n").unwrap();

    let raw = catalog.create_raw_data(3, &[study_id]).await.unwrap();
    assert_eq!(raw.study_ids, vec![study_id]);

    let prep = catalog
        .create_prep_template(&CreatePrepTemplate {
            raw_data_id: raw.id,
            study_id,
            data_type_id: 1,
            table,
        })
        .await
        .unwrap();

    let raw = catalog.raw_data(raw.id).await.unwrap();
    assert_eq!(raw.prep_template_ids, vec![prep.id]);
    assert_eq!(catalog.study(study_id).await.unwrap().raw_data_ids, vec![raw.id]);

    catalog.delete_prep_template(prep.id).await.unwrap();
    assert!(!catalog.prep_template_exists(prep.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_data_type_is_an_execution_error(pool: PgPool) {
    let (catalog, study_id) = seeded(pool).await;
    let raw = catalog.create_raw_data(1, &[study_id]).await.unwrap();

    let err = catalog
        .create_prep_template(&CreatePrepTemplate {
            raw_data_id: raw.id,
            study_id,
            data_type_id: 999,
            table: Default::default(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::Execution(_));
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn lookup_tables_are_seeded(pool: PgPool) {
    let catalog = PgCatalog::new(pool);

    let filepath_types = catalog.filepath_types().await.unwrap();
    assert!(filepath_types.contains(&"preprocessed_demux".to_string()));
    assert!(filepath_types.iter().any(|t| t.starts_with("raw_")));

    let data_types = catalog.data_types().await.unwrap();
    assert!(data_types.iter().any(|d| d.name == "16S"));
    assert!(!catalog.filetypes().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn processing_job_status_is_read(pool: PgPool) {
    let id = uuid::Uuid::new_v4();
    sqlx::query("INSERT INTO processing_jobs (id, command, status) VALUES ($1, 'prep', 'running')")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let catalog = PgCatalog::new(pool);
    assert_eq!(catalog.processing_job_status(&id.to_string()).await.unwrap(), "running");
    assert_matches!(
        catalog.processing_job_status("not-a-uuid").await,
        Err(CatalogError::NotFound { .. })
    );
}
