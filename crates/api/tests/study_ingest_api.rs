//! HTTP-level tests for the upload actions of the study description page.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, post_json_auth, TestApp, OWNER, PREP_TEMPLATE, SAMPLE_TEMPLATE, STRANGER,
};
use qiita_core::template::parse_template;
use qiita_db::memory::CatalogOp;
use qiita_db::models::template::CreatePrepTemplate;
use qiita_db::Catalog;
use serde_json::json;

/// Journal entries other than study reads.
async fn mutations(app: &TestApp) -> Vec<CatalogOp> {
    app.catalog
        .journal()
        .await
        .into_iter()
        .filter(|op| !matches!(op, CatalogOp::ReadStudy(_)))
        .collect()
}

// ---------------------------------------------------------------------------
// Sample template
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sample_template_is_ingested_and_upload_removed() {
    let app = TestApp::new().await;
    let study = app.create_study("Ingest", OWNER).await;
    let path = app.upload(study.id, "sample.txt", SAMPLE_TEMPLATE);

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"sample_template": "sample.txt"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["msg"], "The sample template sample.txt has been added");
    assert_eq!(json["data"]["sample_template_exists"], true);
    assert_eq!(json["data"]["files"], json!([]));
    assert!(!path.exists());

    let template = app.catalog.sample_template(study.id).await.unwrap();
    assert_eq!(template.table.len(), 3);
    assert_eq!(mutations(&app).await, vec![CatalogOp::CreateSampleTemplate(study.id)]);
}

#[tokio::test]
async fn replacing_sample_template_deletes_prep_templates_first() {
    let app = TestApp::new().await;
    let study = app.create_study("Replace", OWNER).await;

    let raw = app.catalog.create_raw_data(1, &[study.id]).await.unwrap();
    let prep = app
        .catalog
        .create_prep_template(&CreatePrepTemplate {
            raw_data_id: raw.id,
            study_id: study.id,
            data_type_id: 1,
            table: parse_template(PREP_TEMPLATE).unwrap(),
        })
        .await
        .unwrap();
    app.catalog
        .create_sample_template(study.id, &parse_template(SAMPLE_TEMPLATE).unwrap())
        .await
        .unwrap();
    app.catalog.clear_journal().await;

    app.upload(study.id, "new_sample.txt", "sample_name\tph\nS9\t5.5\n");
    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"sample_template": "new_sample.txt"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        mutations(&app).await,
        vec![
            CatalogOp::DeletePrepTemplate(prep.id),
            CatalogOp::DeleteSampleTemplate(study.id),
            CatalogOp::CreateSampleTemplate(study.id),
        ]
    );
    let template = app.catalog.sample_template(study.id).await.unwrap();
    assert_eq!(template.table.sample_names().collect::<Vec<_>>(), vec!["S9"]);
}

#[tokio::test]
async fn unparsable_sample_template_is_reported_and_kept() {
    let app = TestApp::new().await;
    let study = app.create_study("Bad upload", OWNER).await;
    app.catalog
        .create_sample_template(study.id, &parse_template(SAMPLE_TEMPLATE).unwrap())
        .await
        .unwrap();
    app.catalog.clear_journal().await;
    let path = app.upload(study.id, "bad.txt", "not_a_sample_column\tph\nS1\t7\n");

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"sample_template": "bad.txt"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let msg = json["data"]["msg"].as_str().unwrap();
    assert!(
        msg.starts_with("An error occurred parsing the sample template: bad.txt: "),
        "unexpected message: {msg}"
    );
    assert!(path.exists());
    assert!(mutations(&app).await.is_empty());
    assert!(app.catalog.sample_template_exists(study.id).await.unwrap());
}

#[tokio::test]
async fn missing_upload_returns_400() {
    let app = TestApp::new().await;
    let study = app.create_study("Nothing uploaded", OWNER).await;

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"sample_template": "ghost.txt"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("This file doesn't exist: "));
}

#[tokio::test]
async fn upload_outside_study_directory_is_rejected() {
    let app = TestApp::new().await;
    let study = app.create_study("Traversal", OWNER).await;
    app.scratch_file("outside.txt", SAMPLE_TEMPLATE);

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"sample_template": "../outside.txt"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(mutations(&app).await.is_empty());
}

// ---------------------------------------------------------------------------
// Raw data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_raw_data_is_linked_to_study() {
    let app = TestApp::new().await;
    let study = app.create_study("Raw data", OWNER).await;

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"filetype": 3}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["msg"], "");
    let raw = json["data"]["available_raw_data"].as_array().unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0]["filetype_id"], 3);
}

#[tokio::test]
async fn unknown_filetype_is_reported() {
    let app = TestApp::new().await;
    let study = app.create_study("Bad filetype", OWNER).await;

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"filetype": 999}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["msg"]
        .as_str()
        .unwrap()
        .starts_with("An error occurred creating a new raw data object: "));
    assert!(mutations(&app).await.is_empty());
}

#[tokio::test]
async fn new_and_previous_raw_data_are_exclusive() {
    let app = TestApp::new().await;
    let study = app.create_study("Both", OWNER).await;

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"filetype": 1, "previous_raw_data": 1}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["msg"],
        "You can not specify both a new raw data and a previously used one"
    );
    assert!(mutations(&app).await.is_empty());
}

#[tokio::test]
async fn previous_raw_data_is_not_attached_yet() {
    let app = TestApp::new().await;
    let study = app.create_study("Previous", OWNER).await;

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"previous_raw_data": 1}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["msg"],
        "adding other study's raw data is being implemented"
    );
}

// ---------------------------------------------------------------------------
// Prep template
// ---------------------------------------------------------------------------

#[tokio::test]
async fn prep_template_is_added_to_raw_data() {
    let app = TestApp::new().await;
    let study = app.create_study("Prep", OWNER).await;
    let raw = app.catalog.create_raw_data(1, &[study.id]).await.unwrap();
    app.catalog.clear_journal().await;
    app.upload(study.id, "prep.txt", PREP_TEMPLATE);

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"add_prep_template": "prep.txt", "raw_data_id": raw.id, "data_type_id": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["msg"], "Your prep template was added");
    assert_eq!(json["data"]["tab_to_display"], raw.id.to_string());

    let templates = json["data"]["available_prep_templates"][raw.id.to_string()]
        .as_array()
        .unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0]["data_type_id"], 2);

    let ops = mutations(&app).await;
    assert_eq!(ops.len(), 1);
    assert!(matches!(ops[0], CatalogOp::CreatePrepTemplate(_)));
}

#[tokio::test]
async fn prep_template_with_unknown_data_type_is_reported() {
    let app = TestApp::new().await;
    let study = app.create_study("Prep error", OWNER).await;
    let raw = app.catalog.create_raw_data(1, &[study.id]).await.unwrap();
    app.catalog.clear_journal().await;
    app.upload(study.id, "prep.txt", PREP_TEMPLATE);

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"add_prep_template": "prep.txt", "raw_data_id": raw.id, "data_type_id": 77}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["msg"]
        .as_str()
        .unwrap()
        .starts_with("An error occurred parsing the prep template: prep.txt: "));
    assert_eq!(json["data"]["tab_to_display"], raw.id.to_string());
    assert!(mutations(&app).await.is_empty());
}

#[tokio::test]
async fn prep_template_for_another_studys_raw_data_is_rejected() {
    let app = TestApp::new().await;
    let theirs = app.create_study("Owner study", OWNER).await;
    let raw = app.catalog.create_raw_data(1, &[theirs.id]).await.unwrap();
    let mine = app.create_study("Stranger study", STRANGER).await;
    app.upload(mine.id, "prep.txt", PREP_TEMPLATE);

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", mine.id),
        &app.token(STRANGER),
        json!({"add_prep_template": "prep.txt", "raw_data_id": raw.id, "data_type_id": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        format!("Raw data {} does not belong to study {}", raw.id, mine.id)
    );
    assert!(mutations(&app).await.is_empty());
    assert!(app.catalog.raw_data(raw.id).await.unwrap().prep_template_ids.is_empty());
}

#[tokio::test]
async fn failed_replace_keeps_previous_templates_and_upload() {
    let app = TestApp::new().await;
    let study = app.create_study("Outage", OWNER).await;
    let raw = app.catalog.create_raw_data(1, &[study.id]).await.unwrap();
    let prep = app
        .catalog
        .create_prep_template(&CreatePrepTemplate {
            raw_data_id: raw.id,
            study_id: study.id,
            data_type_id: 1,
            table: parse_template(PREP_TEMPLATE).unwrap(),
        })
        .await
        .unwrap();
    app.catalog
        .create_sample_template(study.id, &parse_template(SAMPLE_TEMPLATE).unwrap())
        .await
        .unwrap();
    app.catalog.clear_journal().await;
    let path = app.upload(study.id, "new_sample.txt", "sample_name\tph\nS9\t5.5\n");

    app.catalog.fail_template_writes(true).await;
    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({"sample_template": "new_sample.txt"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "An internal error occurred");

    assert!(mutations(&app).await.is_empty());
    assert!(app.catalog.prep_template_exists(prep.id).await.unwrap());
    let template = app.catalog.sample_template(study.id).await.unwrap();
    assert_eq!(template.table.len(), 3);
    assert!(path.exists());
}

// ---------------------------------------------------------------------------
// Other requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_action_reports_usage_error() {
    let app = TestApp::new().await;
    let study = app.create_study("Empty", OWNER).await;

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(OWNER),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["data"]["msg"],
        "Error, did you select a valid uploaded file or are passing the correct parameters?"
    );
}

#[tokio::test]
async fn stranger_cannot_post_actions() {
    let app = TestApp::new().await;
    let study = app.create_study("Locked", OWNER).await;
    app.upload(study.id, "sample.txt", SAMPLE_TEMPLATE);

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/studies/{}", study.id),
        &app.token(STRANGER),
        json!({"sample_template": "sample.txt"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(mutations(&app).await.is_empty());
}
