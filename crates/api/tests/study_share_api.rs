//! HTTP-level tests for sharing studies.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, TestApp, ADMIN, OWNER, SHARED, STRANGER};
use qiita_db::memory::CatalogOp;
use qiita_db::Catalog;

#[tokio::test]
async fn owner_shares_study() {
    let app = TestApp::new().await;
    let study = app.create_study("To share", OWNER).await;

    let response = get_auth(
        app.router(),
        &format!("/api/v1/studies/share?study_id={}&selected={SHARED}", study.id),
        &app.token(OWNER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["users"], serde_json::json!([SHARED]));
    assert_eq!(
        json["data"]["links"],
        "<a target=\"_blank\" href=\"mailto:shared@foo.bar\">Shared</a>"
    );
    assert_eq!(app.catalog.study(study.id).await.unwrap().shared_with, vec![SHARED]);
}

#[tokio::test]
async fn share_is_applied_before_unshare() {
    let app = TestApp::new().await;
    let study = app.create_study("Swap", OWNER).await;
    app.catalog.share_study(study.id, SHARED).await.unwrap();
    app.catalog.clear_journal().await;

    let response = get_auth(
        app.router(),
        &format!(
            "/api/v1/studies/share?study_id={}&selected={STRANGER}&deselected={SHARED}",
            study.id
        ),
        &app.token(OWNER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["users"], serde_json::json!([STRANGER]));
    assert_eq!(
        json["data"]["links"],
        "<a target=\"_blank\" href=\"mailto:demo@microbio.me\">demo@microbio.me</a>"
    );

    let mutations: Vec<CatalogOp> = app
        .catalog
        .journal()
        .await
        .into_iter()
        .filter(|op| !matches!(op, CatalogOp::ReadStudy(_)))
        .collect();
    assert_eq!(
        mutations,
        vec![
            CatalogOp::Share(study.id, STRANGER.into()),
            CatalogOp::Unshare(study.id, SHARED.into()),
        ]
    );
}

#[tokio::test]
async fn no_change_returns_current_users() {
    let app = TestApp::new().await;
    let study = app.create_study("Unchanged", OWNER).await;
    app.catalog.share_study(study.id, SHARED).await.unwrap();

    let response = get_auth(
        app.router(),
        &format!("/api/v1/studies/share?study_id={}", study.id),
        &app.token(OWNER),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["users"], serde_json::json!([SHARED]));
}

#[tokio::test]
async fn non_owner_cannot_share() {
    let app = TestApp::new().await;
    let study = app.create_study("Not yours", OWNER).await;

    for email in [SHARED, ADMIN] {
        let response = get_auth(
            app.router(),
            &format!("/api/v1/studies/share?study_id={}&selected={STRANGER}", study.id),
            &app.token(email),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{email}");
        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            format!("User {email} does not own study {}", study.id)
        );
    }
    assert!(app.catalog.study(study.id).await.unwrap().shared_with.is_empty());
}

#[tokio::test]
async fn sharing_with_unknown_user_returns_404() {
    let app = TestApp::new().await;
    let study = app.create_study("Unknown user", OWNER).await;

    let response = get_auth(
        app.router(),
        &format!("/api/v1/studies/share?study_id={}&selected=nobody@foo.bar", study.id),
        &app.token(OWNER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sharing_unknown_study_returns_404() {
    let app = TestApp::new().await;

    let response = get_auth(
        app.router(),
        &format!("/api/v1/studies/share?study_id=4242&selected={SHARED}"),
        &app.token(OWNER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
