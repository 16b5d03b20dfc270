//! # Ingest Endpoint Tests

mod common;

use anyhow::Result;
use common::TestApp;
use hrchat::Document;
use hrchat_server::state::{build_app_state_with_store, run_startup_ingestion};
use hrchat_test_utils::MockVectorStore;
use serde_json::{json, Value};
use std::{fs, sync::Arc};
use tempfile::tempdir;

#[tokio::test]
async fn test_ingest_uploads_documents() -> Result<()> {
    let app = TestApp::spawn().await?;
    let dir = tempdir()?;
    let path = dir.path().join("03_휴가정책_v1.0.md");
    fs::write(&path, "## 연차\n입사 1년 후 연차 15일이 부여됩니다.\n")?;

    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .json(&json!({ "paths": [path.to_str().unwrap()] }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    let result = &body["result"];
    assert_eq!(result["documents_added"], 1);
    assert_eq!(result["skipped"], false);
    assert_eq!(result["sources"], json!([path.to_str().unwrap()]));

    let records = app.store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].document.source(), "03_휴가정책_v1.0.md");
    assert_eq!(records[0].document.metadata.main_category.as_deref(), Some("연차"));
    Ok(())
}

#[tokio::test]
async fn test_ingest_skips_populated_index_unless_recreated() -> Result<()> {
    let app = TestApp::spawn_with_documents(vec![(
        vec![1.0, 0.0, 0.0],
        Document::new("기존 문서").with_source("old.md"),
    )])
    .await?;
    let dir = tempdir()?;
    let path = dir.path().join("04_복지정책_v1.0.md");
    fs::write(&path, "## 복지포인트\n연간 100만원이 지급됩니다.\n")?;
    let paths = json!([path.to_str().unwrap()]);

    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .json(&json!({ "paths": paths }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["result"]["skipped"], true);
    assert_eq!(app.store.records()[0].document.page_content, "기존 문서");

    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .json(&json!({ "paths": paths, "recreate": true }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["result"]["deleted_existing"], true);
    assert_eq!(body["result"]["documents_added"], 1);
    assert_eq!(app.store.delete_count(), 1);

    let records = app.store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].document.source(), "04_복지정책_v1.0.md");
    Ok(())
}

#[tokio::test]
async fn test_ingest_missing_sources_is_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .json(&json!({ "paths": ["/nonexistent/정책.md"] }))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    assert!(app.store.records().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_building_state_does_not_ingest_until_startup_step() -> Result<()> {
    let app = TestApp::spawn().await?;
    let dir = tempdir()?;
    let path = dir.path().join("03_휴가정책_v1.0.md");
    fs::write(&path, "## 연차\n입사 1년 후 연차 15일이 부여됩니다.\n")?;

    let mut config = (*app.app_state.config).clone();
    config.documents.paths = vec![path.to_string_lossy().into_owned()];
    config.documents.ingest_on_startup = true;
    let store = MockVectorStore::new();

    let state = build_app_state_with_store(config, Arc::new(store.clone())).await?;
    assert!(store.records().is_empty());

    run_startup_ingestion(&state).await;
    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].document.source(), "03_휴가정책_v1.0.md");

    // A second startup leaves the populated index alone.
    run_startup_ingestion(&state).await;
    assert_eq!(store.records().len(), 1);
    assert_eq!(store.delete_count(), 0);
    Ok(())
}
