//! # General Endpoint Tests

mod common;

use anyhow::Result;
use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn test_root_and_health() -> Result<()> {
    let app = TestApp::spawn().await?;

    let root = app.client.get(format!("{}/", app.address)).send().await?;
    assert!(root.status().is_success());
    assert_eq!(root.text().await?, "hrchat server is running.");

    let health = app.client.get(format!("{}/health", app.address)).send().await?;
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn test_departments_lists_default_directory() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .get(format!("{}/departments", app.address))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: Vec<Value> = response.json().await?;
    let names: Vec<&str> = body.iter().filter_map(|d| d["name"].as_str()).collect();
    assert_eq!(names, vec!["재무", "총무", "인프라", "보안", "인사"]);
    assert_eq!(body[4]["email"], "hr@gaida.play.com");
    assert_eq!(body[4]["slack"], "#ask-hr");
    Ok(())
}

#[tokio::test]
async fn test_chat_rejects_empty_question() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.post_chat(json!({ "question": "   " })).await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert!(body["error"].as_str().unwrap().contains("question"));

    let response = app
        .post_chat(json!({ "messages": [{"role": "assistant", "content": "안녕하세요"}] }))
        .await?;
    assert_eq!(response.status(), 400);
    Ok(())
}
