//! # Chat Endpoint Tests
//!
//! Each test programs the mock chat completions endpoint per pipeline task and
//! checks the answer the server returns.

mod common;

use anyhow::Result;
use common::{markers, TestApp, QUERY_VECTOR};
use hrchat::{prompts::tasks::REJECT_ANSWER, Document};
use httpmock::prelude::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_chat_rejects_non_hr_question() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_chat(markers::REFINE, "오늘 점심 메뉴 추천");
    app.mock_chat(markers::HR, r#"{"is_hr_question": false}"#);
    let route_mock = app.mock_chat(markers::ROUTE, r#"{"route": "rag"}"#);

    let response = app.post_chat(json!({ "question": "오늘 점심 뭐 먹지?" })).await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body["result"]["answer"], REJECT_ANSWER);
    assert_eq!(body["result"]["answer_type"], "reject");
    assert_eq!(
        body["debug"]["trace"],
        json!(["refine_question", "update_hr_status", "generate_reject_answer"])
    );
    assert_eq!(body["debug"]["is_hr_question"], false);
    route_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_chat_hands_off_to_department() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_chat(markers::REFINE, "법인카드 한도 증액 문의");
    app.mock_chat(markers::HR, r#"{"is_hr_question": true}"#);
    app.mock_chat(
        markers::ROUTE,
        r#"```json
{"route": "department", "department": "재무"}
```"#,
    );

    let response = app
        .post_chat(json!({ "question": "법인카드 한도를 올리고 싶어요" }))
        .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    let result = &body["result"];
    assert_eq!(result["answer_type"], "department_contact");
    assert_eq!(result["department"]["name"], "재무");
    let answer = result["answer"].as_str().unwrap();
    assert!(answer.contains("**재무팀**"));
    assert!(answer.contains("fi@gaida.play.com"));
    assert!(answer.contains("#ask-fi"));
    assert!(app.store.queries().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_chat_answers_from_documents() -> Result<()> {
    let app = TestApp::spawn_with_documents(vec![
        (
            QUERY_VECTOR.to_vec(),
            Document::new("## 연차\n입사 1년 후 연차 15일이 부여됩니다.")
                .with_source("03_휴가정책_v1.0.md"),
        ),
        (
            vec![0.0, 1.0, 0.0],
            Document::new("## 복지포인트\n연간 100만원의 복지포인트가 지급됩니다.")
                .with_source("04_복지정책_v1.0.md"),
        ),
    ])
    .await?;
    app.mock_chat(markers::REFINE, "연차 휴가 일수");
    app.mock_chat(markers::HR, r#"{"is_hr_question": true}"#);
    app.mock_chat(markers::ROUTE, r#"{"route": "rag"}"#);
    app.mock_chat(markers::RERANK, "0.9");
    let answer_mock = app.mock_chat(markers::ANSWER, "입사 1년 후 연차 15일이 부여됩니다.");
    app.mock_chat(markers::VERIFY, "일치함");

    let response = app
        .post_chat(json!({ "question": "연차 휴가는 며칠인가요?" }))
        .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    let result = &body["result"];
    assert_eq!(result["answer_type"], "rag_answer");
    assert_eq!(result["answer"], "입사 1년 후 연차 15일이 부여됩니다.");
    assert_eq!(result["verification"], "일치함");
    assert_eq!(
        result["sources"],
        json!(["03_휴가정책_v1.0.md", "04_복지정책_v1.0.md"])
    );
    assert_eq!(
        body["debug"]["trace"],
        json!([
            "refine_question",
            "update_hr_status",
            "update_rag_status",
            "retrieve",
            "rerank",
            "generate_rag_answer",
            "verify_rag_answer"
        ])
    );
    answer_mock.assert_hits(1);

    let queries = app.store.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].1, 3);
    Ok(())
}

#[tokio::test]
async fn test_chat_continues_conversation_from_messages() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_chat(markers::REFINE, "노트북 교체 문의");
    app.mock_chat(markers::HR, r#"{"is_hr_question": true}"#);
    app.mock_chat(markers::ROUTE, r#"{"route": "department", "department": "인프라"}"#);

    let response = app
        .post_chat(json!({
            "messages": [
                {"role": "user", "content": "안녕하세요"},
                {"role": "assistant", "content": "무엇을 도와드릴까요?"},
                {"role": "human", "content": "노트북을 교체하고 싶어요"}
            ]
        }))
        .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body["debug"]["user_question"], "노트북을 교체하고 싶어요");
    assert_eq!(body["result"]["department"]["email"], "in@gaida.play.com");
    Ok(())
}

#[tokio::test]
async fn test_chat_omits_debug_by_default() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_chat(markers::REFINE, "invalid_input");

    let response = app
        .client
        .post(format!("{}/chat", app.address))
        .json(&json!({ "question": "What is the leave policy?" }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert!(body.get("debug").is_none());
    assert_eq!(body["result"]["answer"], REJECT_ANSWER);
    Ok(())
}

#[tokio::test]
async fn test_chat_reports_provider_failure() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    });

    let response = app.post_chat(json!({ "question": "연차는 며칠인가요?" })).await?;
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await?;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("refine_question"), "unexpected error: {error}");
    assert!(error.contains("upstream exploded"));
    Ok(())
}
