//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port. Chat completions and
//! embeddings are served by an `httpmock::MockServer`, and the vector index is
//! an in-memory `MockVectorStore`.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use hrchat::Document;
use hrchat_server::{config, router, state::build_app_state_with_store, state::AppState};
use hrchat_test_utils::MockVectorStore;
use httpmock::{prelude::*, Mock, MockServer};
use reqwest::Client;
use serde_json::json;
use std::{fs::File, io::Write, sync::Arc};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// The vector every embedding request is answered with.
pub const QUERY_VECTOR: [f32; 3] = [1.0, 0.0, 0.0];

/// System prompt fragments that identify each pipeline task in a request body.
pub mod markers {
    pub const REFINE: &str = "전처리 노드";
    pub const HR: &str = "HR 관련인지 판별";
    pub const ROUTE: &str = "질문 분류 전문가";
    pub const RERANK: &str = "관련도를 평가";
    pub const ANSWER: &str = "친절한 HR 정책 안내 챗봇";
    pub const VERIFY: &str = "검증하는 AI 평가자";
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub store: MockVectorStore,
    pub app_state: AppState,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server over an empty vector index.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_documents(Vec::new()).await
    }

    /// Spawns the server over an index pre-loaded with `documents`.
    pub async fn spawn_with_documents(documents: Vec<(Vec<f32>, Document)>) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        mock_server.mock(|when, then| {
            when.method(POST).path("/v1/embeddings");
            then.status(200).json_body(json!({
                "object": "list",
                "data": [{"object": "embedding", "index": 0, "embedding": QUERY_VECTOR}],
                "model": "mock-embedding-model"
            }));
        });

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let chat_url = mock_server.url("/v1/chat/completions");
        let config_content = format!(
            r#"
port: 0
providers:
  gen:
    provider: "local"
    api_url: "{chat_url}"
    model_name: "mock-gen-model"
  router1:
    provider: "local"
    api_url: "{chat_url}"
    model_name: "mock-router1-model"
  router2:
    provider: "local"
    api_url: "{chat_url}"
    model_name: "mock-router2-model"
embedding:
  api_url: "{}"
  model_name: "mock-embedding-model"
  dimension: 3
"#,
            mock_server.url("/v1/embeddings"),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(config_path.to_str())?;
        let store = MockVectorStore::with_documents(documents);
        let app_state = build_app_state_with_store(config, Arc::new(store.clone())).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = format!("http://{}", listener.local_addr()?);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let app = router::create_router(app_state.clone());
        let server_handle = tokio::spawn(async move {
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            store,
            app_state,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Answers every chat completion whose request body contains `marker` with `reply`.
    pub fn mock_chat(&self, marker: &str, reply: &str) -> Mock<'_> {
        self.mock_server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains(marker);
            then.status(200).json_body(json!({
                "choices": [{"message": {"role": "assistant", "content": reply}}]
            }));
        })
    }

    pub async fn post_chat(&self, body: serde_json::Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/chat?debug=true", self.address))
            .json(&body)
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
