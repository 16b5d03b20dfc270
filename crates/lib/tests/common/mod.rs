#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Tracing setup and a mock embeddings endpoint shared by the integration tests.

use dotenvy::dotenv;
use hrchat::providers::ai::EmbeddingClient;
use serde_json::json;
use std::sync::Once;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Starts a mock embeddings API that answers every request with `vector`.
pub async fn mock_embedding_server(vector: Vec<f32>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{"object": "embedding", "index": 0, "embedding": vector}],
            "model": "text-embedding-3-small"
        })))
        .mount(&server)
        .await;
    server
}

pub fn embedding_client(server: &MockServer) -> EmbeddingClient {
    EmbeddingClient::new(
        format!("{}/v1/embeddings", server.uri()),
        "text-embedding-3-small",
        Some("test-key".to_string()),
    )
    .unwrap()
}
