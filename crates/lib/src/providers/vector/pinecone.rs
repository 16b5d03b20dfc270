//! # Pinecone Vector Store
//!
//! A thin REST client for a Pinecone serverless index. The control plane is
//! used to find or create the index and resolve its data-plane host; queries,
//! upserts, statistics and deletes go to that host.

use crate::{
    constants::{DEFAULT_INDEX_NAME, DEFAULT_PINECONE_CONTROL_URL, UPSERT_BATCH_SIZE},
    errors::PromptError,
    providers::vector::VectorStore,
    types::{Document, DocumentMetadata, IndexStats, ScoredDocument, VectorRecord},
};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

const API_VERSION: &str = "2024-07";
const READINESS_ATTEMPTS: usize = 30;

/// Settings for connecting to a Pinecone project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PineconeConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_index_name")]
    pub index_name: String,
    #[serde(default = "default_control_url")]
    pub control_url: String,
    #[serde(default = "default_cloud")]
    pub cloud: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

fn default_index_name() -> String {
    DEFAULT_INDEX_NAME.to_string()
}
fn default_control_url() -> String {
    DEFAULT_PINECONE_CONTROL_URL.to_string()
}
fn default_cloud() -> String {
    "aws".to_string()
}
fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            index_name: default_index_name(),
            control_url: default_control_url(),
            cloud: default_cloud(),
            region: default_region(),
            namespace: None,
        }
    }
}

// --- Control plane structures ---

#[derive(Deserialize, Debug)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Deserialize, Debug, Clone)]
struct IndexDescription {
    name: String,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    status: Option<IndexStatus>,
}

#[derive(Deserialize, Debug, Clone)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: ServerlessSpec<'a>,
}

#[derive(Serialize)]
struct ServerlessSpec<'a> {
    serverless: CloudRegion<'a>,
}

#[derive(Serialize)]
struct CloudRegion<'a> {
    cloud: &'a str,
    region: &'a str,
}

// --- Data plane structures ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize, Debug)]
struct QueryMatch {
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
    metadata: Map<String, Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    total_vector_count: u64,
    #[serde(default)]
    dimension: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    delete_all: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

// --- Client ---

/// A connected Pinecone index.
#[derive(Clone)]
pub struct PineconeClient {
    client: ReqwestClient,
    api_key: String,
    config: PineconeConfig,
    host: String,
}

impl std::fmt::Debug for PineconeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeClient")
            .field("index_name", &self.config.index_name)
            .field("host", &self.host)
            .field("namespace", &self.config.namespace)
            .finish_non_exhaustive()
    }
}

impl PineconeClient {
    /// Ensures the configured index exists and connects to its data plane.
    ///
    /// A missing index is created as a cosine serverless index of the given
    /// dimension and polled until ready.
    pub async fn connect(config: PineconeConfig, dimension: usize) -> Result<Self, PromptError> {
        Self::connect_with_poll_interval(config, dimension, Duration::from_secs(2)).await
    }

    pub async fn connect_with_poll_interval(
        config: PineconeConfig,
        dimension: usize,
        poll_interval: Duration,
    ) -> Result<Self, PromptError> {
        let api_key = require_api_key(&config)?;
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        let control = ControlPlane {
            client: &client,
            api_key: &api_key,
            base_url: config.control_url.trim_end_matches('/'),
        };

        if control.index_exists(&config.index_name).await {
            info!("Pinecone index '{}' already exists.", config.index_name);
        } else {
            info!("Creating Pinecone index '{}'.", config.index_name);
            control.create_index(&config, dimension).await?;
            control
                .wait_until_ready(&config.index_name, poll_interval)
                .await?;
        }

        let description = control.describe_index(&config.index_name).await?;
        let host = description.host.ok_or_else(|| {
            PromptError::VectorStoreApi(format!(
                "Index '{}' has no data-plane host yet",
                config.index_name
            ))
        })?;

        Ok(Self {
            client,
            api_key,
            config,
            host: normalize_host(&host),
        })
    }

    /// Connects to an index whose data-plane host is already known.
    pub fn with_host(config: PineconeConfig, host: &str) -> Result<Self, PromptError> {
        let api_key = require_api_key(&config)?;
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_key,
            config,
            host: normalize_host(host),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.config.index_name
    }

    fn post(&self, path: &str) -> RequestBuilder {
        with_headers(
            self.client.post(format!("{}{path}", self.host)),
            &self.api_key,
        )
    }

    fn namespace(&self) -> Option<&str> {
        self.config.namespace.as_deref()
    }
}

#[async_trait]
impl VectorStore for PineconeClient {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, PromptError> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace(),
        };
        debug!(index = %self.config.index_name, top_k, "--> Querying Pinecone");
        let response = check(self.post("/query").json(&request).send().await).await?;
        let body: QueryResponse = response
            .json()
            .await
            .map_err(PromptError::VectorStoreDeserialization)?;

        Ok(body
            .matches
            .into_iter()
            .map(|m| ScoredDocument {
                document: metadata_to_document(m.metadata.unwrap_or_default()),
                score: m.score,
            })
            .collect())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, PromptError> {
        let mut upserted = 0;
        let mut records = records.into_iter().peekable();
        while records.peek().is_some() {
            let vectors: Vec<UpsertVector> = records
                .by_ref()
                .take(UPSERT_BATCH_SIZE)
                .map(|r| UpsertVector {
                    id: r.id,
                    values: r.values,
                    metadata: document_to_metadata(&r.document),
                })
                .collect();
            let request = UpsertRequest {
                vectors,
                namespace: self.namespace(),
            };
            let response =
                check(self.post("/vectors/upsert").json(&request).send().await).await?;
            let body: UpsertResponse = response
                .json()
                .await
                .map_err(PromptError::VectorStoreDeserialization)?;
            upserted += body.upserted_count;
        }
        Ok(upserted)
    }

    async fn stats(&self) -> Result<IndexStats, PromptError> {
        let response = check(
            self.post("/describe_index_stats")
                .json(&serde_json::json!({}))
                .send()
                .await,
        )
        .await?;
        let body: StatsResponse = response
            .json()
            .await
            .map_err(PromptError::VectorStoreDeserialization)?;
        Ok(IndexStats {
            total_vector_count: body.total_vector_count,
            dimension: body.dimension,
        })
    }

    async fn delete_all(&self) -> Result<(), PromptError> {
        let request = DeleteRequest {
            delete_all: true,
            namespace: self.namespace(),
        };
        check(self.post("/vectors/delete").json(&request).send().await).await?;
        Ok(())
    }
}

// --- Control plane helpers ---

struct ControlPlane<'a> {
    client: &'a ReqwestClient,
    api_key: &'a str,
    base_url: &'a str,
}

impl ControlPlane<'_> {
    async fn index_exists(&self, name: &str) -> bool {
        let request = with_headers(
            self.client.get(format!("{}/indexes", self.base_url)),
            self.api_key,
        );
        let listed = match check(request.send().await).await {
            Ok(response) => response.json::<IndexList>().await,
            Err(e) => {
                warn!("Failed to list Pinecone indexes: {e}");
                return false;
            }
        };
        match listed {
            Ok(list) => list.indexes.iter().any(|i| i.name == name),
            Err(e) => {
                warn!("Failed to parse Pinecone index list: {e}");
                false
            }
        }
    }

    async fn describe_index(&self, name: &str) -> Result<IndexDescription, PromptError> {
        let request = with_headers(
            self.client
                .get(format!("{}/indexes/{name}", self.base_url)),
            self.api_key,
        );
        check(request.send().await)
            .await?
            .json()
            .await
            .map_err(PromptError::VectorStoreDeserialization)
    }

    async fn create_index(
        &self,
        config: &PineconeConfig,
        dimension: usize,
    ) -> Result<(), PromptError> {
        let body = CreateIndexRequest {
            name: &config.index_name,
            dimension,
            metric: "cosine",
            spec: ServerlessSpec {
                serverless: CloudRegion {
                    cloud: &config.cloud,
                    region: &config.region,
                },
            },
        };
        let request = with_headers(
            self.client.post(format!("{}/indexes", self.base_url)),
            self.api_key,
        );
        check(request.json(&body).send().await).await?;
        Ok(())
    }

    async fn wait_until_ready(&self, name: &str, interval: Duration) -> Result<(), PromptError> {
        for _ in 0..READINESS_ATTEMPTS {
            let description = self.describe_index(name).await?;
            if description.status.map(|s| s.ready).unwrap_or(false) {
                info!("Pinecone index '{name}' is ready.");
                return Ok(());
            }
            tokio::time::sleep(interval).await;
        }
        warn!("Pinecone index '{name}' did not become ready in time.");
        Ok(())
    }
}

// --- Shared helpers ---

fn require_api_key(config: &PineconeConfig) -> Result<String, PromptError> {
    config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| PromptError::MissingApiKey("PINECONE_API_KEY".to_string()))
}

fn with_headers(builder: RequestBuilder, api_key: &str) -> RequestBuilder {
    builder
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
}

async fn check(result: Result<Response, reqwest::Error>) -> Result<Response, PromptError> {
    let response = result.map_err(PromptError::VectorStoreRequest)?;
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(PromptError::VectorStoreApi(format!("{status}: {error_text}")));
    }
    Ok(response)
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Chunk text is stored under `text`, next to the header path and source.
fn document_to_metadata(document: &Document) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("text".into(), Value::from(document.page_content.clone()));
    let fields = [
        ("source", &document.metadata.source),
        ("doc_title", &document.metadata.doc_title),
        ("main_category", &document.metadata.main_category),
        ("sub_category", &document.metadata.sub_category),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            metadata.insert(key.into(), Value::from(value.clone()));
        }
    }
    metadata
}

fn metadata_to_document(mut metadata: Map<String, Value>) -> Document {
    let mut take = |key: &str| match metadata.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    };
    let page_content = take("text").unwrap_or_default();
    Document {
        page_content,
        metadata: DocumentMetadata {
            source: take("source"),
            doc_title: take("doc_title"),
            main_category: take("main_category"),
            sub_category: take("sub_category"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_round_trips_header_path() {
        let mut document = Document::new("연차는 15일입니다.").with_source("03_휴가정책.md");
        document.metadata.main_category = Some("휴가제도".to_string());
        let restored = metadata_to_document(document_to_metadata(&document));
        assert_eq!(restored, document);
    }

    #[test]
    fn bare_hosts_get_https_scheme() {
        assert_eq!(
            normalize_host("hr-abc.svc.pinecone.io"),
            "https://hr-abc.svc.pinecone.io"
        );
        assert_eq!(normalize_host("http://127.0.0.1:9000/"), "http://127.0.0.1:9000");
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = PineconeClient::with_host(PineconeConfig::default(), "localhost").unwrap_err();
        assert!(matches!(err, PromptError::MissingApiKey(key) if key == "PINECONE_API_KEY"));
    }
}
