//! # Embeddings Provider
//!
//! This module provides functionality for generating vector embeddings by calling
//! an external, OpenAI-compatible embeddings API.

use crate::errors::PromptError;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a, I: Serialize> {
    model: &'a str,
    input: I,
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// A client for an OpenAI-compatible `/v1/embeddings` endpoint.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for EmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl EmbeddingClient {
    pub fn new(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            model: model.into(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates a vector embedding for a single text input.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, PromptError> {
        let mut data = self.send(input).await?;
        data.sort_by_key(|d| d.index);
        data.into_iter().next().map(|d| d.embedding).ok_or_else(|| {
            PromptError::AiApi("OpenAI-compatible API returned no embeddings".to_string())
        })
    }

    /// Generates embeddings for several inputs in a single request.
    ///
    /// The output is ordered like the input, using the `index` field of each
    /// returned item.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, PromptError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let mut data = self.send(inputs).await?;
        if data.len() != inputs.len() {
            return Err(PromptError::AiApi(format!(
                "Expected {} embeddings but received {}",
                inputs.len(),
                data.len()
            )));
        }
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    async fn send<I: Serialize + std::fmt::Debug>(
        &self,
        input: I,
    ) -> Result<Vec<EmbeddingData>, PromptError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input,
        };
        debug!(model = %self.model, "--> Sending request to OpenAI-compatible Embeddings API");

        let mut request_builder = self.client.post(&self.api_url).json(&request_body);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .send()
            .await
            .map_err(PromptError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PromptError::AiApi(error_text));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(PromptError::AiDeserialization)?;
        Ok(embedding_response.data)
    }
}
