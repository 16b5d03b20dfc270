//! Shared mocks for the `hrchat` test suites.

use async_trait::async_trait;
use hrchat::{
    errors::PromptError,
    providers::{ai::AiProvider, vector::VectorStore},
    types::{Document, IndexStats, ScoredDocument, VectorRecord},
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    user_responses: Arc<Mutex<Vec<(String, String)>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            user_responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the system prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Pre-programs a response for any call whose user prompt contains `key`.
    /// These take precedence over system prompt keys, in insertion order.
    pub fn add_user_response(&self, key: &str, response: &str) {
        let mut responses = self.user_responses.lock().unwrap();
        responses.push((key.to_string(), response.to_string()));
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Counts the recorded calls whose system prompt contains `key`.
    pub fn calls_matching(&self, key: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(system, _)| system.contains(key))
            .count()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        for (key, response) in self.user_responses.lock().unwrap().iter() {
            if user_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if system_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(PromptError::AiApi(format!(
            "MockAiProvider: No response programmed for system prompt. Got: '{system_prompt}'"
        )))
    }
}

// --- Mock Vector Store ---

/// An in-memory vector index ranking by cosine similarity.
#[derive(Clone, Debug, Default)]
pub struct MockVectorStore {
    records: Arc<Mutex<Vec<VectorRecord>>>,
    queries: Arc<Mutex<Vec<(Vec<f32>, usize)>>>,
    deletes: Arc<Mutex<usize>>,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with documents, each under its own vector.
    pub fn with_documents(documents: Vec<(Vec<f32>, Document)>) -> Self {
        let store = Self::new();
        {
            let mut records = store.records.lock().unwrap();
            for (i, (values, document)) in documents.into_iter().enumerate() {
                records.push(VectorRecord {
                    id: format!("doc-{i}"),
                    values,
                    document,
                });
            }
        }
        store
    }

    pub fn records(&self) -> Vec<VectorRecord> {
        self.records.lock().unwrap().clone()
    }

    /// The vectors and `top_k` of every query received.
    pub fn queries(&self) -> Vec<(Vec<f32>, usize)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn delete_count(&self) -> usize {
        *self.deletes.lock().unwrap()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, PromptError> {
        let mut scored: Vec<ScoredDocument> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| ScoredDocument {
                document: r.document.clone(),
                score: cosine(&vector, &r.values),
            })
            .collect();
        self.queries.lock().unwrap().push((vector, top_k));
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, PromptError> {
        let count = records.len();
        let mut stored = self.records.lock().unwrap();
        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => stored.push(record),
            }
        }
        Ok(count)
    }

    async fn stats(&self) -> Result<IndexStats, PromptError> {
        let records = self.records.lock().unwrap();
        Ok(IndexStats {
            total_vector_count: records.len() as u64,
            dimension: records.first().map(|r| r.values.len()),
        })
    }

    async fn delete_all(&self) -> Result<(), PromptError> {
        self.records.lock().unwrap().clear();
        *self.deletes.lock().unwrap() += 1;
        Ok(())
    }
}

/// Builds a mock provider with responses keyed by system prompt substrings.
pub fn mock_provider(responses: &[(&str, &str)]) -> MockAiProvider {
    let provider = MockAiProvider::new();
    for (key, response) in responses {
        provider.add_response(key, response);
    }
    provider
}
