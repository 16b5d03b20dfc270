pub mod pinecone;

use crate::{
    errors::PromptError,
    types::{IndexStats, ScoredDocument, VectorRecord},
};
use async_trait::async_trait;
use std::fmt::Debug;

/// A trait for a managed vector index holding policy chunks.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Returns the `top_k` documents nearest to `vector`, best first.
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, PromptError>;

    /// Writes the records and returns how many were accepted.
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, PromptError>;

    async fn stats(&self) -> Result<IndexStats, PromptError>;

    /// Removes every vector from the index (or its namespace).
    async fn delete_all(&self) -> Result<(), PromptError>;
}
