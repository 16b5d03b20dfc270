//! # Retrieval
//!
//! Embeds a question and fetches the nearest policy chunks from the vector store.

use crate::{
    constants::DEFAULT_RETRIEVE_TOP_K,
    errors::PromptError,
    providers::{ai::EmbeddingClient, vector::VectorStore},
    types::Document,
};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Retriever {
    embedder: EmbeddingClient,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: EmbeddingClient, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            top_k: DEFAULT_RETRIEVE_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Returns up to `top_k` documents for the query, most similar first.
    ///
    /// A blank query returns no documents without contacting either service.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Document>, PromptError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed(query).await?;
        let matches = self.store.query(vector, self.top_k).await?;
        info!("Retrieved {} documents for query: '{}'", matches.len(), query);
        for m in &matches {
            debug!(score = m.score, source = %m.document.source(), "retrieved chunk");
        }
        Ok(matches.into_iter().map(|m| m.document).collect())
    }
}
