//! # `hrchat-markdown`: Markdown Policy Ingestion Plugin
//!
//! This crate loads local Markdown policy files into the vector index used by
//! the `hrchat` pipeline. It implements the `Ingestor` trait from the core
//! library: files are split by header and then into overlapping chunks, embedded
//! in batches, and upserted under deterministic ids.

pub mod splitter;

use hrchat::{
    ingest::{IngestError, IngestOptions, IngestionResult, Ingestor},
    providers::{ai::EmbeddingClient, vector::VectorStore},
    types::{Document, VectorRecord},
    PromptError,
};
use async_trait::async_trait;
use std::{collections::HashMap, path::Path, sync::Arc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub use splitter::{split_by_headers, RecursiveCharacterSplitter};

/// Number of chunks embedded per request.
const EMBEDDING_BATCH_SIZE: usize = 100;

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum MarkdownIngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Vector store error: {0}")]
    VectorStore(PromptError),
    #[error("Embedding generation failed: {0}")]
    Embedding(PromptError),
    #[error("None of the {0} markdown sources could be read")]
    NoSources(usize),
}

impl From<MarkdownIngestError> for IngestError {
    fn from(err: MarkdownIngestError) -> Self {
        let message = err.to_string();
        match err {
            MarkdownIngestError::Io(e) => IngestError::Fetch(e.to_string()),
            MarkdownIngestError::VectorStore(e) | MarkdownIngestError::Embedding(e) => {
                IngestError::Provider(e)
            }
            MarkdownIngestError::NoSources(_) => IngestError::SourceNotFound(message),
        }
    }
}

/// The chunks read from a set of markdown files, keyed by chunk id.
#[derive(Debug, Default)]
pub struct LoadedChunks {
    pub chunks: Vec<(String, Document)>,
    /// The paths that were read.
    pub loaded: Vec<String>,
    /// The paths that were missing or unreadable.
    pub missing: Vec<String>,
}

// --- Ingestor Implementation ---

#[derive(Debug, Clone)]
pub struct MarkdownIngestor {
    embedder: EmbeddingClient,
    store: Arc<dyn VectorStore>,
    splitter: RecursiveCharacterSplitter,
}

impl MarkdownIngestor {
    pub fn new(embedder: EmbeddingClient, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            splitter: RecursiveCharacterSplitter::default(),
        }
    }

    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.splitter = RecursiveCharacterSplitter::new(chunk_size, chunk_overlap);
        self
    }

    /// Reads and chunks the given files.
    ///
    /// Every chunk's `source` metadata is the file name, while its id is keyed
    /// on the path as given so same-named files in different directories do
    /// not overwrite each other.
    pub fn load_chunks(&self, paths: &[String]) -> LoadedChunks {
        let mut loaded_chunks = LoadedChunks::default();
        let mut names: HashMap<String, &str> = HashMap::new();

        for path in paths {
            let file = Path::new(path);
            if !file.exists() {
                warn!("Markdown file '{path}' does not exist; skipping it.");
                loaded_chunks.missing.push(path.clone());
                continue;
            }
            let content = match std::fs::read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read markdown file '{path}': {e}");
                    loaded_chunks.missing.push(path.clone());
                    continue;
                }
            };

            let source = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone());
            if let Some(previous) = names.insert(source.clone(), path) {
                warn!(
                    "'{path}' and '{previous}' share the file name '{source}'; answers will cite both as '{source}'."
                );
            }
            let sections = split_by_headers(&content);
            let file_chunks: Vec<(String, Document)> = self
                .splitter
                .split_documents(&sections)
                .into_iter()
                .enumerate()
                .map(|(index, doc)| (chunk_id(path, index), doc.with_source(source.clone())))
                .collect();
            info!(
                "Split '{}' into {} sections and {} chunks.",
                source,
                sections.len(),
                file_chunks.len()
            );
            loaded_chunks.chunks.extend(file_chunks);
            loaded_chunks.loaded.push(path.clone());
        }
        loaded_chunks
    }

    /// Embeds every chunk, in batches, without touching the index.
    async fn embed(
        &self,
        chunks: Vec<(String, Document)>,
    ) -> Result<Vec<VectorRecord>, MarkdownIngestError> {
        let mut records = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBEDDING_BATCH_SIZE) {
            let texts: Vec<String> = batch
                .iter()
                .map(|(_, doc)| doc.page_content.clone())
                .collect();
            let vectors = self
                .embedder
                .embed_batch(&texts)
                .await
                .map_err(MarkdownIngestError::Embedding)?;

            records.extend(batch.iter().cloned().zip(vectors).map(
                |((id, document), values)| VectorRecord {
                    id,
                    values,
                    document,
                },
            ));
        }
        Ok(records)
    }

    async fn upload(&self, records: Vec<VectorRecord>) -> Result<Vec<String>, MarkdownIngestError> {
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        let mut upserted = 0;
        for batch in records.chunks(EMBEDDING_BATCH_SIZE) {
            upserted += self
                .store
                .upsert(batch.to_vec())
                .await
                .map_err(MarkdownIngestError::VectorStore)?;
        }
        info!("Upserted {upserted} of {} chunks.", ids.len());
        Ok(ids)
    }

    async fn run(
        &self,
        sources: &[String],
        options: IngestOptions,
    ) -> Result<IngestionResult, MarkdownIngestError> {
        let LoadedChunks {
            chunks,
            loaded,
            missing,
        } = self.load_chunks(sources);
        if loaded.is_empty() && !sources.is_empty() {
            return Err(MarkdownIngestError::NoSources(sources.len()));
        }

        let stats = self
            .store
            .stats()
            .await
            .map_err(MarkdownIngestError::VectorStore)?;
        let existing = stats.total_vector_count;
        let mut result = IngestionResult {
            missing,
            ..Default::default()
        };

        if !options.recreate && existing > 0 {
            info!("Index already holds {existing} vectors; skipping ingestion.");
            result.skipped = true;
            return Ok(result);
        }
        result.sources = loaded;

        // The old index is only cleared once the new vectors are in hand.
        let records = self.embed(chunks).await?;
        if options.recreate && existing > 0 {
            info!("Deleting {existing} existing vectors before re-ingesting.");
            self.store
                .delete_all()
                .await
                .map_err(MarkdownIngestError::VectorStore)?;
            result.deleted_existing = true;
        }
        if records.is_empty() {
            info!("No chunks to ingest.");
            return Ok(result);
        }

        result.document_ids = self.upload(records).await?;
        result.documents_added = result.document_ids.len();
        Ok(result)
    }
}

/// The id of the `index`-th chunk of the file at `path`, stable across runs.
pub fn chunk_id(path: &str, index: usize) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("{path}#chunk-{index}").as_bytes()).to_string()
}

#[async_trait]
impl Ingestor for MarkdownIngestor {
    /// Ingests markdown files, given as paths.
    ///
    /// A non-empty index is left alone unless `recreate` is set, in which case
    /// it is cleared once the new chunks are embedded. Nothing is deleted when
    /// no source can be read or embedding fails.
    async fn ingest(
        &self,
        sources: &[String],
        options: IngestOptions,
    ) -> Result<IngestionResult, IngestError> {
        info!(
            "Ingesting {} markdown sources (recreate: {})",
            sources.len(),
            options.recreate
        );
        Ok(self.run(sources, options).await?)
    }
}
