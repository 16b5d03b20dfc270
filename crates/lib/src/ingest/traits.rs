use crate::errors::PromptError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A generic error type for all ingestion plugins.
///
/// Each plugin maps its specific errors (I/O, parsing) into these variants so
/// callers can handle ingestion failures uniformly.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("The specified source could not be found: {0}")]
    SourceNotFound(String),

    #[error("Failed to fetch or read content from the source: {0}")]
    Fetch(String),

    #[error("Failed to parse the content from the source: {0}")]
    Parse(String),

    #[error("A vector store or embedding call failed during ingestion: {0}")]
    Provider(#[from] PromptError),

    #[error("An unexpected internal error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Options for a single ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Clears the index before uploading. Without it, a non-empty index is left untouched.
    #[serde(default)]
    pub recreate: bool,
}

/// Summary of an ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionResult {
    /// The sources that were read and split.
    pub sources: Vec<String>,
    /// Sources that could not be found or read.
    pub missing: Vec<String>,
    /// The number of chunks written to the vector index.
    pub documents_added: usize,
    /// Ids of the written chunks.
    pub document_ids: Vec<String>,
    /// Whether existing vectors were deleted first.
    pub deleted_existing: bool,
    /// True when the index already held vectors and `recreate` was not set.
    pub skipped: bool,
}

/// The contract for an ingestion plugin.
///
/// A plugin turns a list of sources (file paths for the markdown plugin) into
/// embedded chunks in the vector index.
#[async_trait]
pub trait Ingestor: Send + Sync {
    async fn ingest(
        &self,
        sources: &[String],
        options: IngestOptions,
    ) -> Result<IngestionResult, IngestError>;
}
