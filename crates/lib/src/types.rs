use serde::{Deserialize, Serialize};

/// The header path and origin of a policy chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// File name of the policy document the chunk was cut from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Text of the enclosing `#` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_title: Option<String>,
    /// Text of the enclosing `##` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_category: Option<String>,
    /// Text of the enclosing `###` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
}

/// A chunk of an HR policy document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: DocumentMetadata::default(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    /// The source file name, or `unknown` when the chunk has none.
    pub fn source(&self) -> &str {
        self.metadata.source.as_deref().unwrap_or("unknown")
    }
}

/// A document returned by a similarity query together with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// A chunk ready to be written to the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub document: Document,
}

/// Summary statistics for a vector index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_vector_count: u64,
    #[serde(default)]
    pub dimension: Option<usize>,
}
