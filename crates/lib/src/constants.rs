//! # Shared Constants
//!
//! Defaults shared by the library, the server and the CLI so that the same
//! index, models and limits are used everywhere unless configured otherwise.

/// The Pinecone index holding the HR policy chunks.
pub const DEFAULT_INDEX_NAME: &str = "gaida-hr-rules";

/// The embedding model used for both ingestion and retrieval.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Vector dimension of `text-embedding-3-small` (and `text-embedding-ada-002`).
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;

pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
pub const DEFAULT_PINECONE_CONTROL_URL: &str = "https://api.pinecone.io";

/// Model for answer generation, rerank scoring and verification.
pub const DEFAULT_GEN_MODEL: &str = "gpt-4.1";
/// Model for the HR relevance router.
pub const DEFAULT_ROUTER1_MODEL: &str = "gpt-4.1-mini";
/// Model for the RAG / department router.
pub const DEFAULT_ROUTER2_MODEL: &str = "gpt-4.1-nano";

/// Number of chunks fetched from the vector store per question.
pub const DEFAULT_RETRIEVE_TOP_K: usize = 3;
/// Number of chunks kept after reranking.
pub const DEFAULT_RERANK_TOP_N: usize = 3;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
/// Pinecone accepts at most this many vectors per upsert request.
pub const UPSERT_BATCH_SIZE: usize = 100;

/// The department every unresolved contact request is routed to.
pub const FALLBACK_DEPARTMENT: &str = "인사";
