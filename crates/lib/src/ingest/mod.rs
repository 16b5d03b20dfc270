//! # Ingestion
//!
//! The plugin contract for loading HR policy documents into the vector index.
//! Concrete ingestors live in their own crates (see `hrchat-markdown`).

pub mod traits;

pub use traits::{IngestError, IngestOptions, IngestionResult, Ingestor};
