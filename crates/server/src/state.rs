//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup: the chat providers for each model role, the
//! embedding client, the vector index, the compiled pipeline and the document
//! ingestor. The optional startup ingestion is a separate step so that
//! one-shot callers can build the state without it.

use crate::config::AppConfig;
use anyhow::anyhow;
use hrchat::{
    ingest::{IngestOptions, Ingestor},
    providers::{
        ai::EmbeddingClient,
        factory::create_providers,
        vector::{pinecone::PineconeClient, VectorStore},
    },
    DepartmentDirectory, HrChatGraph, Retriever, Task, TaskPrompt,
};
use hrchat_markdown::MarkdownIngestor;
use std::sync::Arc;
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub graph: Arc<HrChatGraph>,
    pub ingestor: Arc<MarkdownIngestor>,
}

/// Builds the shared application state, connecting to (or creating) the Pinecone index.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let store = PineconeClient::connect(config.vector_store.clone(), config.embedding.dimension)
        .await?;
    info!("Connected to vector index '{}'", store.index_name());
    build_app_state_with_store(config, Arc::new(store)).await
}

/// Builds the shared application state on top of an existing vector store.
pub async fn build_app_state_with_store(
    config: AppConfig,
    store: Arc<dyn VectorStore>,
) -> anyhow::Result<AppState> {
    let ai_providers = create_providers(&config.providers)?;

    let embedding_key = config
        .embedding
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty());
    let embedder = EmbeddingClient::new(
        config.embedding.api_url.clone(),
        config.embedding.model_name.clone(),
        embedding_key,
    )?;

    let retriever = Retriever::new(embedder.clone(), store.clone())
        .with_top_k(config.pipeline.retrieve_top_k);
    let departments = match &config.departments {
        Some(list) => DepartmentDirectory::new(list.clone())?,
        None => DepartmentDirectory::default(),
    };

    let mut builder = HrChatGraph::builder()
        .retriever(retriever)
        .departments(departments)
        .rerank_options(config.pipeline.rerank_options());

    for task in Task::ALL {
        let task_config = config.tasks.get(task.name()).cloned().unwrap_or_default();
        let role = task_config
            .provider
            .unwrap_or_else(|| task.default_role().to_string());
        let provider = ai_providers.get(&role).ok_or_else(|| {
            anyhow!("Provider '{role}' for task '{task}' not found in providers configuration")
        })?;

        let defaults = task.default_prompt();
        let prompt = TaskPrompt::new(
            task_config.system_prompt.unwrap_or(defaults.system),
            task_config.user_prompt.unwrap_or(defaults.user),
        );
        builder = builder
            .task_provider(task, provider.clone())
            .task_prompt(task, prompt);
    }
    let graph = builder.build()?;

    let ingestor = MarkdownIngestor::new(embedder, store).with_chunking(
        config.documents.chunk_size,
        config.documents.chunk_overlap,
    );

    Ok(AppState {
        config: Arc::new(config),
        graph: Arc::new(graph),
        ingestor: Arc::new(ingestor),
    })
}

/// Runs a non-destructive ingestion of the configured documents when
/// `documents.ingest_on_startup` is set. Failures are logged, not returned.
pub async fn run_startup_ingestion(state: &AppState) {
    let documents = &state.config.documents;
    if !documents.ingest_on_startup {
        return;
    }
    match state
        .ingestor
        .ingest(&documents.paths, IngestOptions::default())
        .await
    {
        Ok(result) if result.skipped => {
            info!("Vector index already populated; startup ingestion skipped.")
        }
        Ok(result) => info!(
            "Startup ingestion added {} chunks from {} documents.",
            result.documents_added,
            result.sources.len()
        ),
        Err(e) => warn!("Startup ingestion failed: {e}"),
    }
}
