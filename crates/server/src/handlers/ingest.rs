//! # Ingestion Route Handlers
//!
//! `POST /ingest` loads markdown policy documents into the vector index.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use axum::{
    extract::{Query, State},
    Json,
};
use hrchat::ingest::{IngestOptions, IngestionResult, Ingestor};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Deserialize, Debug, Default)]
pub struct IngestRequest {
    /// Deletes every vector in the index before uploading.
    #[serde(default)]
    pub recreate: bool,
    /// Markdown files to load; defaults to `documents.paths` from the configuration.
    #[serde(default)]
    pub paths: Option<Vec<String>>,
}

pub async fn ingest_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<IngestRequest>,
) -> Result<Json<ApiResponse<IngestionResult>>, AppError> {
    let paths = payload
        .paths
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| app_state.config.documents.paths.clone());
    if paths.is_empty() {
        return Err(AppError::BadRequest(
            "No document paths given and none configured.".to_string(),
        ));
    }
    info!(
        "Received ingest request for {} documents (recreate: {})",
        paths.len(),
        payload.recreate
    );

    let result = app_state
        .ingestor
        .ingest(
            &paths,
            IngestOptions {
                recreate: payload.recreate,
            },
        )
        .await?;

    let debug_info = json!({ "paths": paths });
    Ok(wrap_response(result, debug_params, Some(debug_info)))
}
