use hrchat::{ingest::IngestError, PipelineError, PromptError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
pub enum AppError {
    /// Errors from the hosted AI and vector services.
    Prompt(PromptError),
    /// A failed pipeline run.
    Pipeline(PipelineError),
    /// A failed document ingestion.
    Ingest(IngestError),
    /// The request itself is invalid.
    BadRequest(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Prompt(err)
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::Pipeline(err)
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::Ingest(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

fn prompt_error_response(err: &PromptError) -> (StatusCode, String) {
    match err {
        PromptError::MissingAiProvider(_) | PromptError::MissingApiKey(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server is not configured correctly.".to_string(),
        ),
        PromptError::AiRequest(e) => (
            StatusCode::BAD_GATEWAY,
            format!("Request to AI provider failed: {e}"),
        ),
        PromptError::AiDeserialization(e) => (
            StatusCode::BAD_GATEWAY,
            format!("Failed to deserialize AI provider response: {e}"),
        ),
        PromptError::AiApi(e) => (StatusCode::BAD_GATEWAY, format!("AI provider error: {e}")),
        PromptError::VectorStoreRequest(e) => (
            StatusCode::BAD_GATEWAY,
            format!("Request to vector store failed: {e}"),
        ),
        PromptError::VectorStoreDeserialization(e) => (
            StatusCode::BAD_GATEWAY,
            format!("Failed to deserialize vector store response: {e}"),
        ),
        PromptError::VectorStoreApi(e) => {
            (StatusCode::BAD_GATEWAY, format!("Vector store error: {e}"))
        }
        PromptError::Regex(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal regex error: {e}"),
        ),
        PromptError::JsonSerialization(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to serialize result: {e}"),
        ),
        PromptError::ReqwestClientBuild(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to build HTTP client: {e}"),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Prompt(err) => {
                error!("PromptError: {:?}", err);
                prompt_error_response(&err)
            }
            AppError::Pipeline(err) => {
                error!("PipelineError: {:?}", err);
                match &err {
                    PipelineError::Step { step, source } => {
                        let (status, message) = prompt_error_response(source);
                        (status, format!("Step '{step}' failed. {message}"))
                    }
                    PipelineError::Classification { .. } => {
                        (StatusCode::BAD_GATEWAY, err.to_string())
                    }
                    PipelineError::MissingTaskProvider(_)
                    | PipelineError::MissingRetriever
                    | PipelineError::StepLimit(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                    }
                }
            }
            AppError::Ingest(err) => {
                error!("IngestError: {:?}", err);
                match &err {
                    IngestError::SourceNotFound(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                    IngestError::Provider(source) => prompt_error_response(source),
                    IngestError::Fetch(_) | IngestError::Parse(_) | IngestError::Internal(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                    }
                }
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
