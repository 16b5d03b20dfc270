use thiserror::Error;

/// Errors raised while talking to the hosted AI and vector services.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("Failed to send request to vector store: {0}")]
    VectorStoreRequest(reqwest::Error),
    #[error("Failed to deserialize vector store response: {0}")]
    VectorStoreDeserialization(reqwest::Error),
    #[error("Vector store returned an error: {0}")]
    VectorStoreApi(String),
    #[error("API key is missing: {0}")]
    MissingApiKey(String),
    #[error("AI provider is not configured: {0}")]
    MissingAiProvider(String),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}
