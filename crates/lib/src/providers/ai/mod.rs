pub mod embedding;
pub mod openai;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::EmbeddingClient;
use std::fmt::Debug;

/// A trait for interacting with a chat-completion provider.
///
/// Every LLM-backed step of the pipeline goes through this interface, which
/// lets tests swap in scripted providers.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    ///
    /// The result should be a string containing the AI's response.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);
