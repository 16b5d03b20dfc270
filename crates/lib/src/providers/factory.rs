//! # AI Provider Factory
//!
//! Builds chat providers from their configuration entries. The server and the
//! CLI both go through this module so a model role resolves the same way in
//! every binary.

use crate::{
    constants::DEFAULT_CHAT_COMPLETIONS_URL,
    errors::PromptError,
    providers::ai::{openai::OpenAiProvider, AiProvider},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider: `openai` or `local` (any OpenAI-compatible server).
    pub provider: String,
    /// The chat completions URL. Defaults to the OpenAI endpoint for `openai`.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    #[serde(default)]
    pub api_key: Option<String>,
    pub model_name: String,
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Creates a single provider from its configuration.
pub fn create_provider(
    name: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn AiProvider>, PromptError> {
    let api_key = config.api_key.clone().filter(|k| !k.trim().is_empty());
    let api_url = config.api_url.clone().filter(|u| !u.trim().is_empty());

    let provider = match config.provider.as_str() {
        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                PromptError::MissingApiKey(format!(
                    "OPENAI_API_KEY is required for provider '{name}'"
                ))
            })?;
            let api_url = api_url.unwrap_or_else(|| DEFAULT_CHAT_COMPLETIONS_URL.to_string());
            OpenAiProvider::new(api_url, Some(api_key), Some(config.model_name.clone()))?
        }
        "local" => {
            let api_url = api_url.ok_or_else(|| {
                PromptError::MissingAiProvider(format!(
                    "api_url is required for local provider '{name}'. Please set LOCAL_AI_API_URL in your .env file."
                ))
            })?;
            OpenAiProvider::new(api_url, api_key, Some(config.model_name.clone()))?
        }
        other => {
            return Err(PromptError::MissingAiProvider(format!(
                "Unsupported AI provider type '{other}' for provider '{name}'"
            )))
        }
    };

    info!(
        "Configured AI provider '{}' ({}) with model '{}'",
        name, config.provider, config.model_name
    );
    let provider = match config.temperature {
        Some(t) => provider.with_temperature(t),
        None => provider,
    };
    Ok(Box::new(provider))
}

/// Instantiates every configured provider, keyed by its name.
pub fn create_providers(
    configs: &HashMap<String, ProviderConfig>,
) -> Result<HashMap<String, Box<dyn AiProvider>>, PromptError> {
    configs
        .iter()
        .map(|(name, config)| Ok((name.clone(), create_provider(name, config)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, api_url: Option<&str>, api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            provider: provider.to_string(),
            api_url: api_url.map(String::from),
            api_key: api_key.map(String::from),
            model_name: "gpt-4.1-mini".to_string(),
            temperature: None,
        }
    }

    #[test]
    fn openai_requires_api_key() {
        let err = create_provider("router1", &config("openai", None, Some(""))).unwrap_err();
        assert!(matches!(err, PromptError::MissingApiKey(_)));
    }

    #[test]
    fn local_requires_url() {
        let err = create_provider("gen", &config("local", None, None)).unwrap_err();
        assert!(matches!(err, PromptError::MissingAiProvider(_)));
        assert!(create_provider("gen", &config("local", Some("http://localhost:1234"), None)).is_ok());
    }

    #[test]
    fn unknown_provider_kind_is_an_error() {
        let err = create_provider("gen", &config("gemini", None, Some("k"))).unwrap_err();
        assert!(err.to_string().contains("Unsupported AI provider type 'gemini'"));
    }
}
