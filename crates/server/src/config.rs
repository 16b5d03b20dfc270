//! # Application Configuration
//!
//! This module defines the configuration structure for the `hrchat-server` and
//! provides the logic for loading it from a YAML file and environment
//! variables. Values are layered in this order, later sources winning:
//!
//! 1. Built-in task defaults (provider role and prompts per pipeline task).
//! 2. `config.yml`, or `config.{AI_PROVIDER}.yml` when it does not exist.
//! 3. `prompt.yml`, for prompt overrides.
//! 4. Environment variables, e.g. `PORT` or `HRCHAT__PIPELINE__RETRIEVE_TOP_K`.
//!
//! `${VAR}` placeholders inside the YAML files are replaced with the value of
//! the environment variable before parsing.

use config::{
    Config as ConfigBuilder, Environment, File, FileFormat, Value as ConfigValue,
    ValueKind as ConfigValueKind,
};
use hrchat::{
    constants::{
        DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_EMBEDDING_DIMENSION,
        DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDINGS_URL, DEFAULT_RERANK_TOP_N,
        DEFAULT_RETRIEVE_TOP_K,
    },
    providers::{factory::ProviderConfig, vector::pinecone::PineconeConfig},
    rerank::{RerankMode, RerankOptions},
    Department, Task,
};
use regex::Regex;
use serde::Deserialize;
use std::{collections::HashMap, env, fs, path::Path};
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Chat providers keyed by model role (`gen`, `router1`, `router2`).
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub vector_store: PineconeConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    /// Replaces the built-in department directory when set.
    #[serde(default)]
    pub departments: Option<Vec<Department>>,
    #[serde(default)]
    pub tasks: HashMap<String, TaskConfig>,
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_url")]
    pub api_url: String,
    #[serde(default = "default_embedding_model")]
    pub model_name: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_embedding_url() -> String {
    DEFAULT_EMBEDDINGS_URL.to_string()
}
fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}
fn default_dimension() -> usize {
    DEFAULT_EMBEDDING_DIMENSION
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: default_embedding_url(),
            model_name: default_embedding_model(),
            api_key: None,
            dimension: default_dimension(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    #[serde(default = "default_retrieve_top_k")]
    pub retrieve_top_k: usize,
    #[serde(default = "default_rerank_top_n")]
    pub rerank_top_n: usize,
    #[serde(default)]
    pub rerank_mode: RerankMode,
}

fn default_retrieve_top_k() -> usize {
    DEFAULT_RETRIEVE_TOP_K
}
fn default_rerank_top_n() -> usize {
    DEFAULT_RERANK_TOP_N
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retrieve_top_k: default_retrieve_top_k(),
            rerank_top_n: default_rerank_top_n(),
            rerank_mode: RerankMode::default(),
        }
    }
}

impl PipelineConfig {
    pub fn rerank_options(&self) -> RerankOptions {
        RerankOptions {
            mode: self.rerank_mode,
            top_n: self.rerank_top_n,
        }
    }
}

/// The policy documents loaded into the vector index.
#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Runs a non-destructive ingestion when the server starts.
    #[serde(default)]
    pub ingest_on_startup: bool,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_chunk_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            ingest_on_startup: false,
        }
    }
}

/// Per-task overrides. `provider` names an entry of `providers`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TaskConfig {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

fn build_default_tasks() -> HashMap<String, ConfigValue> {
    Task::ALL
        .into_iter()
        .map(|task| {
            let prompt = task.default_prompt();
            let mut table = HashMap::new();
            table.insert(
                "provider".to_string(),
                ConfigValue::from(task.default_role()),
            );
            table.insert("system_prompt".to_string(), ConfigValue::from(prompt.system));
            table.insert("user_prompt".to_string(), ConfigValue::from(prompt.user));
            (
                task.name().to_string(),
                ConfigValue::new(None, ConfigValueKind::Table(table)),
            )
        })
        .collect()
}

/// Reads a file and replaces `${VAR}` placeholders; unset variables become empty strings.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid placeholder pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the configuration from the crate directory.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    load_config(env!("CARGO_MANIFEST_DIR"), config_path_override)
}

/// Loads the configuration with `base_path` as the directory holding the YAML files.
pub fn load_config(
    base_path: &str,
    config_path_override: Option<&str>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder().set_default("tasks", build_default_tasks())?;

    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let user_config_path = format!("{base_path}/config.yml");
        if Path::new(&user_config_path).exists() {
            info!("Loading user-defined configuration from '{user_config_path}'.");
            user_config_path
        } else {
            let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "openai".to_string());
            let fallback_path = format!("{base_path}/config.{provider}.yml");
            info!("'{user_config_path}' not found. Falling back to '{fallback_path}' based on AI_PROVIDER='{provider}'.");
            fallback_path
        }
    };

    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'. Please ensure 'config.yml' exists or your AI_PROVIDER is set to load a valid template ('openai' or 'local')."
        ))
    })?;
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    let user_prompt_path = format!("{base_path}/prompt.yml");
    if let Some(user_prompts_content) = read_and_substitute(&user_prompt_path)? {
        info!("Loading user prompt overrides from '{user_prompt_path}'.");
        builder = builder.add_source(File::from_str(&user_prompts_content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("HRCHAT")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    Ok(config)
}
