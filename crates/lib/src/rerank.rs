//! # Rerank Logic
//!
//! This module provides the two rerank strategies used after retrieval:
//! - LLM relevance scoring, one call per candidate.
//! - Truncation, which keeps the retrieval order.

use crate::{
    constants::DEFAULT_RERANK_TOP_N,
    prompts::{render, TaskPrompt},
    providers::ai::AiProvider,
    types::Document,
};
use futures::future::join_all;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::LazyLock};
use tracing::{debug, info, warn};

static NUMBER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").ok());

/// Defines the rerank strategy applied to retrieved documents.
#[derive(Default, Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RerankMode {
    /// Asks the LLM for a 0-1 relevance score per document. (Default)
    #[default]
    LlmScore,
    /// Keeps the first `top_n` documents in retrieval order.
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerankOptions {
    #[serde(default)]
    pub mode: RerankMode,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_RERANK_TOP_N
}

impl Default for RerankOptions {
    fn default() -> Self {
        Self {
            mode: RerankMode::default(),
            top_n: DEFAULT_RERANK_TOP_N,
        }
    }
}

/// A trait for items that can be re-ranked.
///
/// This allows the re-ranking logic to be generic over different types of
/// documents, as long as they can provide the text the LLM should judge.
pub trait Rerankable: Clone + Debug + Send + Sync {
    fn rerank_content(&self) -> &str;
}

impl Rerankable for Document {
    fn rerank_content(&self) -> &str {
        &self.page_content
    }
}

/// Extracts a relevance score from a free-form LLM reply.
///
/// Decimal commas are accepted. The first number found is used and clamped to
/// `[0, 1]`; a reply without a number scores `0.0`.
pub fn parse_relevance_score(reply: &str) -> f32 {
    let cleaned = reply.trim().replace(',', ".");
    let score = NUMBER_RE
        .as_ref()
        .and_then(|re| re.find(&cleaned))
        .and_then(|m| m.as_str().parse::<f32>().ok())
        .unwrap_or(0.0);
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Scores every candidate with the LLM and returns the best `top_n`, highest first.
///
/// Scoring calls run concurrently. A failed call scores `0.0`. Ties keep
/// their retrieval order.
pub async fn llm_score_rerank<T: Rerankable>(
    ai_provider: &dyn AiProvider,
    prompt: &TaskPrompt,
    question: &str,
    candidates: Vec<T>,
    top_n: usize,
) -> Vec<T> {
    info!(
        "Re-ranking {} candidates using LLM for question: '{}'",
        candidates.len(),
        question
    );

    let scores = join_all(candidates.iter().map(|candidate| async move {
        let user_prompt = render(
            &prompt.user,
            &[
                ("question", question),
                ("document", candidate.rerank_content()),
            ],
        );
        match ai_provider.generate(&prompt.system, &user_prompt).await {
            Ok(reply) => {
                let score = parse_relevance_score(&reply);
                debug!("<-- LLM relevance reply '{}' scored {}", reply, score);
                score
            }
            Err(e) => {
                warn!("Relevance scoring failed, scoring candidate 0.0: {e}");
                0.0
            }
        }
    }))
    .await;

    let mut scored: Vec<(T, f32)> = candidates.into_iter().zip(scores).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(top_n).map(|(c, _)| c).collect()
}

/// Applies the configured rerank strategy.
///
/// An empty question or candidate list returns the candidates unchanged.
/// A `top_n` of zero keeps one document.
pub async fn rerank<T: Rerankable>(
    ai_provider: &dyn AiProvider,
    prompt: &TaskPrompt,
    question: &str,
    candidates: Vec<T>,
    options: RerankOptions,
) -> Vec<T> {
    if question.trim().is_empty() || candidates.is_empty() {
        return candidates;
    }
    let top_n = options.top_n.max(1);
    match options.mode {
        RerankMode::LlmScore => {
            llm_score_rerank(ai_provider, prompt, question, candidates, top_n).await
        }
        RerankMode::Truncate => candidates.into_iter().take(top_n).collect(),
    }
}
