//! # Prompt Templates
//!
//! Prompt constants live in [`tasks`]. This module names the LLM-backed tasks
//! of the pipeline and renders templates by literal placeholder replacement.

pub mod tasks;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::LazyLock};
use tasks::*;

/// The LLM-backed tasks of the HR chat pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    RefineQuestion,
    HrClassification,
    RouteClassification,
    RerankScoring,
    RagAnswer,
    AnswerVerification,
}

impl Task {
    pub const ALL: [Task; 6] = [
        Task::RefineQuestion,
        Task::HrClassification,
        Task::RouteClassification,
        Task::RerankScoring,
        Task::RagAnswer,
        Task::AnswerVerification,
    ];

    /// The configuration key of the task.
    pub fn name(&self) -> &'static str {
        match self {
            Task::RefineQuestion => "refine_question",
            Task::HrClassification => "hr_classification",
            Task::RouteClassification => "route_classification",
            Task::RerankScoring => "rerank_scoring",
            Task::RagAnswer => "rag_answer",
            Task::AnswerVerification => "answer_verification",
        }
    }

    pub fn from_name(name: &str) -> Option<Task> {
        Task::ALL.into_iter().find(|t| t.name() == name)
    }

    /// The model role that serves the task unless configured otherwise.
    ///
    /// `router1` decides HR relevance, `router2` picks between documents and a
    /// department hand-off, and `gen` does everything else.
    pub fn default_role(&self) -> &'static str {
        match self {
            Task::HrClassification => "router1",
            Task::RouteClassification => "router2",
            _ => "gen",
        }
    }

    pub fn default_prompt(&self) -> TaskPrompt {
        let (system, user) = match self {
            Task::RefineQuestion => (REFINE_QUESTION_SYSTEM_PROMPT, REFINE_QUESTION_USER_PROMPT),
            Task::HrClassification => (
                HR_CLASSIFICATION_SYSTEM_PROMPT,
                HR_CLASSIFICATION_USER_PROMPT,
            ),
            Task::RouteClassification => (
                ROUTE_CLASSIFICATION_SYSTEM_PROMPT,
                ROUTE_CLASSIFICATION_USER_PROMPT,
            ),
            Task::RerankScoring => (RERANK_SCORING_SYSTEM_PROMPT, RERANK_SCORING_USER_PROMPT),
            Task::RagAnswer => (RAG_ANSWER_SYSTEM_PROMPT, RAG_ANSWER_USER_PROMPT),
            Task::AnswerVerification => (
                ANSWER_VERIFICATION_SYSTEM_PROMPT,
                ANSWER_VERIFICATION_USER_PROMPT,
            ),
        };
        TaskPrompt::new(system, user)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A system prompt paired with a user prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPrompt {
    pub system: String,
    pub user: String,
}

impl TaskPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Renders both parts with the same set of placeholder values.
    pub fn render(&self, vars: &[(&str, &str)]) -> (String, String) {
        (render(&self.system, vars), render(&self.user, vars))
    }
}

static PLACEHOLDER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").ok());

/// Replaces each `{key}` in the template with its value, in a single pass.
///
/// Unknown placeholders and literal braces (such as JSON examples) are left
/// as-is, and substituted values are never scanned for placeholders again.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let Some(re) = PLACEHOLDER_RE.as_ref() else {
        return template.to_string();
    };
    re.replace_all(template, |caps: &Captures| {
        vars.iter()
            .find(|(key, _)| *key == &caps[1])
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
