//! # HR Chat Graph
//!
//! The question-answering pipeline, expressed as a small state machine of
//! named steps:
//!
//! ```text
//! refine_question -> update_hr_status -+-> generate_reject_answer
//!                                      |
//!                                      +-> update_rag_status -+-> generate_contact_answer
//!                                                             |
//!                                                             +-> retrieve -> rerank
//!                                                                 -> generate_rag_answer
//!                                                                 -> verify_rag_answer
//! ```
//!
//! Each step reads and updates a [`ChatState`]. The two routers branch on the
//! labels they store in the state.

mod classify;
mod nodes;
pub mod state;

pub use classify::RouteDecision;
pub use state::{AnswerType, ChatState, Message, Role, Verification};

use crate::{
    departments::DepartmentDirectory,
    errors::PromptError,
    prompts::{Task, TaskPrompt},
    providers::ai::AiProvider,
    rerank::RerankOptions,
    retrieval::Retriever,
};
use serde::Serialize;
use std::{collections::HashMap, fmt};
use thiserror::Error;
use tracing::info;

/// Upper bound on steps per invocation; the longest path visits seven.
const MAX_STEPS: usize = 32;

/// The steps of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    RefineQuestion,
    UpdateHrStatus,
    GenerateRejectAnswer,
    UpdateRagStatus,
    GenerateContactAnswer,
    Retrieve,
    Rerank,
    GenerateRagAnswer,
    VerifyRagAnswer,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::RefineQuestion => "refine_question",
            Step::UpdateHrStatus => "update_hr_status",
            Step::GenerateRejectAnswer => "generate_reject_answer",
            Step::UpdateRagStatus => "update_rag_status",
            Step::GenerateContactAnswer => "generate_contact_answer",
            Step::Retrieve => "retrieve",
            Step::Rerank => "rerank",
            Step::GenerateRagAnswer => "generate_rag_answer",
            Step::VerifyRagAnswer => "verify_rag_answer",
        }
    }

    /// The step that follows `self`, or `None` when the pipeline is done.
    pub fn next(&self, state: &ChatState) -> Option<Step> {
        match self {
            Step::RefineQuestion => Some(Step::UpdateHrStatus),
            Step::UpdateHrStatus => {
                if state.is_hr_question == Some(true) {
                    Some(Step::UpdateRagStatus)
                } else {
                    Some(Step::GenerateRejectAnswer)
                }
            }
            Step::UpdateRagStatus => {
                if state.is_rag_suitable == Some(true) {
                    Some(Step::Retrieve)
                } else {
                    Some(Step::GenerateContactAnswer)
                }
            }
            Step::Retrieve => Some(Step::Rerank),
            Step::Rerank => Some(Step::GenerateRagAnswer),
            Step::GenerateRagAnswer => Some(Step::VerifyRagAnswer),
            Step::VerifyRagAnswer | Step::GenerateContactAnswer | Step::GenerateRejectAnswer => {
                None
            }
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Custom error types for the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: Step,
        #[source]
        source: PromptError,
    },
    #[error("Could not parse the {task} reply: '{reply}'")]
    Classification { task: Task, reply: String },
    #[error("No AI provider configured for task '{0}'")]
    MissingTaskProvider(Task),
    #[error("No retriever configured")]
    MissingRetriever,
    #[error("Pipeline did not finish within {0} steps")]
    StepLimit(usize),
}

#[derive(Debug, Clone)]
struct TaskRunner {
    provider: Box<dyn AiProvider>,
    prompt: TaskPrompt,
}

/// The compiled HR chat pipeline.
#[derive(Debug, Clone)]
pub struct HrChatGraph {
    tasks: HashMap<Task, TaskRunner>,
    retriever: Retriever,
    departments: DepartmentDirectory,
    rerank: RerankOptions,
}

impl HrChatGraph {
    pub fn builder() -> HrChatGraphBuilder {
        HrChatGraphBuilder::default()
    }

    pub fn departments(&self) -> &DepartmentDirectory {
        &self.departments
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answers a single question.
    pub async fn ask(&self, question: &str) -> Result<ChatState, PipelineError> {
        self.invoke(ChatState::from_question(question)).await
    }

    /// Runs the pipeline from `refine_question` until a terminal step.
    pub async fn invoke(&self, mut state: ChatState) -> Result<ChatState, PipelineError> {
        let mut current = Some(Step::RefineQuestion);
        let mut executed = 0;
        while let Some(step) = current {
            if executed >= MAX_STEPS {
                return Err(PipelineError::StepLimit(MAX_STEPS));
            }
            executed += 1;
            info!(step = %step, "Running pipeline step");
            self.run_step(step, &mut state).await?;
            state.trace.push(step.name().to_string());
            current = step.next(&state);
        }
        info!(
            answer_type = ?state.answer_type,
            verification = ?state.verification,
            "Pipeline finished after {} steps",
            executed
        );
        Ok(state)
    }

    /// Runs a single step against the state.
    pub async fn run_step(&self, step: Step, state: &mut ChatState) -> Result<(), PipelineError> {
        match step {
            Step::RefineQuestion => self.refine_question(state).await,
            Step::UpdateHrStatus => self.update_hr_status(state).await,
            Step::GenerateRejectAnswer => {
                self.generate_reject_answer(state);
                Ok(())
            }
            Step::UpdateRagStatus => {
                self.update_rag_status(state).await;
                Ok(())
            }
            Step::GenerateContactAnswer => {
                self.generate_contact_answer(state);
                Ok(())
            }
            Step::Retrieve => self.retrieve(state).await,
            Step::Rerank => {
                self.rerank(state).await;
                Ok(())
            }
            Step::GenerateRagAnswer => self.generate_rag_answer(state).await,
            Step::VerifyRagAnswer => self.verify_rag_answer(state).await,
        }
    }
}

/// A builder for [`HrChatGraph`].
///
/// Every task needs a provider, either set per task or through
/// `default_provider`. Prompts fall back to the library defaults.
#[derive(Default)]
pub struct HrChatGraphBuilder {
    default_provider: Option<Box<dyn AiProvider>>,
    providers: HashMap<Task, Box<dyn AiProvider>>,
    prompts: HashMap<Task, TaskPrompt>,
    retriever: Option<Retriever>,
    departments: Option<DepartmentDirectory>,
    rerank: RerankOptions,
}

impl HrChatGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider used by every task without its own provider.
    pub fn default_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.default_provider = Some(provider);
        self
    }

    pub fn task_provider(mut self, task: Task, provider: Box<dyn AiProvider>) -> Self {
        self.providers.insert(task, provider);
        self
    }

    pub fn task_prompt(mut self, task: Task, prompt: TaskPrompt) -> Self {
        self.prompts.insert(task, prompt);
        self
    }

    pub fn retriever(mut self, retriever: Retriever) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn departments(mut self, departments: DepartmentDirectory) -> Self {
        self.departments = Some(departments);
        self
    }

    pub fn rerank_options(mut self, options: RerankOptions) -> Self {
        self.rerank = options;
        self
    }

    pub fn build(mut self) -> Result<HrChatGraph, PipelineError> {
        let mut tasks = HashMap::new();
        for task in Task::ALL {
            let provider = match self.providers.remove(&task) {
                Some(p) => p,
                None => self
                    .default_provider
                    .clone()
                    .ok_or(PipelineError::MissingTaskProvider(task))?,
            };
            let prompt = self
                .prompts
                .remove(&task)
                .unwrap_or_else(|| task.default_prompt());
            tasks.insert(task, TaskRunner { provider, prompt });
        }

        Ok(HrChatGraph {
            tasks,
            retriever: self.retriever.ok_or(PipelineError::MissingRetriever)?,
            departments: self.departments.unwrap_or_default(),
            rerank: self.rerank,
        })
    }
}
