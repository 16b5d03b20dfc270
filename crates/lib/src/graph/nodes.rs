//! The step implementations of [`HrChatGraph`].

use super::{
    classify::{parse_hr_analysis, parse_route, RouteDecision},
    AnswerType, ChatState, HrChatGraph, PipelineError, Step, TaskRunner, Verification,
};
use crate::{
    constants::FALLBACK_DEPARTMENT,
    prompts::{
        render,
        tasks::{CONTACT_ANSWER_TEMPLATE, NO_QUESTION_ANSWER, NO_SOURCES_ANSWER, REJECT_ANSWER},
        Task,
    },
    rerank::rerank,
};
use tracing::{debug, info, warn};

/// The label the refinement prompt emits for input written entirely in English.
const INVALID_INPUT: &str = "invalid_input";

impl HrChatGraph {
    fn runner(&self, task: Task) -> Result<&TaskRunner, PipelineError> {
        self.tasks
            .get(&task)
            .ok_or(PipelineError::MissingTaskProvider(task))
    }

    async fn call(
        &self,
        task: Task,
        step: Step,
        vars: &[(&str, &str)],
    ) -> Result<String, PipelineError> {
        let runner = self.runner(task)?;
        let (system_prompt, user_prompt) = runner.prompt.render(vars);
        debug!(task = %task, user_prompt = %user_prompt, "--> Sending prompt to AI provider");
        let reply = runner
            .provider
            .generate(&system_prompt, &user_prompt)
            .await
            .map_err(|source| PipelineError::Step { step, source })?;
        debug!(task = %task, "<-- AI reply: {}", reply);
        Ok(reply.trim().to_string())
    }

    pub(super) async fn refine_question(&self, state: &mut ChatState) -> Result<(), PipelineError> {
        let question = state.question();
        state.refined_question = if question.is_empty() {
            String::new()
        } else {
            self.call(
                Task::RefineQuestion,
                Step::RefineQuestion,
                &[("question", &question)],
            )
            .await?
        };
        info!(
            "Refined question '{}' -> '{}'",
            question, state.refined_question
        );
        state.user_question = question;
        Ok(())
    }

    pub(super) async fn update_hr_status(
        &self,
        state: &mut ChatState,
    ) -> Result<(), PipelineError> {
        let refined = state.refined_question.trim().trim_matches('"').to_string();
        let is_hr = if refined.is_empty() || refined == INVALID_INPUT {
            info!("Refined question is empty or invalid; treating it as non-HR.");
            false
        } else {
            let reply = self
                .call(
                    Task::HrClassification,
                    Step::UpdateHrStatus,
                    &[
                        ("user_question", &state.user_question),
                        ("refined_question", &refined),
                    ],
                )
                .await?;
            parse_hr_analysis(&reply).ok_or(PipelineError::Classification {
                task: Task::HrClassification,
                reply,
            })?
        };

        info!(is_hr_question = is_hr, "HR relevance decided");
        state.is_hr_question = Some(is_hr);
        state.answer_type = Some(if is_hr {
            AnswerType::Pending
        } else {
            AnswerType::Reject
        });
        Ok(())
    }

    pub(super) fn generate_reject_answer(&self, state: &mut ChatState) {
        state.push_answer(REJECT_ANSWER.to_string());
    }

    async fn classify_route(&self, question: &str) -> Result<RouteDecision, PipelineError> {
        let departments = self.departments.names().join(", ");
        let reply = self
            .call(
                Task::RouteClassification,
                Step::UpdateRagStatus,
                &[
                    ("question", question),
                    ("departments", &departments),
                    ("fallback_department", FALLBACK_DEPARTMENT),
                ],
            )
            .await?;
        parse_route(&reply).ok_or(PipelineError::Classification {
            task: Task::RouteClassification,
            reply,
        })
    }

    /// Never fails: any classification error routes the question to HR staff.
    pub(super) async fn update_rag_status(&self, state: &mut ChatState) {
        let decision = match self.classify_route(&state.refined_question).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!("Route classification failed, routing to {FALLBACK_DEPARTMENT}: {e}");
                RouteDecision::Department(Some(FALLBACK_DEPARTMENT.to_string()))
            }
        };
        info!(?decision, "Route decided");

        match decision {
            RouteDecision::Rag => {
                state.is_rag_suitable = Some(true);
                state.department_info = None;
                state.answer_type = Some(AnswerType::RagAnswer);
            }
            RouteDecision::Department(name) => {
                let department = self.departments.resolve(name.as_deref()).clone();
                state.is_rag_suitable = Some(false);
                state.department_info = Some(department);
                state.answer_type = Some(AnswerType::DepartmentContact);
            }
        }
    }

    pub(super) fn generate_contact_answer(&self, state: &mut ChatState) {
        let department = state
            .department_info
            .clone()
            .unwrap_or_else(|| self.departments.fallback().clone());
        let answer = render(
            CONTACT_ANSWER_TEMPLATE,
            &[
                ("name", &department.name),
                ("email", &department.email),
                ("slack", &department.slack),
            ],
        );
        state.push_answer(answer);
    }

    pub(super) async fn retrieve(&self, state: &mut ChatState) -> Result<(), PipelineError> {
        let query = match state.refined_question.trim() {
            "" => state.question(),
            refined => refined.to_string(),
        };
        state.retrieved_docs = self
            .retriever
            .retrieve(&query)
            .await
            .map_err(|source| PipelineError::Step {
                step: Step::Retrieve,
                source,
            })?;
        Ok(())
    }

    pub(super) async fn rerank(&self, state: &mut ChatState) {
        let question = state.question();
        let candidates = std::mem::take(&mut state.retrieved_docs);
        state.retrieved_docs = match self.runner(Task::RerankScoring) {
            Ok(runner) => {
                rerank(
                    runner.provider.as_ref(),
                    &runner.prompt,
                    &question,
                    candidates,
                    self.rerank,
                )
                .await
            }
            Err(_) => candidates,
        };
    }

    pub(super) async fn generate_rag_answer(
        &self,
        state: &mut ChatState,
    ) -> Result<(), PipelineError> {
        let question = state.question();
        if question.is_empty() {
            state.final_answer = NO_QUESTION_ANSWER.to_string();
            return Ok(());
        }

        let context: String = state
            .retrieved_docs
            .iter()
            .enumerate()
            .map(|(i, doc)| format!("[{}] ({})\n{}\n\n", i + 1, doc.source(), doc.page_content))
            .collect();
        if context.trim().is_empty() {
            state.final_answer = NO_SOURCES_ANSWER.to_string();
            return Ok(());
        }

        let answer = self
            .call(
                Task::RagAnswer,
                Step::GenerateRagAnswer,
                &[("question", &question), ("context", context.trim_end())],
            )
            .await?;
        state.push_answer(answer);
        Ok(())
    }

    pub(super) async fn verify_rag_answer(
        &self,
        state: &mut ChatState,
    ) -> Result<(), PipelineError> {
        let context: String = state
            .retrieved_docs
            .iter()
            .map(|doc| format!("- {}\n", doc.page_content))
            .collect();

        if context.trim().is_empty() || state.final_answer.trim().is_empty() {
            state.verification = Some(Verification::Inconsistent);
            return Ok(());
        }

        let reply = self
            .call(
                Task::AnswerVerification,
                Step::VerifyRagAnswer,
                &[("context", &context), ("answer", &state.final_answer)],
            )
            .await?;
        let verdict = Verification::from_reply(&reply);
        info!(verification = %verdict, "Answer verified");
        state.verification = Some(verdict);
        Ok(())
    }
}
