//! # Chat Route Handlers
//!
//! `POST /chat` runs one question (or the last user turn of a conversation)
//! through the HR chat pipeline.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use axum::{
    extract::{Query, State},
    Json,
};
use hrchat::{graph::Message, AnswerType, ChatState, Department, Verification};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Deserialize, Debug, Default)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
    /// Prior turns. When `question` is absent, the last user message is answered.
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatResponse {
    pub answer: String,
    pub answer_type: Option<AnswerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    /// Source file names of the documents the answer was grounded on.
    #[serde(default)]
    pub sources: Vec<String>,
}

impl From<&ChatState> for ChatResponse {
    fn from(state: &ChatState) -> Self {
        let mut sources: Vec<String> = Vec::new();
        if state.answer_type == Some(AnswerType::RagAnswer) {
            for doc in &state.retrieved_docs {
                let source = doc.source().to_string();
                if !source.is_empty() && !sources.contains(&source) {
                    sources.push(source);
                }
            }
        }
        Self {
            answer: state.final_answer.clone(),
            answer_type: state.answer_type,
            verification: state.verification,
            department: state.department_info.clone(),
            sources,
        }
    }
}

pub async fn chat_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, AppError> {
    let mut messages = payload.messages;
    if let Some(question) = payload.question.filter(|q| !q.trim().is_empty()) {
        messages.push(Message::user(question));
    }
    let state = ChatState::from_messages(messages);
    let question = state.question();
    if question.is_empty() {
        return Err(AppError::BadRequest(
            "A non-empty 'question' or user message is required.".to_string(),
        ));
    }
    info!("Received chat question: '{}'", question);

    let state = app_state.graph.invoke(state).await?;

    let debug_info = json!({
        "user_question": state.user_question,
        "refined_question": state.refined_question,
        "is_hr_question": state.is_hr_question,
        "is_rag_suitable": state.is_rag_suitable,
        "retrieved_docs": state.retrieved_docs,
        "trace": state.trace,
    });
    Ok(wrap_response(
        ChatResponse::from(&state),
        debug_params,
        Some(debug_info),
    ))
}
