use crate::{departments::Department, types::Document};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "human")]
    User,
    #[serde(alias = "ai")]
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Messages without a role are treated as user input.
    #[serde(default)]
    pub role: Option<Role>,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Some(Role::User),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Some(Role::Assistant),
            content: content.into(),
        }
    }

    fn is_user_input(&self) -> bool {
        matches!(self.role, None | Some(Role::User))
    }
}

/// How the final answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    /// HR question still waiting for the second router.
    Pending,
    Reject,
    RagAnswer,
    DepartmentContact,
}

/// Outcome of checking a generated answer against its sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verification {
    #[serde(rename = "일치함")]
    Consistent,
    #[serde(rename = "불일치함")]
    Inconsistent,
}

impl Verification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verification::Consistent => "일치함",
            Verification::Inconsistent => "불일치함",
        }
    }

    /// Interprets a verifier reply, which may wrap the verdict in extra words.
    ///
    /// `불일치함` contains `일치함`, so the negative verdict is checked first.
    pub fn from_reply(reply: &str) -> Self {
        if reply.contains("불일치") {
            Verification::Inconsistent
        } else if reply.contains("일치함") {
            Verification::Consistent
        } else {
            Verification::Inconsistent
        }
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the pipeline knows about one question as it moves through the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatState {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub user_question: String,
    #[serde(default)]
    pub refined_question: String,
    #[serde(default)]
    pub is_hr_question: Option<bool>,
    #[serde(default)]
    pub is_rag_suitable: Option<bool>,
    #[serde(default)]
    pub department_info: Option<Department>,
    #[serde(default)]
    pub retrieved_docs: Vec<Document>,
    #[serde(default)]
    pub answer_type: Option<AnswerType>,
    #[serde(default)]
    pub final_answer: String,
    #[serde(default)]
    pub verification: Option<Verification>,
    /// Names of the steps visited, in order.
    #[serde(default)]
    pub trace: Vec<String>,
}

impl ChatState {
    /// Starts a conversation from a single question.
    pub fn from_question(question: impl Into<String>) -> Self {
        let question = question.into();
        Self {
            messages: vec![Message::user(question.clone())],
            user_question: question,
            ..Default::default()
        }
    }

    /// Continues a conversation; the question is taken from the last user message.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// The question being answered.
    ///
    /// Uses `user_question` when set, otherwise the most recent non-empty
    /// message written by the user (or without a role).
    pub fn question(&self) -> String {
        let question = self.user_question.trim();
        if !question.is_empty() {
            return question.to_string();
        }
        self.messages
            .iter()
            .rev()
            .filter(|m| m.is_user_input())
            .map(|m| m.content.trim())
            .find(|c| !c.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    pub(crate) fn push_answer(&mut self, answer: String) {
        self.messages.push(Message::assistant(answer.clone()));
        self.final_answer = answer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_prefers_explicit_field() {
        let mut state = ChatState::from_messages(vec![Message::user("이전 질문")]);
        state.user_question = "  연차 규정 알려줘 ".to_string();
        assert_eq!(state.question(), "연차 규정 알려줘");
    }

    #[test]
    fn question_falls_back_to_latest_user_message() {
        let state = ChatState::from_messages(vec![
            Message::user("첫 질문"),
            Message::assistant("답변"),
            Message {
                role: None,
                content: "복지 포인트는 얼마인가요?".to_string(),
            },
            Message::assistant("   "),
            Message::user("   "),
        ]);
        assert_eq!(state.question(), "복지 포인트는 얼마인가요?");
    }

    #[test]
    fn question_is_empty_without_user_input() {
        let state = ChatState::from_messages(vec![Message::assistant("안녕하세요")]);
        assert_eq!(state.question(), "");
    }

    #[test]
    fn verification_checks_negative_verdict_first() {
        assert_eq!(Verification::from_reply("불일치함"), Verification::Inconsistent);
        assert_eq!(Verification::from_reply("네, 일치함."), Verification::Consistent);
        assert_eq!(Verification::from_reply("모르겠습니다"), Verification::Inconsistent);
    }

    #[test]
    fn roles_accept_langchain_aliases() {
        let message: Message =
            serde_json::from_str(r#"{"role": "human", "content": "안녕"}"#).unwrap();
        assert_eq!(message.role, Some(Role::User));
    }
}
