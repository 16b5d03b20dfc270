//! # HR Policy Chat
//!
//! This crate answers employee questions about HR policy. A question is
//! refined, classified as HR or not, and then either answered from the policy
//! documents in a vector index (retrieve, rerank, generate, verify) or handed
//! off to the contact details of the responsible department.
//!
//! The pipeline lives in [`graph`]; the hosted services it talks to are behind
//! the traits in [`providers`].

pub mod constants;
pub mod departments;
pub mod errors;
pub mod graph;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod rerank;
pub mod retrieval;
pub mod types;

pub use departments::{Department, DepartmentDirectory};
pub use errors::PromptError;
pub use graph::{AnswerType, ChatState, HrChatGraph, HrChatGraphBuilder, PipelineError, Verification};
pub use prompts::{Task, TaskPrompt};
pub use retrieval::Retriever;
pub use types::{Document, DocumentMetadata};
