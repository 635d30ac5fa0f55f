//! Domain layer - core types and the adapter ports

pub mod error;
pub mod evaluation;
pub mod llm;
pub mod prompt;
pub mod trace;

pub use error::DomainError;
pub use llm::{Completion, CompletionRequest, LlmProvider, Message, MessageRole, Usage};
pub use prompt::{PromptTemplate, TemplateError};
pub use trace::{
    GenerationRecord, SessionSummary, StoredPrompt, TraceDetail, TraceHandle, TraceOptions, Tracer,
};
