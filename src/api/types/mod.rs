//! Request/response types for the HTTP surface

pub mod chat;
pub mod error;
pub mod evaluation;
pub mod event;
pub mod feedback;
pub mod json;
pub mod metadata;
pub mod prompt;

pub use chat::{ChatMessage, ChatMessageRole, ChatRequest, ChatResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use evaluation::{EvaluationRequest, EvaluationResponse};
pub use event::EventRequest;
pub use feedback::FeedbackRequest;
pub use json::Json;
pub use metadata::validate_metadata;
pub use prompt::{PromptCompletionRequest, PromptCompletionResponse};
