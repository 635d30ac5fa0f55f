use async_trait::async_trait;
use std::fmt::Debug;

use super::{Completion, CompletionRequest};
use crate::domain::DomainError;

/// Trait for chat-completion providers (OpenAI et al.)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn complete(
        &self,
        model: &str,
        request: CompletionRequest,
    ) -> Result<Completion, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
