//! LLM provider implementations

mod openai;

pub use openai::OpenAiProvider;

use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use crate::domain::LlmProvider;

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an OpenAI provider with the default base URL
    pub fn create_openai(api_key: impl Into<String>, timeout: Duration) -> Arc<dyn LlmProvider> {
        Arc::new(OpenAiProvider::new(
            HttpClient::with_timeout(timeout),
            api_key,
        ))
    }

    /// Create an OpenAI provider with a custom base URL
    pub fn create_openai_with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Arc<dyn LlmProvider> {
        Arc::new(OpenAiProvider::with_base_url(
            HttpClient::with_timeout(timeout),
            api_key,
            base_url,
        ))
    }
}
