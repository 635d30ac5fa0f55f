//! Infrastructure layer - adapters for external services

pub mod http_client;
pub mod langfuse;
pub mod llm;
pub mod logging;

pub use http_client::{HttpClient, HttpClientTrait};
pub use langfuse::LangfuseTracer;
pub use llm::{LlmProviderFactory, OpenAiProvider};
