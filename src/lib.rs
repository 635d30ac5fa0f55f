//! Langfuse chat gateway
//!
//! An example API server that forwards chat completions to OpenAI and
//! records every interaction (traces, generations, scores, events) in
//! Langfuse. The handlers are thin pass-throughs: validate the body, call
//! the provider adapter, record through the tracing adapter, shape the
//! response.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::AppState;
use domain::Tracer;
use infrastructure::{HttpClient, LangfuseTracer, LlmProviderFactory};

/// Create the application state with both adapters initialized.
///
/// The adapters are constructed once here and injected into every handler
/// through `AppState`; there is no process-global client state.
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let timeout = Duration::from_secs(config.openai.timeout_secs);

    let llm_provider = match &config.openai.base_url {
        Some(base_url) => LlmProviderFactory::create_openai_with_base_url(
            config.openai.api_key.as_str(),
            base_url.as_str(),
            timeout,
        ),
        None => LlmProviderFactory::create_openai(config.openai.api_key.as_str(), timeout),
    };

    let tracer: Arc<dyn Tracer> = Arc::new(
        LangfuseTracer::new(
            HttpClient::with_timeout(timeout),
            config.langfuse.host.as_str(),
            &config.langfuse.public_key,
            &config.langfuse.secret_key,
        )
        .with_batch_size(config.langfuse.batch_size),
    );

    Ok(AppState::new(llm_provider, tracer))
}
