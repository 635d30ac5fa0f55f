//! Application state for shared adapters

use std::sync::Arc;

use crate::domain::{LlmProvider, Tracer};

/// Adapter bundle handed to every handler.
///
/// Built once at startup and cloned per request; the adapters themselves are
/// the only long-lived state in the process.
#[derive(Clone)]
pub struct AppState {
    pub llm_provider: Arc<dyn LlmProvider>,
    pub tracer: Arc<dyn Tracer>,
}

impl AppState {
    pub fn new(llm_provider: Arc<dyn LlmProvider>, tracer: Arc<dyn Tracer>) -> Self {
        Self {
            llm_provider,
            tracer,
        }
    }
}
