use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use super::{GenerationRecord, SessionSummary, StoredPrompt, TraceDetail, TraceHandle, TraceOptions};
use crate::domain::DomainError;

/// Port for the tracing/observability backend.
///
/// Write-path methods (`start_trace`, `record_*`) are best-effort: adapter
/// failures are logged and swallowed so that observability never fails a
/// user-facing request. Read-path methods surface backend errors to the
/// caller.
#[async_trait]
pub trait Tracer: Send + Sync + Debug {
    /// Open a new trace and return its handle
    async fn start_trace(&self, name: &str, options: TraceOptions) -> TraceHandle;

    /// Attach a completed LLM call to a trace
    async fn record_generation(&self, trace: &TraceHandle, record: GenerationRecord);

    /// Attach a named numeric score to a trace
    async fn record_score(&self, trace_id: &str, name: &str, value: f64, comment: Option<String>);

    /// Record a standalone event, opening a fresh trace when none is given
    async fn record_event(&self, trace_id: Option<&str>, name: &str, metadata: Value);

    /// Fetch a trace from the backend
    async fn get_trace(&self, trace_id: &str) -> Result<TraceDetail, DomainError>;

    /// Fetch a session summary from the backend
    async fn get_session(&self, session_id: &str) -> Result<SessionSummary, DomainError>;

    /// Fetch a prompt template from the backend's prompt store
    async fn get_prompt(&self, name: &str) -> Result<StoredPrompt, DomainError>;

    /// Block until buffered records are sent
    async fn flush(&self) -> Result<(), DomainError>;
}
