use std::sync::Mutex;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use super::ingestion::{
    new_event_id, new_trace_id, EventBody, GenerationBody, IngestionEvent, IngestionEventKind,
    ScoreBody, TraceBody,
};
use crate::domain::trace::{
    GenerationRecord, SessionSummary, StoredPrompt, TraceDetail, TraceHandle, TraceOptions,
};
use crate::domain::{DomainError, Tracer};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_BATCH_SIZE: usize = 16;

/// Langfuse tracing client.
///
/// Writes are buffered as ingestion envelopes and sent in batches: when the
/// buffer reaches `batch_size`, and on `flush()`. Write failures are logged
/// and swallowed. Reads go straight to the public API.
#[derive(Debug)]
pub struct LangfuseTracer<C: HttpClientTrait> {
    client: C,
    base_url: String,
    auth_header: String,
    batch_size: usize,
    buffer: Mutex<Vec<IngestionEvent>>,
}

impl<C: HttpClientTrait> LangfuseTracer<C> {
    pub fn new(
        client: C,
        base_url: impl Into<String>,
        public_key: &str,
        secret_key: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_header: build_auth_header(public_key, secret_key),
            batch_size: DEFAULT_BATCH_SIZE,
            buffer: Mutex::new(Vec::new()),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn ingestion_url(&self) -> String {
        format!("{}/api/public/ingestion", self.base_url)
    }

    fn trace_url(&self, trace_id: &str) -> String {
        format!("{}/api/public/traces/{}", self.base_url, trace_id)
    }

    fn session_url(&self, session_id: &str) -> String {
        format!("{}/api/public/sessions/{}", self.base_url, session_id)
    }

    fn prompt_url(&self, name: &str) -> String {
        format!("{}/api/public/v2/prompts/{}", self.base_url, name)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    /// Buffer an envelope; post the batch once it reaches `batch_size`.
    /// Send failures are logged, never propagated.
    async fn enqueue(&self, event: IngestionEvent) {
        let full_batch = {
            let mut buffer = self.buffer.lock().unwrap();
            buffer.push(event);
            if buffer.len() >= self.batch_size {
                Some(std::mem::take(&mut *buffer))
            } else {
                None
            }
        };

        if let Some(batch) = full_batch {
            if let Err(e) = self.send_batch(batch).await {
                warn!(error = %e, "Failed to send ingestion batch");
            }
        }
    }

    async fn send_batch(&self, batch: Vec<IngestionEvent>) -> Result<(), DomainError> {
        let count = batch.len();
        let body = serde_json::json!({ "batch": batch });

        let response = self
            .client
            .post_json(&self.ingestion_url(), self.headers(), &body)
            .await
            .map_err(as_tracing_error)?;

        // The ingestion API answers 207 with per-event results
        if let Some(errors) = response.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                warn!(
                    rejected = errors.len(),
                    total = count,
                    "Langfuse rejected ingestion events"
                );
            }
        }

        debug!(events = count, "Sent ingestion batch");
        Ok(())
    }

    async fn read(&self, url: &str, what: &str, id: &str) -> Result<Value, DomainError> {
        self.client
            .get_json(url, self.headers())
            .await
            .map_err(as_tracing_error)?
            .ok_or_else(|| DomainError::not_found(format!("{} '{}' not found", what, id)))
    }
}

#[async_trait]
impl<C: HttpClientTrait> Tracer for LangfuseTracer<C> {
    async fn start_trace(&self, name: &str, options: TraceOptions) -> TraceHandle {
        let trace_id = new_trace_id();

        self.enqueue(IngestionEvent::new(IngestionEventKind::TraceCreate(
            TraceBody {
                id: trace_id.clone(),
                name: name.to_string(),
                timestamp: Utc::now(),
                user_id: options.user_id,
                session_id: options.session_id,
                metadata: options.metadata,
                tags: options.tags,
                input: options.input,
            },
        )))
        .await;

        TraceHandle::new(trace_id)
    }

    async fn record_generation(&self, trace: &TraceHandle, record: GenerationRecord) {
        let end_time = Utc::now();
        let start_time = end_time - chrono::Duration::milliseconds(record.latency_ms as i64);

        self.enqueue(IngestionEvent::new(IngestionEventKind::GenerationCreate(
            GenerationBody {
                id: new_event_id(),
                trace_id: trace.trace_id.clone(),
                name: record.name,
                model: record.model,
                model_parameters: record.model_parameters,
                input: record.input,
                output: record.output,
                usage: record.usage.into(),
                start_time,
                end_time,
            },
        )))
        .await;
    }

    async fn record_score(&self, trace_id: &str, name: &str, value: f64, comment: Option<String>) {
        self.enqueue(IngestionEvent::new(IngestionEventKind::ScoreCreate(
            ScoreBody {
                id: new_event_id(),
                trace_id: trace_id.to_string(),
                name: name.to_string(),
                value,
                comment,
            },
        )))
        .await;
    }

    async fn record_event(&self, trace_id: Option<&str>, name: &str, metadata: Value) {
        let trace_id = match trace_id {
            Some(id) => id.to_string(),
            None => {
                // Standalone event: open a fresh trace to hang it on
                let handle = self
                    .start_trace(name, TraceOptions::new().tags(vec!["event".to_string()]))
                    .await;
                handle.trace_id
            }
        };

        self.enqueue(IngestionEvent::new(IngestionEventKind::EventCreate(
            EventBody {
                id: new_event_id(),
                trace_id,
                name: name.to_string(),
                start_time: Utc::now(),
                metadata: Some(metadata),
            },
        )))
        .await;
    }

    async fn get_trace(&self, trace_id: &str) -> Result<TraceDetail, DomainError> {
        let value = self
            .read(&self.trace_url(trace_id), "Trace", trace_id)
            .await?;
        serde_json::from_value(value)
            .map_err(|e| DomainError::tracing(format!("Malformed trace response: {}", e)))
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionSummary, DomainError> {
        let value = self
            .read(&self.session_url(session_id), "Session", session_id)
            .await?;
        serde_json::from_value(value)
            .map_err(|e| DomainError::tracing(format!("Malformed session response: {}", e)))
    }

    async fn get_prompt(&self, name: &str) -> Result<StoredPrompt, DomainError> {
        let value = self.read(&self.prompt_url(name), "Prompt", name).await?;
        serde_json::from_value(value)
            .map_err(|e| DomainError::tracing(format!("Malformed prompt response: {}", e)))
    }

    async fn flush(&self) -> Result<(), DomainError> {
        let batch = {
            let mut buffer = self.buffer.lock().unwrap();
            std::mem::take(&mut *buffer)
        };

        if batch.is_empty() {
            return Ok(());
        }

        self.send_batch(batch).await
    }
}

/// HTTP Basic auth over `public_key:secret_key`
fn build_auth_header(public_key: &str, secret_key: &str) -> String {
    let credentials = format!("{}:{}", public_key, secret_key);
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}

/// Backend failures surface as tracing errors, not generic provider errors
fn as_tracing_error(error: DomainError) -> DomainError {
    match error {
        DomainError::Provider { message, .. } => DomainError::tracing(message),
        other => other,
    }
}
