//! Envelope types for the Langfuse batch ingestion API
//!
//! Each write becomes one envelope in `POST /api/public/ingestion`:
//! `{ "batch": [ { id, timestamp, type, body }, ... ] }`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::llm::Usage;

/// Generate an event/observation id
pub fn new_event_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a trace id: 32-char lowercase hex, as required by the backend
pub fn new_trace_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// One entry of an ingestion batch
#[derive(Debug, Clone, Serialize)]
pub struct IngestionEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: IngestionEventKind,
}

impl IngestionEvent {
    pub fn new(kind: IngestionEventKind) -> Self {
        Self {
            id: new_event_id(),
            timestamp: Utc::now(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "body")]
pub enum IngestionEventKind {
    #[serde(rename = "trace-create")]
    TraceCreate(TraceBody),
    #[serde(rename = "generation-create")]
    GenerationCreate(GenerationBody),
    #[serde(rename = "score-create")]
    ScoreCreate(ScoreBody),
    #[serde(rename = "event-create")]
    EventCreate(EventBody),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceBody {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationBody {
    pub id: String,
    pub trace_id: String,
    pub name: String,
    pub model: String,
    pub model_parameters: Value,
    pub input: Value,
    pub output: String,
    pub usage: UsageBody,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Token usage in the ingestion schema
#[derive(Debug, Clone, Serialize)]
pub struct UsageBody {
    pub input: u32,
    pub output: u32,
    pub total: u32,
    pub unit: &'static str,
}

impl From<Usage> for UsageBody {
    fn from(usage: Usage) -> Self {
        Self {
            input: usage.prompt_tokens,
            output: usage.completion_tokens,
            total: usage.total_tokens,
            unit: "TOKENS",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBody {
    pub id: String,
    pub trace_id: String,
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    pub id: String,
    pub trace_id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}
