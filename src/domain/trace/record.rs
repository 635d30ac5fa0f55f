use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::llm::Usage;

/// Handle to a started trace, carrying its opaque id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceHandle {
    pub trace_id: String,
}

impl TraceHandle {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
        }
    }
}

/// Optional context attached when starting a trace
#[derive(Debug, Clone, Default)]
pub struct TraceOptions {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub metadata: Option<Value>,
    pub tags: Vec<String>,
    pub input: Option<Value>,
}

impl TraceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn metadata(mut self, metadata: Option<Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }
}

/// A completed LLM call to be recorded on a trace
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    pub name: String,
    pub model: String,
    pub model_parameters: Value,
    pub input: Value,
    pub output: String,
    pub usage: Usage,
    pub latency_ms: u64,
}

/// A trace as reported back by the tracing backend
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceDetail {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub observations: Vec<Observation>,
}

impl TraceDetail {
    /// The first recorded generation on this trace, if any
    pub fn first_generation(&self) -> Option<&Observation> {
        self.observations
            .iter()
            .find(|o| o.observation_type.eq_ignore_ascii_case("generation"))
    }
}

/// A single observation (generation, event, span) on a trace
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    #[serde(rename = "type")]
    pub observation_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub input: Option<Value>,
    #[serde(default)]
    pub output: Option<Value>,
}

/// Summary of a session as reported by the tracing backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub traces: Vec<SessionTrace>,
}

/// One trace belonging to a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTrace {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A prompt template fetched from the backend's prompt store
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPrompt {
    pub name: String,
    pub version: u32,
    pub prompt: PromptPayload,
}

/// Prompt store payload: a single text template or a chat message list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PromptPayload {
    Text(String),
    Chat(Vec<ChatPromptMessage>),
}

/// One templated message of a chat-type stored prompt
#[derive(Debug, Clone, Deserialize)]
pub struct ChatPromptMessage {
    pub role: String,
    pub content: String,
}
