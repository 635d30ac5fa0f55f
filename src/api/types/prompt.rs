//! Prompt-completion endpoint types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::chat::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::domain::llm::Usage;

/// Body of `POST /api/v1/prompt-completion`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptCompletionRequest {
    pub prompt_name: String,
    #[serde(default)]
    pub variables: Option<HashMap<String, Value>>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl PromptCompletionRequest {
    /// Template variables as strings; non-string JSON values keep their
    /// JSON rendering.
    pub fn variable_strings(&self) -> HashMap<String, String> {
        self.variables
            .iter()
            .flatten()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect()
    }
}

/// Body of a successful prompt completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptCompletionResponse {
    pub response: String,
    pub prompt_name: String,
    pub prompt_version: u32,
    pub session_id: String,
    pub trace_id: String,
    pub usage: Usage,
    pub model: String,
    pub latency_ms: u64,
}
