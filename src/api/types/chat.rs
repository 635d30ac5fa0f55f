//! Chat endpoint request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::llm::{Message, MessageRole, Usage};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageRole {
    System,
    User,
    Assistant,
}

impl From<ChatMessageRole> for MessageRole {
    fn from(role: ChatMessageRole) -> Self {
        match role {
            ChatMessageRole::System => Self::System,
            ChatMessageRole::User => Self::User,
            ChatMessageRole::Assistant => Self::Assistant,
        }
    }
}

/// A chat message as accepted at the HTTP boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatMessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn to_domain(&self) -> Message {
        Message::new(self.role.into(), self.content.clone())
    }
}

/// Body of `POST /api/v1/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> Option<u32> {
    Some(DEFAULT_MAX_TOKENS)
}

/// Body of a successful chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub trace_id: String,
    pub usage: Usage,
    pub model: String,
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_defaults() {
        let request: ChatRequest = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "Hello"}]
        }))
        .unwrap();

        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(request.max_tokens, Some(DEFAULT_MAX_TOKENS));
        assert!(request.session_id.is_none());
        assert!(request.metadata.is_none());
    }

    #[test]
    fn test_chat_request_explicit_fields() {
        let request: ChatRequest = serde_json::from_value(json!({
            "messages": [{"role": "system", "content": "Be brief."}],
            "model": "gpt-4",
            "temperature": 0.2,
            "max_tokens": 100,
            "session_id": "s1",
            "user_id": "u1",
            "metadata": {"env": "test"}
        }))
        .unwrap();

        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.messages[0].role, ChatMessageRole::System);
        assert_eq!(request.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_message_conversion() {
        let message = ChatMessage {
            role: ChatMessageRole::Assistant,
            content: "Hi".to_string(),
        };

        let domain = message.to_domain();
        assert_eq!(domain.role, MessageRole::Assistant);
        assert_eq!(domain.content, "Hi");
    }
}
