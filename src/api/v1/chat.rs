//! Chat completion endpoint handler

use axum::extract::State;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{validate_metadata, ApiError, ChatRequest, ChatResponse, Json};
use crate::domain::trace::{GenerationRecord, TraceOptions};
use crate::domain::{CompletionRequest, Message};

/// POST /api/v1/chat
pub async fn chat_completion(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    validate_chat_request(&request)?;

    let session_id = request
        .session_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let messages: Vec<Message> = request.messages.iter().map(|m| m.to_domain()).collect();
    let input = serde_json::to_value(&messages).unwrap_or_default();

    info!(
        model = %request.model,
        session_id = %session_id,
        messages = messages.len(),
        "Processing chat completion request"
    );

    let trace = state
        .tracer
        .start_trace(
            "chat_completion",
            TraceOptions::new()
                .user_id(request.user_id.clone())
                .session_id(session_id.clone())
                .metadata(request.metadata.clone())
                .tags(vec!["api".to_string(), "chat".to_string()])
                .input(input.clone()),
        )
        .await;

    let completion_request = CompletionRequest {
        messages,
        temperature: Some(request.temperature),
        max_tokens: request.max_tokens,
    };

    let completion = match state
        .llm_provider
        .complete(&request.model, completion_request)
        .await
    {
        Ok(completion) => completion,
        Err(e) => {
            warn!(trace_id = %trace.trace_id, error = %e, "Chat completion failed");
            state
                .tracer
                .record_event(
                    Some(&trace.trace_id),
                    "generation_failed",
                    json!({ "model": request.model, "error": e.to_string() }),
                )
                .await;
            return Err(e.into());
        }
    };

    state
        .tracer
        .record_generation(
            &trace,
            GenerationRecord {
                name: "openai_completion".to_string(),
                model: completion.model.clone(),
                model_parameters: json!({
                    "temperature": request.temperature,
                    "max_tokens": request.max_tokens,
                }),
                input,
                output: completion.text.clone(),
                usage: completion.usage,
                latency_ms: completion.latency_ms,
            },
        )
        .await;

    Ok(Json(ChatResponse {
        response: completion.text,
        session_id,
        trace_id: trace.trace_id,
        usage: completion.usage,
        model: completion.model,
        latency_ms: completion.latency_ms,
    }))
}

fn validate_chat_request(request: &ChatRequest) -> Result<(), ApiError> {
    if request.messages.is_empty() {
        return Err(ApiError::validation("Messages cannot be empty").with_param("messages"));
    }

    if !(0.0..=2.0).contains(&request.temperature) {
        return Err(
            ApiError::validation("Temperature must be between 0.0 and 2.0")
                .with_param("temperature"),
        );
    }

    if let Some(metadata) = &request.metadata {
        validate_metadata(metadata).map_err(ApiError::from)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::chat::{ChatMessage, ChatMessageRole};
    use crate::domain::llm::mock::MockLlmProvider;
    use crate::domain::trace::mock::RecordingTracer;
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn chat_request(messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            messages,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: Some(500),
            session_id: None,
            user_id: None,
            metadata: None,
        }
    }

    fn user_message(content: &str) -> ChatMessage {
        ChatMessage {
            role: ChatMessageRole::User,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_chat_returns_trace_id_and_usage() {
        let provider = Arc::new(MockLlmProvider::with_text("Hello!"));
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(provider, tracer.clone());

        let response = chat_completion(
            State(state),
            Json(chat_request(vec![user_message("Hi")])),
        )
        .await
        .unwrap();

        assert!(!response.trace_id.is_empty());
        assert_eq!(response.response, "Hello!");
        assert_eq!(response.usage.total_tokens, 15);
        assert!(!response.session_id.is_empty());
        assert_eq!(tracer.generation_count(), 1);
    }

    #[tokio::test]
    async fn test_chat_trace_ids_distinct_across_calls() {
        let provider = Arc::new(MockLlmProvider::with_text("Hello!"));
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(provider, tracer);

        let first = chat_completion(
            State(state.clone()),
            Json(chat_request(vec![user_message("Hi")])),
        )
        .await
        .unwrap();
        let second = chat_completion(
            State(state),
            Json(chat_request(vec![user_message("Hi again")])),
        )
        .await
        .unwrap();

        assert_ne!(first.trace_id, second.trace_id);
    }

    #[tokio::test]
    async fn test_empty_messages_rejected_before_provider() {
        let provider = Arc::new(MockLlmProvider::with_text("unused"));
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(provider.clone(), tracer);

        let err = chat_completion(State(state), Json(chat_request(vec![])))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_temperature_out_of_range_rejected() {
        let provider = Arc::new(MockLlmProvider::with_text("unused"));
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(provider.clone(), tracer);

        let mut request = chat_request(vec![user_message("Hi")]);
        request.temperature = 2.5;

        let err = chat_completion(State(state), Json(request)).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_returns_502_and_records_event() {
        let provider = Arc::new(MockLlmProvider::new().with_error("rate limited"));
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(provider, tracer.clone());

        let err = chat_completion(
            State(state),
            Json(chat_request(vec![user_message("Hi")])),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(tracer.event_names(), vec!["generation_failed".to_string()]);
        assert_eq!(tracer.generation_count(), 0);
    }

    #[tokio::test]
    async fn test_session_id_passed_through() {
        let provider = Arc::new(MockLlmProvider::with_text("Hello!"));
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(provider, tracer.clone());

        let mut request = chat_request(vec![user_message("Hi")]);
        request.session_id = Some("session-42".to_string());

        let response = chat_completion(State(state), Json(request)).await.unwrap();

        assert_eq!(response.session_id, "session-42");
        let started = tracer.started.lock().unwrap();
        assert_eq!(started[0].1.as_deref(), Some("session-42"));
    }

    #[tokio::test]
    async fn test_oversized_metadata_rejected() {
        let provider = Arc::new(MockLlmProvider::with_text("unused"));
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(provider.clone(), tracer);

        let mut request = chat_request(vec![user_message("Hi")]);
        request.metadata = Some(json!({"a": {"b": {"c": {"d": {"e": 1}}}}}));

        let err = chat_completion(State(state), Json(request)).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(provider.call_count(), 0);
    }
}
