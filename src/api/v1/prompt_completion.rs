//! Prompt-completion endpoint handler

use std::collections::HashMap;

use axum::extract::State;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, Json, PromptCompletionRequest, PromptCompletionResponse,
};
use crate::domain::prompt::render_template;
use crate::domain::trace::{GenerationRecord, PromptPayload, StoredPrompt, TraceOptions};
use crate::domain::{CompletionRequest, Message};

/// POST /api/v1/prompt-completion
pub async fn prompt_completion(
    State(state): State<AppState>,
    Json(request): Json<PromptCompletionRequest>,
) -> Result<Json<PromptCompletionResponse>, ApiError> {
    if request.prompt_name.is_empty() {
        return Err(ApiError::validation("prompt_name must not be empty").with_param("prompt_name"));
    }

    if !(0.0..=2.0).contains(&request.temperature) {
        return Err(
            ApiError::validation("Temperature must be between 0.0 and 2.0")
                .with_param("temperature"),
        );
    }

    let stored = state
        .tracer
        .get_prompt(&request.prompt_name)
        .await
        .map_err(ApiError::from)?;

    let variables = request.variable_strings();
    let messages = render_prompt(&stored, &variables)?;
    let input = serde_json::to_value(&messages).unwrap_or_default();

    let session_id = request
        .session_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info!(
        prompt_name = %stored.name,
        prompt_version = stored.version,
        model = %request.model,
        "Processing prompt completion request"
    );

    let trace = state
        .tracer
        .start_trace(
            "prompt_completion",
            TraceOptions::new()
                .user_id(request.user_id.clone())
                .session_id(session_id.clone())
                .metadata(Some(json!({
                    "prompt_name": stored.name,
                    "prompt_version": stored.version,
                })))
                .tags(vec!["api".to_string(), "prompt".to_string()])
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
            warn!(trace_id = %trace.trace_id, error = %e, "Prompt completion failed");
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

    Ok(Json(PromptCompletionResponse {
        response: completion.text,
        prompt_name: stored.name,
        prompt_version: stored.version,
        session_id,
        trace_id: trace.trace_id,
        usage: completion.usage,
        model: completion.model,
        latency_ms: completion.latency_ms,
    }))
}

/// Substitute variables into the stored template and produce the message
/// list to forward. A text template becomes a single user message.
fn render_prompt(
    stored: &StoredPrompt,
    variables: &HashMap<String, String>,
) -> Result<Vec<Message>, ApiError> {
    let rendered = match &stored.prompt {
        PromptPayload::Text(template) => {
            let content = render_template(template, variables)
                .map_err(|e| ApiError::validation(e.to_string()).with_param("variables"))?;
            vec![Message::user(content)]
        }
        PromptPayload::Chat(templates) => {
            let mut messages = Vec::with_capacity(templates.len());
            for template in templates {
                let content = render_template(&template.content, variables)
                    .map_err(|e| ApiError::validation(e.to_string()).with_param("variables"))?;
                let message = match template.role.as_str() {
                    "system" => Message::system(content),
                    "assistant" => Message::assistant(content),
                    _ => Message::user(content),
                };
                messages.push(message);
            }
            messages
        }
    };

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::mock::MockLlmProvider;
    use crate::domain::trace::mock::RecordingTracer;
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn prompt_request(name: &str, variables: serde_json::Value) -> PromptCompletionRequest {
        serde_json::from_value(json!({
            "prompt_name": name,
            "variables": variables,
        }))
        .unwrap()
    }

    fn summarize_prompt() -> serde_json::Value {
        json!({
            "name": "summarize",
            "version": 2,
            "prompt": "Summarize the following text in a concise manner:\n\n{{text}}"
        })
    }

    #[tokio::test]
    async fn test_prompt_completion_renders_and_forwards() {
        let provider = Arc::new(MockLlmProvider::with_text("A summary."));
        let tracer = Arc::new(RecordingTracer::new().with_prompt("summarize", summarize_prompt()));
        let state = AppState::new(provider, tracer.clone());

        let response = prompt_completion(
            State(state),
            Json(prompt_request("summarize", json!({"text": "Rust is fast."}))),
        )
        .await
        .unwrap();

        assert_eq!(response.response, "A summary.");
        assert_eq!(response.prompt_name, "summarize");
        assert_eq!(response.prompt_version, 2);
        assert!(!response.trace_id.is_empty());

        // The rendered template is what gets recorded as generation input
        let generations = tracer.generations.lock().unwrap();
        let input = generations[0].1.input.to_string();
        assert!(input.contains("Rust is fast."));
        assert!(!input.contains("{{text}}"));
    }

    #[tokio::test]
    async fn test_unknown_prompt_yields_404() {
        let provider = Arc::new(MockLlmProvider::with_text("unused"));
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(provider.clone(), tracer);

        let err = prompt_completion(
            State(state),
            Json(prompt_request("nonexistent", json!({}))),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_variable_yields_422() {
        let provider = Arc::new(MockLlmProvider::with_text("unused"));
        let tracer = Arc::new(RecordingTracer::new().with_prompt("summarize", summarize_prompt()));
        let state = AppState::new(provider.clone(), tracer);

        let err = prompt_completion(State(state), Json(prompt_request("summarize", json!({}))))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_chat_prompt_preserves_roles() {
        let provider = Arc::new(MockLlmProvider::with_text("Bonjour!"));
        let tracer = Arc::new(RecordingTracer::new().with_prompt(
            "translator",
            json!({
                "name": "translator",
                "version": 1,
                "prompt": [
                    {"role": "system", "content": "Translate everything to {{target_language}}."},
                    {"role": "user", "content": "{{text}}"}
                ]
            }),
        ));
        let state = AppState::new(provider, tracer.clone());

        let response = prompt_completion(
            State(state),
            Json(prompt_request(
                "translator",
                json!({"target_language": "French", "text": "Hello"}),
            )),
        )
        .await
        .unwrap();

        assert_eq!(response.response, "Bonjour!");

        let generations = tracer.generations.lock().unwrap();
        let input = &generations[0].1.input;
        assert_eq!(input[0]["role"], "system");
        assert!(input[0]["content"].as_str().unwrap().contains("French"));
        assert_eq!(input[1]["content"], "Hello");
    }

    #[tokio::test]
    async fn test_provider_error_yields_502() {
        let provider = Arc::new(MockLlmProvider::new().with_error("upstream down"));
        let tracer = Arc::new(RecordingTracer::new().with_prompt("summarize", summarize_prompt()));
        let state = AppState::new(provider, tracer.clone());

        let err = prompt_completion(
            State(state),
            Json(prompt_request("summarize", json!({"text": "abc"}))),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(tracer.event_names(), vec!["generation_failed".to_string()]);
    }
}
