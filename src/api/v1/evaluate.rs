//! Evaluation endpoint handler: LLM-as-judge scoring of a recorded trace

use axum::extract::State;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, EvaluationRequest, EvaluationResponse, Json};
use crate::domain::evaluation::{build_judge_messages, parse_judge_score};
use crate::domain::CompletionRequest;

/// POST /api/v1/evaluate
pub async fn evaluate_trace(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    if request.trace_id.is_empty() {
        return Err(ApiError::validation("trace_id must not be empty").with_param("trace_id"));
    }

    if request.criteria.trim().is_empty() {
        return Err(ApiError::validation("criteria must not be empty").with_param("criteria"));
    }

    let detail = state
        .tracer
        .get_trace(&request.trace_id)
        .await
        .map_err(ApiError::from)?;

    let generation = detail.first_generation().ok_or_else(|| {
        ApiError::not_found(format!(
            "Trace '{}' has no recorded generation to evaluate",
            request.trace_id
        ))
    })?;

    let judge_input = generation.input.clone().unwrap_or(Value::Null);
    let judge_output = generation
        .output
        .as_ref()
        .map(value_to_text)
        .unwrap_or_default();

    let messages = build_judge_messages(&request.criteria, &judge_input, &judge_output);

    let completion = state
        .llm_provider
        .complete(&request.judge_model, CompletionRequest::new(messages))
        .await
        .map_err(|e| {
            warn!(trace_id = %request.trace_id, error = %e, "Judge call failed");
            ApiError::from(e)
        })?;

    let score = match parse_judge_score(&completion.text) {
        Ok(score) => score,
        Err(e) => {
            state
                .tracer
                .record_event(
                    Some(&request.trace_id),
                    "evaluation_parse_failure",
                    json!({
                        "criteria": request.criteria,
                        "judge_model": completion.model,
                        "raw_output": completion.text,
                    }),
                )
                .await;
            return Err(e.into());
        }
    };

    state
        .tracer
        .record_score(
            &request.trace_id,
            &request.criteria,
            score,
            Some(format!("llm-judge ({})", completion.model)),
        )
        .await;

    info!(
        trace_id = %request.trace_id,
        criteria = %request.criteria,
        score,
        "Evaluation recorded"
    );

    Ok(Json(EvaluationResponse {
        trace_id: request.trace_id,
        name: request.criteria,
        value: score,
        judge_model: completion.model,
    }))
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
