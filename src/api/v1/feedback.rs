//! Feedback endpoint handler

use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::feedback::{SCORE_MAX, SCORE_MIN};
use crate::api::types::{ApiError, FeedbackRequest, Json};

/// POST /api/v1/feedback
///
/// The trace is looked up first so that feedback for an unknown trace id
/// fails with 404 instead of silently creating a new trace.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<StatusCode, ApiError> {
    if request.trace_id.is_empty() {
        return Err(ApiError::validation("trace_id must not be empty").with_param("trace_id"));
    }

    if !(SCORE_MIN..=SCORE_MAX).contains(&request.score) {
        return Err(
            ApiError::validation("Score must be between 0.0 and 1.0").with_param("score"),
        );
    }

    state
        .tracer
        .get_trace(&request.trace_id)
        .await
        .map_err(ApiError::from)?;

    state
        .tracer
        .record_score(
            &request.trace_id,
            &request.name,
            request.score,
            request.comment.clone(),
        )
        .await;

    info!(
        trace_id = %request.trace_id,
        name = %request.name,
        score = request.score,
        "Feedback recorded"
    );

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::mock::MockLlmProvider;
    use crate::domain::trace::mock::RecordingTracer;
    use serde_json::json;
    use std::sync::Arc;

    fn feedback(trace_id: &str, score: f64) -> FeedbackRequest {
        FeedbackRequest {
            trace_id: trace_id.to_string(),
            score,
            comment: None,
            name: "user-feedback".to_string(),
        }
    }

    fn known_trace() -> serde_json::Value {
        json!({"id": "abc123", "name": "chat_completion"})
    }

    #[tokio::test]
    async fn test_feedback_recorded_for_known_trace() {
        let tracer = Arc::new(RecordingTracer::new().with_trace("abc123", known_trace()));
        let state = AppState::new(Arc::new(MockLlmProvider::new()), tracer.clone());

        let status = submit_feedback(State(state), Json(feedback("abc123", 0.8)))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::OK);
        let scores = tracer.scores.lock().unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].1, "user-feedback");
        assert_eq!(scores[0].2, 0.8);
    }

    #[tokio::test]
    async fn test_unknown_trace_yields_404() {
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(Arc::new(MockLlmProvider::new()), tracer.clone());

        let err = submit_feedback(State(state), Json(feedback("deadbeef", 0.8)))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(tracer.scores.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_score_out_of_range_yields_422() {
        let tracer = Arc::new(RecordingTracer::new().with_trace("abc123", known_trace()));
        let state = AppState::new(Arc::new(MockLlmProvider::new()), tracer.clone());

        let err = submit_feedback(State(state.clone()), Json(feedback("abc123", 1.5)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let err = submit_feedback(State(state), Json(feedback("abc123", -0.1)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        assert!(tracer.scores.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_trace_id_yields_422() {
        let tracer = Arc::new(RecordingTracer::new());
        let state = AppState::new(Arc::new(MockLlmProvider::new()), tracer);

        let err = submit_feedback(State(state), Json(feedback("", 0.5)))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
