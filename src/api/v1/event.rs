//! Event endpoint handler

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{validate_metadata, ApiError, EventRequest, Json};

/// POST /api/v1/event
pub async fn record_event(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> Result<StatusCode, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::validation("Event name must not be empty").with_param("name"));
    }

    if let Some(metadata) = &request.metadata {
        validate_metadata(metadata).map_err(ApiError::from)?;
    }

    state
        .tracer
        .record_event(
            request.trace_id.as_deref(),
            &request.name,
            request.metadata.clone().unwrap_or_else(|| json!({})),
        )
        .await;

    info!(name = %request.name, "Event recorded");

    Ok(StatusCode::OK)
}
