//! Session lookup endpoint handler

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::SessionSummary;

/// GET /api/v1/sessions/{session_id}
///
/// Pure read-through to the tracing backend's session query API.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummary>, ApiError> {
    let summary = state
        .tracer
        .get_session(&session_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(summary))
}
