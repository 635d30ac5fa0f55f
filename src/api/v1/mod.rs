//! v1 API endpoints

pub mod chat;
pub mod evaluate;
pub mod event;
pub mod feedback;
pub mod prompt_completion;
pub mod sessions;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat_completion))
        .route("/feedback", post(feedback::submit_feedback))
        .route("/prompt-completion", post(prompt_completion::prompt_completion))
        .route("/evaluate", post(evaluate::evaluate_trace))
        .route("/sessions/{session_id}", get(sessions::get_session))
        .route("/event", post(event::record_event))
}
