//! Feedback endpoint request type

use serde::{Deserialize, Serialize};

/// Inclusive bounds for feedback scores
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 1.0;

pub const DEFAULT_SCORE_NAME: &str = "user-feedback";

/// Body of `POST /api/v1/feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub trace_id: String,
    /// Score between 0.0 and 1.0
    pub score: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default = "default_score_name")]
    pub name: String,
}

fn default_score_name() -> String {
    DEFAULT_SCORE_NAME.to_string()
}
