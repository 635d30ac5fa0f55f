//! Evaluation endpoint types

use serde::{Deserialize, Serialize};

use super::chat::DEFAULT_MODEL;

/// Body of `POST /api/v1/evaluate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub trace_id: String,
    /// Name of the evaluation criteria, e.g. "helpfulness"
    pub criteria: String,
    /// Model used for the judge call
    #[serde(default = "default_model")]
    pub judge_model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Body of a successful evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub trace_id: String,
    pub name: String,
    pub value: f64,
    pub judge_model: String,
}
