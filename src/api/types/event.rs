//! Event endpoint request type

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/v1/event`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequest {
    pub name: String,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub trace_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_request_minimal() {
        let request: EventRequest = serde_json::from_value(json!({
            "name": "cache_invalidated"
        }))
        .unwrap();

        assert!(request.metadata.is_none());
        assert!(request.trace_id.is_none());
    }
}
