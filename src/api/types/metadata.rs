//! Bounds validation for caller-supplied metadata mappings
//!
//! Metadata is an open string-keyed mapping; only its size and nesting are
//! constrained, not its schema.

use serde_json::Value;

use crate::domain::DomainError;

const MAX_KEYS: usize = 64;
const MAX_SERIALIZED_BYTES: usize = 16 * 1024;
const MAX_DEPTH: usize = 4;

/// Validate a metadata value against the size/depth bounds
pub fn validate_metadata(metadata: &Value) -> Result<(), DomainError> {
    let object = metadata
        .as_object()
        .ok_or_else(|| DomainError::validation("metadata must be a JSON object"))?;

    if object.len() > MAX_KEYS {
        return Err(DomainError::validation(format!(
            "metadata exceeds {} top-level keys",
            MAX_KEYS
        )));
    }

    let serialized = serde_json::to_vec(metadata)
        .map_err(|e| DomainError::internal(format!("Failed to serialize metadata: {}", e)))?;
    if serialized.len() > MAX_SERIALIZED_BYTES {
        return Err(DomainError::validation(format!(
            "metadata exceeds {} bytes",
            MAX_SERIALIZED_BYTES
        )));
    }

    if depth(metadata) > MAX_DEPTH {
        return Err(DomainError::validation(format!(
            "metadata nesting exceeds depth {}",
            MAX_DEPTH
        )));
    }

    Ok(())
}

fn depth(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}
