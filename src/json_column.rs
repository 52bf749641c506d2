//! Codec for schema-free payloads (customer, line items) persisted in a
//! plain text column.
//!
//! Writes are strict: anything that cannot be serialized rejects the write.
//! Reads are lenient: malformed stored text decodes to an empty object with a
//! warning, so one corrupt row cannot make the whole listing unreadable.

use crate::errors::ServiceError;
use serde_json::Value;
use tracing::warn;

/// Serializes a JSON-representable value into its persisted text form.
pub fn encode(value: &Value) -> Result<String, ServiceError> {
    serde_json::to_string(value)
        .map_err(|e| ServiceError::EncodingError(format!("Unserializable payload: {e}")))
}

/// Parses a persisted text column back into a structured value.
///
/// Decode failures degrade to an empty object rather than surfacing an error
/// to read operations.
pub fn decode(text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "malformed JSON column; substituting empty object");
            Value::Object(serde_json::Map::new())
        }
    }
}
