//! Canonical success envelope.
//!
//! Every buffered success is wrapped as
//! `{"data": <payload>, "metadata": {"timestamp", "version"}}`.
//! Streaming responses bypass the envelope and relay raw bytes.

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::GatewayError;

pub const ENVELOPE_VERSION: &str = "1.0";

/// Wrap a payload in the canonical envelope.
pub fn envelope(payload: Value) -> Json<Value> {
    Json(json!({
        "data": format_payload(payload),
        "metadata": {
            "timestamp": Utc::now().to_rfc3339(),
            "version": ENVELOPE_VERSION,
        },
    }))
}

/// Wrap a payload, or render a missing one as a 404 of the taxonomy.
///
/// Callers choose the semantics: a `None` here means "lookup miss", not
/// "empty result".
pub fn envelope_or_not_found(
    payload: Option<Value>,
    resource: &str,
    id: &str,
) -> Result<Json<Value>, GatewayError> {
    match payload {
        Some(value) => Ok(envelope(value)),
        None => Err(GatewayError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }),
    }
}

/// Normalization rules, in order: null stays null, mappings and sequences
/// pass through as-is, scalars become `{"value": ...}`.
fn format_payload(payload: Value) -> Value {
    match payload {
        Value::Null => Value::Null,
        Value::Object(map) => Value::Object(map),
        Value::Array(items) => Value::Array(items),
        scalar => json!({ "value": scalar }),
    }
}
