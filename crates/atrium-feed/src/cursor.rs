//! Pagination cursor
//!
//! An opaque position token: the server hands one back with each page and the
//! client echoes it on the next request. Absence means "start from the
//! beginning". The client never inspects the keys; it only round-trips them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Opaque pagination token for the next page of a result set.
///
/// Deserializes directly from a response's `cursor` object. Encodes back onto
/// a request as one `cursor[key]=value` query parameter per entry, in key
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(BTreeMap<String, Value>);

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert a raw cursor field. Primarily useful in tests and fixtures;
    /// real cursors come from deserialized responses.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Encode as `cursor[key]=value` query pairs, in key order.
    ///
    /// Non-scalar or null fields are skipped; the server only issues scalar
    /// cursor fields.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(key, value)| {
                scalar_to_string(value).map(|v| (format!("cursor[{key}]"), v))
            })
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
