//! Plain action record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A discrete message flowing through a dispatch pipeline.
///
/// The payload is generic; untyped pipelines use the `serde_json::Value`
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action<P = Value> {
    /// Action type (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub action_type: String,
    /// Arbitrary payload. Absent in JSON means `null`/default.
    #[serde(default)]
    pub payload: P,
    /// Any other top-level keys (`meta`, `error`, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<P> Action<P> {
    pub fn new(action_type: impl Into<String>, payload: P) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
            extra: Map::new(),
        }
    }

    /// Sets an extra top-level key and returns self for chaining.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

impl Action<Value> {
    /// Action with a `null` payload.
    pub fn bare(action_type: impl Into<String>) -> Self {
        Self::new(action_type, Value::Null)
    }
}
