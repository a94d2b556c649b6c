//! Host-supplied operation parameters
//!
//! The host adapter collects parameters per item however it likes (forms,
//! expressions, upstream data) and exposes them to the connector through the
//! [`ParamSource`] trait. The connector only depends on the typed getters
//! defined here, which keeps the dispatch layer host-agnostic and easy to
//! test with a plain JSON map.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// JSON object type used for bodies and parameter bags
pub type JsonObject = Map<String, Value>;

/// Query parameter map attached to outbound requests
pub type Query = std::collections::HashMap<String, String>;

/// Read access to a single item's parameter bag
pub trait ParamSource {
    /// Raw parameter value by name, if set
    fn raw(&self, name: &str) -> Option<Value>;

    /// Required string parameter
    fn string(&self, name: &str) -> Result<String> {
        self.string_opt(name)
            .ok_or_else(|| Error::missing_parameter(name))
    }

    /// Optional string parameter; empty strings count as absent
    fn string_opt(&self, name: &str) -> Option<String> {
        match self.raw(name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Optional boolean parameter
    fn bool_opt(&self, name: &str) -> Option<bool> {
        match self.raw(name) {
            Some(Value::Bool(b)) => Some(b),
            _ => None,
        }
    }

    /// Boolean parameter with a default for when it is absent
    fn bool_or(&self, name: &str, default: bool) -> bool {
        self.bool_opt(name).unwrap_or(default)
    }

    /// Optional unsigned integer parameter
    fn integer_opt(&self, name: &str) -> Option<u64> {
        match self.raw(name) {
            Some(Value::Number(n)) => n.as_u64(),
            _ => None,
        }
    }

    /// Unsigned integer parameter with a default for when it is absent
    fn integer_or(&self, name: &str, default: u64) -> u64 {
        self.integer_opt(name).unwrap_or(default)
    }

    /// Optional floating point parameter
    fn number_opt(&self, name: &str) -> Option<f64> {
        match self.raw(name) {
            Some(Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    /// Object-valued parameter, or an empty object when absent
    fn object_or_default(&self, name: &str) -> JsonObject {
        match self.raw(name) {
            Some(Value::Object(map)) => map,
            _ => JsonObject::new(),
        }
    }

    /// Parameter holding a JSON document as a string, parsed.
    ///
    /// A malformed document fails before any network I/O.
    fn json_opt(&self, name: &str) -> Result<Option<Value>> {
        match self.raw(name) {
            Some(Value::String(s)) if !s.is_empty() => {
                let parsed = serde_json::from_str(&s).map_err(|e| {
                    Error::invalid_argument(format!("Parameter '{name}' is not valid JSON: {e}"))
                })?;
                Ok(Some(parsed))
            }
            // Hosts that evaluate expressions may hand over the object directly.
            Some(value @ (Value::Object(_) | Value::Array(_))) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    /// Required variant of [`ParamSource::json_opt`]
    fn json(&self, name: &str) -> Result<Value> {
        self.json_opt(name)?
            .ok_or_else(|| Error::missing_parameter(name))
    }
}

impl ParamSource for JsonObject {
    fn raw(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}
