// SPDX-License-Identifier: MIT

//! Closed value model for log entry payloads
//!
//! Entries arrive as arbitrary nested value graphs. Instead of dispatching
//! on runtime type names, a payload is expressed up front as a closed set of
//! tagged variants that the serializer resolves in a single ordered match.

use chrono::{DateTime, Utc};
use serde_json::Number;
use std::collections::BTreeMap;

/// A node in a log entry's payload graph
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Ordered sequence; element order is preserved
    Sequence(Vec<Value>),
    /// Keyed mapping; `BTreeMap` keeps field order deterministic
    Mapping(BTreeMap<String, Value>),
    Timestamp(DateTime<Utc>),
    /// Raw binary payload, extracted into a blob during serialization
    Binary(Vec<u8>),
    /// Error-shaped value captured from the host process
    ErrorLike {
        name: String,
        message: String,
        stack: Option<String>,
    },
    /// A callable; persisted only as a marker
    Callable,
    /// Anything else; intentionally lossy
    Opaque,
}

impl Value {
    /// Build an error-like value without a stack
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Value::ErrorLike {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Build a binary payload
    pub fn binary(data: impl Into<Vec<u8>>) -> Self {
        Value::Binary(data.into())
    }

    /// Build a mapping from key/value pairs
    pub fn mapping<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Mapping(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// String slice if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Field lookup on a mapping
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(fields) => fields.get(key),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        // non-finite numbers have no JSON form
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Mapping(
                fields
                    .into_iter()
                    .map(|(key, val)| (key, Value::from(val)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
