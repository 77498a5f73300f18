// SPDX-License-Identifier: MIT

//! Log entry type

use crate::value::Value;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One structured event captured from a conversational process.
///
/// Immutable once handed to the write coordinator; ownership passes to the
/// pipeline until the entry is persisted.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    /// Correlation key, e.g. the conversation identity
    pub conversation: String,
    /// Event type tag
    pub kind: String,
    pub data: Value,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn new(conversation: impl Into<String>, kind: impl Into<String>, data: Value) -> Self {
        Self {
            timestamp: Utc::now(),
            conversation: conversation.into(),
            kind: kind.into(),
            data,
        }
    }

    /// The entry as a value graph; redaction paths resolve against this
    /// shape, before any serialization markers exist
    pub fn into_value(self) -> Value {
        let mut fields = BTreeMap::new();
        fields.insert("timestamp".to_string(), Value::Timestamp(self.timestamp));
        fields.insert("conversation".to_string(), Value::String(self.conversation));
        fields.insert("type".to_string(), Value::String(self.kind));
        fields.insert("data".to_string(), self.data);
        Value::Mapping(fields)
    }
}
