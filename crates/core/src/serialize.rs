// SPDX-License-Identifier: MIT

//! Serialization of value graphs into persistable documents
//!
//! Converts a [`Value`] graph into plain JSON, replacing callables, errors,
//! and opaque values with typed markers and extracting binary payloads into
//! content-addressed [`Blob`] records. The document never contains raw
//! binary: each payload is replaced by a locator string obtained from the
//! configured locate function before the document is queued.

use crate::value::Value;
use chrono::SecondsFormat;
use serde_json::{json, Map, Value as Json};
use sha2::{Digest, Sha256};

/// Content type assigned to extracted blobs
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content-addressed binary payload extracted from a log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
    /// Lowercase hex SHA-256 of `data`
    pub hash: String,
    pub content_type: String,
}

impl Blob {
    /// Build a blob from raw bytes with the default content type
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let hash = content_hash(&data);
        Self {
            data,
            hash,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

/// Hex SHA-256 digest of the given bytes
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex_encode(&hasher.finalize())
}

// Hex encoding helper
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Serialize a value graph for persistence.
///
/// Traversal is depth-first, left-to-right. Each binary payload becomes a
/// [`Blob`]: `locate` is called exactly once per payload to obtain the
/// locator string embedded in the document, and the blob is appended to
/// `blobs`. No input shape is an error; unsupported values degrade to an
/// opaque marker instead of failing the entry.
pub fn serialize<L>(value: Value, locate: &L, blobs: &mut Vec<Blob>) -> Json
where
    L: Fn(&Blob) -> String,
{
    match value {
        Value::Callable => json!({ "$function": null }),
        Value::ErrorLike {
            name,
            message,
            stack,
        } => json!({ "$error": { "name": name, "message": message, "stack": stack } }),
        Value::Binary(data) => {
            let blob = Blob::from_bytes(data);
            let location = locate(&blob);
            blobs.push(blob);
            json!({ "$blob": location })
        }
        Value::Sequence(items) => Json::Array(
            items
                .into_iter()
                .map(|item| serialize(item, locate, blobs))
                .collect(),
        ),
        Value::Mapping(fields) => {
            let mut map = Map::new();
            for (key, field) in fields {
                map.insert(key, serialize(field, locate, blobs));
            }
            Json::Object(map)
        }
        Value::Timestamp(ts) => Json::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
        Value::Opaque => json!({ "$object": null }),
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(b),
        Value::Number(n) => Json::Number(n),
        Value::String(s) => Json::String(s),
    }
}

#[cfg(test)]
#[path = "serialize_tests.rs"]
mod tests;
