// SPDX-License-Identifier: MIT

//! Field-path redaction of sensitive values
//!
//! Masking runs before serialization, so paths resolve against the original
//! entry structure rather than against `$blob`/`$object` markers.

use crate::value::Value;
use std::collections::BTreeMap;
use thiserror::Error;

const DEFAULT_MASK: char = '*';

/// Errors from redaction path configuration
#[derive(Debug, Error)]
pub enum RedactError {
    #[error("empty redaction path")]
    EmptyPath,
    #[error("invalid redaction path {path:?}: {message}")]
    InvalidPath { path: String, message: String },
}

/// One step of a parsed field path
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// A parsed dot/bracket path expression such as `a.b`, `a[0].c`, or
/// `a["k.with.dots"]`
#[derive(Debug, Clone)]
struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    fn parse(raw: &str) -> Result<Self, RedactError> {
        if raw.is_empty() {
            return Err(RedactError::EmptyPath);
        }
        let invalid = |message: &str| RedactError::InvalidPath {
            path: raw.to_string(),
            message: message.to_string(),
        };

        let mut segments = Vec::new();
        let mut rest = raw;
        while !rest.is_empty() {
            if let Some(stripped) = rest.strip_prefix('.') {
                if segments.is_empty() {
                    return Err(invalid("path cannot start with '.'"));
                }
                if stripped.is_empty() || stripped.starts_with('.') {
                    return Err(invalid("expected field name after '.'"));
                }
                rest = stripped;
                continue;
            }
            if let Some(stripped) = rest.strip_prefix('[') {
                let end = stripped.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let inner = &stripped[..end];
                rest = &stripped[end + 1..];
                segments.push(Self::bracket_segment(inner).ok_or_else(|| {
                    invalid("bracket must hold an index or a quoted field name")
                })?);
                if !rest.is_empty() && !rest.starts_with('.') && !rest.starts_with('[') {
                    return Err(invalid("expected '.' or '[' after ']'"));
                }
                continue;
            }
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            segments.push(Segment::Field(rest[..end].to_string()));
            rest = &rest[end..];
        }

        Ok(Self { segments })
    }

    fn bracket_segment(inner: &str) -> Option<Segment> {
        let quoted = (inner.starts_with('"') && inner.ends_with('"'))
            || (inner.starts_with('\'') && inner.ends_with('\''));
        if quoted && inner.len() >= 2 {
            return Some(Segment::Field(inner[1..inner.len() - 1].to_string()));
        }
        inner.parse::<usize>().ok().map(Segment::Index)
    }
}

/// Masks configured field paths in an entry before serialization.
///
/// For each path, in list order: a resolved string is masked character for
/// character (length preserved); any other resolved value is replaced with
/// `{$redacted: true}`; a path that does not resolve is a no-op, never an
/// error.
#[derive(Debug, Clone)]
pub struct Redactor {
    paths: Vec<FieldPath>,
    mask: char,
}

impl Redactor {
    /// Parse the given path expressions.
    ///
    /// A syntactically invalid expression is a configuration error and is
    /// rejected here; paths that merely fail to resolve at apply time are
    /// silently skipped.
    pub fn new<S: AsRef<str>>(paths: &[S]) -> Result<Self, RedactError> {
        let paths = paths
            .iter()
            .map(|path| FieldPath::parse(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            paths,
            mask: DEFAULT_MASK,
        })
    }

    /// Use `mask` instead of the default `*`
    pub fn with_mask(self, mask: char) -> Self {
        Self { mask, ..self }
    }

    /// Apply every configured path, in order.
    ///
    /// The value is owned by the pipeline at this point, so masking mutates
    /// the pipeline's copy and caller data is never touched.
    pub fn apply(&self, mut value: Value) -> Value {
        for path in &self.paths {
            if let Some(target) = resolve_mut(&mut value, &path.segments) {
                *target = masked(target, self.mask);
            }
        }
        value
    }
}

fn resolve_mut<'a>(value: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in segments {
        current = match (segment, current) {
            (Segment::Field(name), Value::Mapping(fields)) => fields.get_mut(name)?,
            (Segment::Index(index), Value::Sequence(items)) => items.get_mut(*index)?,
            // bracket index against a mapping resolves the numeric key
            (Segment::Index(index), Value::Mapping(fields)) => {
                fields.get_mut(&index.to_string())?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn masked(value: &Value, mask: char) -> Value {
    match value {
        Value::String(s) => Value::String(s.chars().map(|_| mask).collect()),
        _ => {
            let mut fields = BTreeMap::new();
            fields.insert("$redacted".to_string(), Value::Bool(true));
            Value::Mapping(fields)
        }
    }
}

#[cfg(test)]
#[path = "redact_tests.rs"]
mod tests;
