//! Record extraction
//!
//! Each resource declares a pointer locating the array of record objects in
//! a page body. Tally only ever nests records one level deep, so pointers
//! are a dotted object path with a trailing `[*]`: `$[*]`, `$.items[*]`,
//! `$.questions[*]`.

use crate::error::{Error, Result};
use serde_json::Value;

/// A parsed record extraction pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPointer {
    /// Object keys to traverse before the record array; empty for `$[*]`
    segments: Vec<String>,
    /// Original pointer string, kept for error messages
    raw: String,
}

impl RecordPointer {
    /// Parse a pointer like `$[*]` or `$.items[*]`
    pub fn parse(pointer: &str) -> Result<Self> {
        let raw = pointer.to_string();
        let inner = pointer
            .strip_prefix('$')
            .ok_or_else(|| Error::extraction(&raw, "pointer must start with '$'"))?;
        let inner = inner
            .strip_suffix("[*]")
            .ok_or_else(|| Error::extraction(&raw, "pointer must end with '[*]'"))?;

        let segments: Vec<String> = if inner.is_empty() {
            Vec::new()
        } else {
            let inner = inner
                .strip_prefix('.')
                .ok_or_else(|| Error::extraction(&raw, "expected '.' after '$'"))?;
            if inner.is_empty() || inner.split('.').any(str::is_empty) {
                return Err(Error::extraction(&raw, "empty path segment"));
            }
            inner.split('.').map(String::from).collect()
        };

        Ok(Self { segments, raw })
    }

    /// Apply the pointer to a page body, yielding records in page order
    ///
    /// A missing path yields zero records (the paginator treats that as the
    /// end of data); a present value that is not an array is a data error.
    pub fn extract(&self, body: &Value) -> Result<Vec<Value>> {
        let mut current = body;
        for segment in &self.segments {
            match current.get(segment) {
                Some(value) => current = value,
                None => return Ok(Vec::new()),
            }
        }

        match current {
            Value::Array(records) => Ok(records.clone()),
            other => Err(Error::extraction(
                &self.raw,
                format!("expected an array, found {}", json_type_name(other)),
            )),
        }
    }

    /// The original pointer string
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
