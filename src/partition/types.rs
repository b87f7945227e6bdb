//! Partition value type

use serde_json::{Map, Value};

/// A single partition: key-value pairs that parameterize a resource's path
/// template, fetched and paginated independently per value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Unique identifier for this partition
    pub id: String,
    /// Values to inject into path templates
    pub values: Map<String, Value>,
}

impl Partition {
    /// Create a new partition with no values
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: Map::new(),
        }
    }

    /// Add a string value
    #[must_use]
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a string value by key
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }
}
