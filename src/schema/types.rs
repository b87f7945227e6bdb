//! Schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Number => write!(f, "number"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::Boolean => write!(f, "boolean"),
            JsonType::Object => write!(f, "object"),
            JsonType::Array => write!(f, "array"),
        }
    }
}

/// JSON Schema property definition
///
/// A property with no type constraint (`json_type: None`) serializes as the
/// empty schema, accepting any value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Property type; `None` means any
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub json_type: Option<JsonType>,

    /// Format hint (e.g., "date-time", "email", "uri")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Nested properties (for objects)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaProperty>>,

    /// Array items schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaProperty>>,
}

impl SchemaProperty {
    /// Create a new property with the given type
    pub fn new(json_type: JsonType) -> Self {
        Self {
            json_type: Some(json_type),
            format: None,
            properties: None,
            items: None,
        }
    }

    /// A property accepting any value
    pub fn any() -> Self {
        Self {
            json_type: None,
            format: None,
            properties: None,
            items: None,
        }
    }

    /// A plain string property
    pub fn string() -> Self {
        Self::new(JsonType::String)
    }

    /// A string with date-time format
    pub fn date_time() -> Self {
        Self::new(JsonType::String).with_format("date-time")
    }

    /// A string with email format
    pub fn email() -> Self {
        Self::new(JsonType::String).with_format("email")
    }

    /// A string with uri format
    pub fn uri() -> Self {
        Self::new(JsonType::String).with_format("uri")
    }

    /// A boolean property
    pub fn boolean() -> Self {
        Self::new(JsonType::Boolean)
    }

    /// An integer property
    pub fn integer() -> Self {
        Self::new(JsonType::Integer)
    }

    /// A number property
    pub fn number() -> Self {
        Self::new(JsonType::Number)
    }

    /// An object property with nested properties
    pub fn object(properties: BTreeMap<String, SchemaProperty>) -> Self {
        Self {
            json_type: Some(JsonType::Object),
            format: None,
            properties: Some(properties),
            items: None,
        }
    }

    /// An array property with an item schema
    pub fn array(items: SchemaProperty) -> Self {
        Self {
            json_type: Some(JsonType::Array),
            format: None,
            properties: None,
            items: Some(Box::new(items)),
        }
    }

    /// Set format hint
    #[must_use]
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }
}

/// Full JSON Schema document for one resource's records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Schema type (always "object" for records)
    #[serde(rename = "type")]
    pub json_type: JsonType,

    /// Object properties
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaProperty>,

    /// Extra API fields are tolerated per schema policy
    #[serde(rename = "additionalProperties")]
    pub additional_properties: bool,
}

impl Default for JsonSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSchema {
    /// Create a new empty record schema
    pub fn new() -> Self {
        Self {
            json_type: JsonType::Object,
            properties: BTreeMap::new(),
            additional_properties: true,
        }
    }

    /// Add a property
    #[must_use]
    pub fn property(mut self, name: &str, property: SchemaProperty) -> Self {
        self.properties.insert(name.to_string(), property);
        self
    }

    /// Get a property
    pub fn get_property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.get(name)
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
