//! Connector configuration
//!
//! The connector takes two settings: the Tally API key and an optional list
//! of organization ids. An empty list triggers a self-lookup against
//! `/users/me` to discover the caller's own organization.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Base URL for the Tally REST API
pub const API_BASE_URL: &str = "https://api.tally.so";

/// Connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Tally API key, sent as a bearer token on every request
    pub api_key: String,

    /// Organization ids to sync. Empty means "discover via /users/me".
    #[serde(default)]
    pub organization_ids: Vec<String>,

    /// Base URL override, used by tests against a mock server
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ConnectorConfig {
    /// Parse and validate a config from a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        if value.get("api_key").is_none() {
            return Err(Error::missing_field("api_key"));
        }
        let config: ConnectorConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::config("api_key must not be empty"));
        }
        if self.organization_ids.iter().any(String::is_empty) {
            return Err(Error::config("organization_ids must not contain empty ids"));
        }
        if let Some(base) = &self.base_url {
            url::Url::parse(base)?;
        }
        Ok(())
    }

    /// Resolved base URL for API requests
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(API_BASE_URL)
    }
}

// ============================================================================
// Config Spec (for the `spec` command)
// ============================================================================

/// A single configuration field in the connector spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigField {
    /// Field name
    pub name: &'static str,
    /// Field type ("string", "array", ...)
    #[serde(rename = "type")]
    pub field_type: &'static str,
    /// Whether the field is required
    pub required: bool,
    /// Whether the field should be masked in UIs and logs
    pub secret: bool,
    /// Human-readable description
    pub description: &'static str,
}

/// The connector's configuration specification
pub fn config_spec() -> Vec<ConfigField> {
    vec![
        ConfigField {
            name: "api_key",
            field_type: "string",
            required: true,
            secret: true,
            description: "Your Tally API key",
        },
        ConfigField {
            name: "organization_ids",
            field_type: "array",
            required: false,
            secret: false,
            description: "Organization ids to sync; empty discovers the caller's own organization",
        },
    ]
}
