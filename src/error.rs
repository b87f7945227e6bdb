//! Error types for the Tally connector
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Non-2xx responses are fatal for the resource being fetched; retry policy
//! lives in the HTTP transport, never in the fetch loop.

use thiserror::Error;

/// The main error type for the connector
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the config
        message: String,
    },

    /// A required config field is absent
    #[error("Missing required config field: {field}")]
    MissingConfigField {
        /// Name of the missing field
        field: String,
    },

    /// JSON parse failure
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// Transport-level request failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response that survived retries
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// 429 after exhausting retries
    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited {
        /// Server-suggested wait
        retry_after_seconds: u64,
    },

    /// Request timed out
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// All retry attempts used without a definitive response
    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded {
        /// Configured retry count
        max_retries: u32,
    },

    /// Malformed URL in configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    /// A page body did not match the resource's record pointer
    #[error("Failed to extract records from pointer '{pointer}': {message}")]
    RecordExtraction {
        /// The record pointer being applied
        pointer: String,
        /// What went wrong
        message: String,
    },

    // ============================================================================
    // Resource Errors
    // ============================================================================
    /// Stream selection named an unknown resource
    #[error("Resource '{resource}' not found in catalog")]
    ResourceNotFound {
        /// Requested resource name
        resource: String,
    },

    /// Partition resolution failed
    #[error("Partition error for resource '{resource}': {message}")]
    Partition {
        /// Resource being partitioned
        resource: String,
        /// What went wrong
        message: String,
    },

    /// A resource fetch aborted the run
    #[error("Failed to fetch '{resource}' (partition '{partition}'): {source}")]
    Fetch {
        /// Resource being fetched
        resource: String,
        /// Partition whose fetch sequence failed
        partition: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // Template Errors
    // ============================================================================
    /// A path template referenced a variable the partition does not carry
    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable {
        /// The unresolved variable name(s)
        variable: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a record extraction error
    pub fn extraction(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordExtraction {
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    /// Create a partition error
    pub fn partition(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Partition {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Wrap a fetch failure with the resource and partition it aborted
    pub fn fetch(resource: impl Into<String>, partition: impl Into<String>, source: Error) -> Self {
        Self::Fetch {
            resource: resource.into(),
            partition: partition.into(),
            source: Box::new(source),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Check if this error is retryable at the transport layer
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the connector
pub type Result<T> = std::result::Result<T, Error>;
