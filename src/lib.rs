//! # Tally Connector
//!
//! A data extraction connector for the Tally form-builder REST API.
//!
//! The connector pulls six entity streams (users, invites, forms, questions,
//! submissions, workspaces) and emits them as schema-tagged JSON lines. All
//! streams are full refresh; the API exposes no incremental cursors.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tally_connector::auth::Authenticator;
//! use tally_connector::config::ConnectorConfig;
//! use tally_connector::engine::SyncEngine;
//! use tally_connector::http::{HttpClient, HttpClientConfig};
//! use tally_connector::partition::OrganizationResolver;
//! use tally_connector::resources::Resource;
//!
//! #[tokio::main]
//! async fn main() -> tally_connector::Result<()> {
//!     let config = ConnectorConfig::from_json(r#"{ "api_key": "tly-..." }"#)?;
//!     let http_config = HttpClientConfig::builder()
//!         .base_url(config.base_url())
//!         .build();
//!     let client = HttpClient::with_auth(http_config, Authenticator::bearer(&config.api_key))?;
//!
//!     // Organizations are resolved once per run, before any stream starts.
//!     let organizations = OrganizationResolver.resolve(&client, &config).await?;
//!
//!     // Messages stream through the sink as each partition completes.
//!     let mut engine = SyncEngine::new(client);
//!     engine
//!         .sync(&Resource::catalog(), &organizations, &mut |message| {
//!             println!("{}", message.to_json_line()?);
//!             Ok(())
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SyncEngine                          │
//! │   resolve partitions → fetch pages → extract → emit JSONL   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬──────────┬──────┴───────┬───────────┬───────────┐
//! │   Auth   │   HTTP   │   Paginate   │ Partition │  Extract  │
//! ├──────────┼──────────┼──────────────┼───────────┼───────────┤
//! │ Bearer   │ GET      │ Page number  │ Org list  │ Pointer   │
//! │          │ Retry    │ Single page  │ Self      │           │
//! │          │ Rate lim │              │ Parent    │           │
//! └──────────┴──────────┴──────────────┴───────────┴───────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Connector configuration
pub mod config;

/// Bearer authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Partition resolution and parent fan-out
pub mod partition;

/// Record extraction from page bodies
pub mod extract;

/// Path template interpolation
pub mod template;

/// Record schemas
pub mod schema;

/// Static resource catalog
pub mod resources;

/// Main execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
