//! CLI runner - executes commands

use crate::auth::Authenticator;
use crate::cli::commands::{Cli, Commands};
use crate::config::{config_spec, ConnectorConfig};
use crate::engine::{Message, SyncConfig, SyncEngine};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::partition::{OrganizationResolver, ME_ENDPOINT};
use crate::resources::Resource;
use serde_json::json;
use std::fs;
use tracing::{debug, error, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check { config_json } => self.check(config_json.as_deref()).await,
            Commands::Discover { config_json } => self.discover(config_json.as_deref()),
            Commands::Read {
                streams,
                config_json,
                max_records,
                keep_going,
            } => {
                self.read(
                    streams.as_deref(),
                    config_json.as_deref(),
                    *max_records,
                    *keep_going,
                )
                .await
            }
            Commands::Spec => self.spec(),
            Commands::Streams => self.streams(),
        }
    }

    /// Load configuration, inline JSON taking precedence over the file
    fn load_config(&self, inline: Option<&str>) -> Result<ConnectorConfig> {
        if let Some(json_str) = inline {
            return ConnectorConfig::from_json(json_str);
        }

        if let Some(path) = &self.cli.config {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
            return ConnectorConfig::from_json(&content);
        }

        Err(Error::config(
            "No configuration provided (use --config or --config-json)",
        ))
    }

    /// Build an authenticated HTTP client for the configured API
    fn build_client(config: &ConnectorConfig) -> Result<HttpClient> {
        let http_config = HttpClientConfig::builder()
            .base_url(config.base_url())
            .build();
        HttpClient::with_auth(http_config, Authenticator::bearer(&config.api_key))
    }

    /// Check connection by fetching the caller's own profile
    async fn check(&self, config_json: Option<&str>) -> Result<()> {
        let config = self.load_config(config_json)?;
        let client = Self::build_client(&config)?;

        info!("Checking connection to {}", config.base_url());
        match client.get(ME_ENDPOINT).await {
            Ok(_) => {
                Self::output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "message": "Connection successful"
                    }
                }));
                Ok(())
            }
            Err(e) => {
                Self::output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Connection failed: {e}")
                    }
                }));
                Err(e)
            }
        }
    }

    /// Emit the stream catalog with schemas
    fn discover(&self, config_json: Option<&str>) -> Result<()> {
        // Config is validated when given, but discovery itself is offline.
        if config_json.is_some() || self.cli.config.is_some() {
            self.load_config(config_json)?;
        }

        let streams: Vec<serde_json::Value> = Resource::catalog()
            .iter()
            .map(|resource| {
                let primary_key: Vec<Vec<String>> = resource
                    .primary_key
                    .iter()
                    .map(|k| vec![(*k).to_string()])
                    .collect();
                json!({
                    "name": resource.name,
                    "json_schema": resource.schema().to_json(),
                    "supported_sync_modes": ["full_refresh"],
                    "source_defined_primary_key": primary_key
                })
            })
            .collect();

        Self::output_message(&json!({
            "type": "CATALOG",
            "catalog": { "streams": streams }
        }));
        Ok(())
    }

    /// Read data from the selected streams
    async fn read(
        &self,
        streams: Option<&str>,
        config_json: Option<&str>,
        max_records: Option<usize>,
        keep_going: bool,
    ) -> Result<()> {
        let config = self.load_config(config_json)?;
        let client = Self::build_client(&config)?;

        let selected = Self::select_streams(streams)?;
        debug!(
            streams = ?selected.iter().map(|r| r.name).collect::<Vec<_>>(),
            "selected streams"
        );

        // Organizations are resolved once, up front, and passed to every
        // scoped stream in the run.
        let organizations = OrganizationResolver.resolve(&client, &config).await?;
        info!(organizations = organizations.len(), "resolved partitions");

        let mut sync_config = SyncConfig::new().with_fail_fast(!keep_going);
        if let Some(max) = max_records {
            sync_config = sync_config.with_max_records(max);
        }

        // Messages stream to the output as the engine produces them, so a
        // long run shows progress and a late failure keeps earlier records.
        let mut engine = SyncEngine::new(client).with_config(sync_config);
        engine
            .sync(&selected, &organizations, &mut |message| {
                Self::emit(&message)
            })
            .await?;

        let stats = engine.stats();
        info!(
            records = stats.records_synced,
            pages = stats.pages_fetched,
            streams = stats.streams_synced,
            errors = stats.errors,
            duration_ms = stats.duration_ms,
            "sync complete"
        );
        Ok(())
    }

    /// Print the configuration specification
    fn spec(&self) -> Result<()> {
        Self::output_message(&json!({
            "type": "SPEC",
            "spec": { "fields": config_spec() }
        }));
        Ok(())
    }

    /// List stream names
    fn streams(&self) -> Result<()> {
        for resource in Resource::catalog() {
            println!("{}", resource.name);
        }
        Ok(())
    }

    /// Resolve a comma-separated stream selection against the catalog
    fn select_streams(streams: Option<&str>) -> Result<Vec<&'static Resource>> {
        match streams {
            None => Ok(Resource::catalog()),
            Some(list) => {
                let mut selected = Vec::new();
                for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    let resource = Resource::find(name)
                        .ok_or_else(|| Error::ResourceNotFound {
                            resource: name.to_string(),
                        })?;
                    selected.push(resource);
                }
                if selected.is_empty() {
                    return Err(Error::config("no streams selected"));
                }
                Ok(selected)
            }
        }
    }

    /// Route one engine message: schemas and records to stdout, logs to the
    /// tracing subscriber
    fn emit(message: &Message) -> Result<()> {
        match message {
            Message::Log { level, message } => {
                match level {
                    crate::engine::LogLevel::Debug => debug!("{message}"),
                    crate::engine::LogLevel::Info => info!("{message}"),
                    crate::engine::LogLevel::Warn => warn!("{message}"),
                    crate::engine::LogLevel::Error => error!("{message}"),
                }
                Ok(())
            }
            other => {
                println!("{}", other.to_json_line()?);
                Ok(())
            }
        }
    }

    /// Print a JSON message to stdout
    fn output_message(message: &serde_json::Value) {
        println!("{message}");
    }
}
