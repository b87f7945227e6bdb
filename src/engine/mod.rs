//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Orchestrates data extraction across resources and
//!   partitions
//! - `SyncConfig` - Configuration for sync operations
//! - Message types for output (Schema, Record, Log)
//!
//! Organization partitions are resolved once by the caller and passed in;
//! the engine never looks them up on its own. Parent-scoped resources
//! (questions, submissions) fan out over the form records fetched during the
//! same run, in parent record order.
//!
//! Messages flow through a caller-supplied sink as each partition completes,
//! so records reach the output before later partitions are fetched and a
//! failure partway through a run leaves everything already synced emitted.

mod types;

pub use types::{LogLevel, Message, SyncConfig, SyncStats};

use crate::error::{Error, Result};
use crate::extract::RecordPointer;
use crate::http::{HttpClient, RequestConfig};
use crate::partition::{ParentPartitioner, Partition};
use crate::resources::{PartitionScope, Resource};
use crate::template;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// HTTP client
    client: HttpClient,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
    /// Parent records fetched this run, keyed by resource name
    parent_cache: HashMap<&'static str, Vec<Value>>,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            config: SyncConfig::default(),
            stats: SyncStats::default(),
            parent_cache: HashMap::new(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Sync the given resources against pre-resolved organization partitions
    ///
    /// Resources are processed in the given order, so a catalog that lists
    /// `forms` before `questions` and `submissions` fills the parent cache
    /// before the children need it. Children selected without their parent
    /// still work: the parent's records are fetched for fan-out without
    /// being emitted.
    pub async fn sync<F>(
        &mut self,
        resources: &[&'static Resource],
        organizations: &[Partition],
        sink: &mut F,
    ) -> Result<()>
    where
        F: FnMut(Message) -> Result<()>,
    {
        let start = Instant::now();

        for resource in resources {
            self.sync_resource(resource, organizations, sink).await?;
        }

        #[allow(clippy::cast_possible_truncation)]
        self.stats.set_duration(start.elapsed().as_millis() as u64);
        Ok(())
    }

    /// Sync a single resource across all of its partitions, pushing each
    /// partition's records through the sink as soon as they arrive
    pub async fn sync_resource<F>(
        &mut self,
        resource: &'static Resource,
        organizations: &[Partition],
        sink: &mut F,
    ) -> Result<()>
    where
        F: FnMut(Message) -> Result<()>,
    {
        sink(Message::info(format!(
            "Starting sync for stream: {}",
            resource.name
        )))?;
        sink(Message::schema(resource))?;

        let partitions = self.partitions_for(resource, organizations).await?;
        debug!(
            resource = resource.name,
            partitions = partitions.len(),
            "resolved partitions"
        );

        let mut stream_records = 0usize;
        for partition in &partitions {
            // The record cap applies to the stream as a whole, not to each
            // partition independently.
            let remaining = if self.config.max_records > 0 {
                let left = self.config.max_records - stream_records;
                if left == 0 {
                    break;
                }
                Some(left)
            } else {
                None
            };

            match self.fetch_partition(resource, partition, remaining).await {
                Ok(records) => {
                    stream_records += records.len();
                    self.cache_parent_records(resource, &records);
                    for record in records {
                        let record = inject_partition_field(record, resource, partition);
                        sink(Message::record(resource.name, record))?;
                    }
                    self.stats.add_partition();
                }
                Err(e) => {
                    self.stats.add_error();
                    if self.config.fail_fast {
                        return Err(Error::fetch(resource.name, partition.id.as_str(), e));
                    }
                    sink(Message::error(format!(
                        "Error in partition {} of {}: {e}",
                        partition.id, resource.name
                    )))?;
                }
            }
        }

        self.stats.add_stream();
        sink(Message::info(format!(
            "Completed sync for {}: {stream_records} records in {} partitions",
            resource.name,
            partitions.len()
        )))?;

        Ok(())
    }

    /// One full fetch sequence: page loop for one resource-partition pair
    ///
    /// `remaining` caps how many records this sequence may contribute to its
    /// stream; `None` means unlimited.
    async fn fetch_partition(
        &mut self,
        resource: &Resource,
        partition: &Partition,
        remaining: Option<usize>,
    ) -> Result<Vec<Value>> {
        let path = template::render(resource.path, partition)?;
        let pointer = RecordPointer::parse(resource.records_pointer)?;
        let paginator = resource.paginator();
        let mut state = paginator.start_state();
        let mut records = Vec::new();

        loop {
            let mut req_config = RequestConfig::new();
            for (key, value) in resource.static_params {
                req_config = req_config.query(*key, *value);
            }
            for (key, value) in paginator.page_params(&state) {
                req_config = req_config.query(key, value);
            }

            let body: Value = self.client.get_json_with_config(&path, req_config).await?;
            self.stats.add_page();

            let page_records = pointer.extract(&body)?;
            let count = page_records.len();
            debug!(
                resource = resource.name,
                partition = %partition.id,
                page = state.token,
                records = count,
                "fetched page"
            );
            records.extend(page_records);

            if let Some(limit) = remaining {
                if records.len() >= limit {
                    records.truncate(limit);
                    break;
                }
            }

            if paginator.advance(count, &mut state).is_done() {
                break;
            }
        }

        self.stats.add_records(records.len());
        Ok(records)
    }

    /// Compute the partition list for a resource
    async fn partitions_for(
        &mut self,
        resource: &Resource,
        organizations: &[Partition],
    ) -> Result<Vec<Partition>> {
        match resource.scope {
            PartitionScope::None => Ok(vec![Partition::new("default")]),
            PartitionScope::Organization => {
                if organizations.is_empty() {
                    return Err(Error::partition(
                        resource.name,
                        "no organization partitions resolved",
                    ));
                }
                Ok(organizations.to_vec())
            }
            PartitionScope::Parent {
                parent,
                parent_key,
                partition_field,
            } => {
                self.ensure_parent_records(resource.name, parent, organizations)
                    .await?;
                let parent_records = &self.parent_cache[parent];
                Ok(ParentPartitioner::new(parent_key, partition_field).partitions(parent_records))
            }
        }
    }

    /// Fetch a parent resource's records for fan-out if this run has not
    /// synced them yet
    async fn ensure_parent_records(
        &mut self,
        child: &str,
        parent: &'static str,
        organizations: &[Partition],
    ) -> Result<()> {
        if self.parent_cache.contains_key(parent) {
            return Ok(());
        }

        let parent_resource = Resource::find(parent)
            .ok_or_else(|| Error::partition(child, format!("unknown parent resource {parent}")))?;

        debug!(
            resource = child,
            parent, "fetching parent records for fan-out"
        );
        // Parent resources are organization-scoped or unscoped, never
        // themselves parent-scoped, so no recursion is needed here.
        let partitions = match parent_resource.scope {
            PartitionScope::None => vec![Partition::new("default")],
            PartitionScope::Organization => {
                if organizations.is_empty() {
                    return Err(Error::partition(child, "no organization partitions resolved"));
                }
                organizations.to_vec()
            }
            PartitionScope::Parent { .. } => {
                return Err(Error::partition(child, "nested parent fan-out is not supported"));
            }
        };
        let mut records = Vec::new();
        for partition in &partitions {
            records.extend(self.fetch_partition(parent_resource, partition, None).await?);
        }
        self.parent_cache.insert(parent, records);
        Ok(())
    }

    /// Record a parent resource's records for later fan-out
    fn cache_parent_records(&mut self, resource: &'static Resource, records: &[Value]) {
        let is_parent = Resource::catalog().iter().any(
            |r| matches!(r.scope, PartitionScope::Parent { parent, .. } if parent == resource.name),
        );
        if is_parent {
            self.parent_cache
                .entry(resource.name)
                .or_default()
                .extend(records.iter().cloned());
        }
    }
}

/// Copy the partition key into a child record when the API omits it
fn inject_partition_field(mut record: Value, resource: &Resource, partition: &Partition) -> Value {
    if let PartitionScope::Parent {
        partition_field, ..
    } = resource.scope
    {
        if let (Value::Object(map), Some(value)) = (&mut record, partition.get(partition_field)) {
            map.entry(partition_field.to_string())
                .or_insert_with(|| value.clone());
        }
    }
    record
}

#[cfg(test)]
mod tests;
