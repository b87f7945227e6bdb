//! Partition resolution
//!
//! Two sources of partitions exist: the organization resolver (configured
//! ids, or a one-shot `/users/me` self-lookup) and the parent partitioner
//! (one partition per already-fetched parent record).

use super::types::Partition;
use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Endpoint for the current-user self-lookup
pub const ME_ENDPOINT: &str = "/users/me";

/// Field carrying the caller's organization id in the self-lookup response
pub const ORGANIZATION_ID_FIELD: &str = "organizationId";

// ============================================================================
// Organization Resolver
// ============================================================================

/// Resolves the set of organization partitions for one sync run
///
/// Configured ids are returned verbatim, one partition per id, in input
/// order. With no configured ids, a single authenticated, unpaginated GET
/// against `/users/me` yields the caller's own organization. The result is
/// computed once at run start and handed to every organization-scoped
/// resource; a failed lookup aborts the run with no partial partition list.
#[derive(Debug, Clone, Default)]
pub struct OrganizationResolver;

impl OrganizationResolver {
    /// Resolve the organization partitions for this run
    pub async fn resolve(
        &self,
        client: &HttpClient,
        config: &ConnectorConfig,
    ) -> Result<Vec<Partition>> {
        let org_ids = if config.organization_ids.is_empty() {
            debug!("No organization ids configured, looking up {ME_ENDPOINT}");
            let me: Value = client.get_json(ME_ENDPOINT).await?;
            let org_id = me
                .get(ORGANIZATION_ID_FIELD)
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    Error::partition(
                        "organizations",
                        format!("{ME_ENDPOINT} response has no '{ORGANIZATION_ID_FIELD}' field"),
                    )
                })?;
            vec![org_id.to_string()]
        } else {
            config.organization_ids.clone()
        };

        if org_ids.is_empty() {
            return Err(Error::partition(
                "organizations",
                "no organization to sync",
            ));
        }

        Ok(org_ids
            .into_iter()
            .map(|id| Partition::new(&id).with_string(ORGANIZATION_ID_FIELD, &id))
            .collect())
    }
}

// ============================================================================
// Parent Partitioner
// ============================================================================

/// Derives child partitions from already-fetched parent records
///
/// One partition per distinct parent key, in parent record order.
#[derive(Debug, Clone)]
pub struct ParentPartitioner {
    /// Field to extract from each parent record
    parent_key: String,
    /// Field name placed in each partition
    partition_field: String,
}

impl ParentPartitioner {
    /// Create a new parent partitioner
    pub fn new(parent_key: impl Into<String>, partition_field: impl Into<String>) -> Self {
        Self {
            parent_key: parent_key.into(),
            partition_field: partition_field.into(),
        }
    }

    /// Build partitions from parent records, preserving order and
    /// deduplicating repeated keys
    pub fn partitions(&self, parent_records: &[Value]) -> Vec<Partition> {
        let mut partitions = Vec::new();
        let mut seen = HashSet::new();

        for record in parent_records {
            let Some(key) = extract_key(record, &self.parent_key) else {
                continue;
            };
            if seen.insert(key.clone()) {
                partitions.push(Partition::new(&key).with_string(&self.partition_field, &key));
            }
        }

        partitions
    }
}

/// Extract a string key from a record, supporting dotted paths
fn extract_key(record: &Value, key: &str) -> Option<String> {
    let mut current = record;
    for part in key.split('.') {
        current = current.get(part)?;
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
