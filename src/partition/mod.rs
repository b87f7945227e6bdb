//! Partitioning
//!
//! A partition scopes one fetch sequence: organization-scoped resources get
//! one partition per organization id, child resources get one partition per
//! parent record. Organization partitions are resolved exactly once at run
//! start and passed explicitly into every resource sync.

mod resolver;
mod types;

pub use resolver::{OrganizationResolver, ParentPartitioner, ME_ENDPOINT, ORGANIZATION_ID_FIELD};
pub use types::Partition;
