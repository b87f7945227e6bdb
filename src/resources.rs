//! Resource catalog
//!
//! One immutable descriptor per Tally entity type: path template, record
//! extraction pointer, primary key, pagination parameters, partition scope,
//! and record schema. The descriptors are static data; all fetch logic
//! lives in the engine.

use crate::pagination::{PageNumberPaginator, Paginator, SinglePagePaginator};
use crate::schema::{JsonSchema, SchemaProperty};

/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// How a resource's partitions are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionScope {
    /// A single unscoped fetch sequence
    None,
    /// One fetch sequence per resolved organization
    Organization,
    /// One fetch sequence per parent record
    Parent {
        /// Name of the parent resource
        parent: &'static str,
        /// Field extracted from each parent record
        parent_key: &'static str,
        /// Field name injected into the child's path template
        partition_field: &'static str,
    },
}

/// Immutable descriptor for one entity type
#[derive(Debug, Clone)]
pub struct Resource {
    /// Resource name, used to tag the record stream
    pub name: &'static str,
    /// Path template; may reference partition keys
    pub path: &'static str,
    /// Record extraction pointer into the page body
    pub records_pointer: &'static str,
    /// Primary key field(s)
    pub primary_key: &'static [&'static str],
    /// Whether the endpoint pages at all
    pub paginated: bool,
    /// Page size sent as `limit`, where the endpoint supports it
    pub page_size: Option<u32>,
    /// Static query parameters sent with every request
    pub static_params: &'static [(&'static str, &'static str)],
    /// Partition scope
    pub scope: PartitionScope,
    /// Record schema builder
    schema: fn() -> JsonSchema,
}

impl Resource {
    /// The resource's record schema
    pub fn schema(&self) -> JsonSchema {
        (self.schema)()
    }

    /// Paginator for this resource's fetch sequences
    pub fn paginator(&self) -> Box<dyn Paginator> {
        if !self.paginated {
            return Box::new(SinglePagePaginator);
        }
        let mut paginator = PageNumberPaginator::new(PAGE_PARAM);
        if let Some(size) = self.page_size {
            paginator = paginator.with_page_size(LIMIT_PARAM, size);
        }
        Box::new(paginator)
    }

    /// The default catalog, in sync order: parents before children
    ///
    /// `webhooks` is defined below but deliberately excluded pending an
    /// upstream decision on its schema stability.
    pub fn catalog() -> Vec<&'static Resource> {
        vec![
            &USERS,
            &INVITES,
            &FORMS,
            &QUESTIONS,
            &SUBMISSIONS,
            &WORKSPACES,
        ]
    }

    /// Look up a catalog resource by name
    pub fn find(name: &str) -> Option<&'static Resource> {
        Self::catalog().into_iter().find(|r| r.name == name)
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Organization members
pub static USERS: Resource = Resource {
    name: "users",
    path: "/organizations/{{ organizationId }}/users",
    records_pointer: "$[*]",
    primary_key: &["id"],
    paginated: false,
    page_size: None,
    static_params: &[],
    scope: PartitionScope::Organization,
    schema: users_schema,
};

/// Pending organization invites
pub static INVITES: Resource = Resource {
    name: "invites",
    path: "/organizations/{{ organizationId }}/invites",
    records_pointer: "$[*]",
    primary_key: &["id"],
    paginated: false,
    page_size: None,
    static_params: &[],
    scope: PartitionScope::Organization,
    schema: invites_schema,
};

/// Forms, the parent of questions and submissions
pub static FORMS: Resource = Resource {
    name: "forms",
    path: "/forms",
    records_pointer: "$.items[*]",
    primary_key: &["id"],
    paginated: true,
    page_size: Some(500),
    static_params: &[],
    scope: PartitionScope::Organization,
    schema: forms_schema,
};

/// Questions, one fetch per form
pub static QUESTIONS: Resource = Resource {
    name: "questions",
    path: "/forms/{{ formId }}/questions",
    records_pointer: "$.questions[*]",
    primary_key: &["id"],
    paginated: false,
    page_size: None,
    static_params: &[],
    scope: PartitionScope::Parent {
        parent: "forms",
        parent_key: "id",
        partition_field: "formId",
    },
    schema: questions_schema,
};

/// Submissions, one paginated walk per form
pub static SUBMISSIONS: Resource = Resource {
    name: "submissions",
    path: "/forms/{{ formId }}/submissions",
    records_pointer: "$.submissions[*]",
    primary_key: &["id"],
    paginated: true,
    page_size: None,
    static_params: &[("filter", "all")],
    scope: PartitionScope::Parent {
        parent: "forms",
        parent_key: "id",
        partition_field: "formId",
    },
    schema: submissions_schema,
};

/// Workspaces with their members and invites
pub static WORKSPACES: Resource = Resource {
    name: "workspaces",
    path: "/workspaces",
    records_pointer: "$.items[*]",
    primary_key: &["id"],
    paginated: true,
    page_size: None,
    static_params: &[],
    scope: PartitionScope::None,
    schema: workspaces_schema,
};

/// Webhooks: defined but not part of the default catalog
pub static WEBHOOKS: Resource = Resource {
    name: "webhooks",
    path: "/webhooks",
    records_pointer: "$.webhooks[*]",
    primary_key: &["id"],
    paginated: true,
    page_size: Some(100),
    static_params: &[],
    scope: PartitionScope::None,
    schema: webhooks_schema,
};

// ============================================================================
// Schemas
// ============================================================================

/// The member fields shared by `users` records and workspace `members`
fn member_properties() -> std::collections::BTreeMap<String, SchemaProperty> {
    [
        ("id", SchemaProperty::string()),
        ("firstName", SchemaProperty::string()),
        ("lastName", SchemaProperty::string()),
        ("fullName", SchemaProperty::string()),
        ("email", SchemaProperty::email()),
        ("avatarUrl", SchemaProperty::uri()),
        ("organizationId", SchemaProperty::string()),
        ("hasTwoFactorEnabled", SchemaProperty::boolean()),
        ("createdAt", SchemaProperty::date_time()),
        ("updatedAt", SchemaProperty::date_time()),
        ("subscriptionPlan", SchemaProperty::string()),
        ("ssoIsConnectedWithGoogle", SchemaProperty::boolean()),
        ("ssoIsConnectedWithApple", SchemaProperty::boolean()),
        ("hasPasswordSet", SchemaProperty::boolean()),
        ("authenticationMethodsCount", SchemaProperty::integer()),
        ("emailDomain", SchemaProperty::string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn users_schema() -> JsonSchema {
    let mut schema = JsonSchema::new();
    for (name, property) in member_properties() {
        schema.properties.insert(name, property);
    }
    schema
        .property("isBlocked", SchemaProperty::boolean())
        .property("isDeleted", SchemaProperty::boolean())
        .property("timezone", SchemaProperty::string())
}

fn invites_schema() -> JsonSchema {
    JsonSchema::new()
        .property("id", SchemaProperty::string())
        .property("organizationId", SchemaProperty::string())
        .property("email", SchemaProperty::email())
        .property("createdAt", SchemaProperty::date_time())
        .property("updatedAt", SchemaProperty::date_time())
}

fn forms_schema() -> JsonSchema {
    JsonSchema::new()
        .property("id", SchemaProperty::string())
        .property("name", SchemaProperty::string())
        .property("workspaceId", SchemaProperty::string())
        .property("status", SchemaProperty::string())
        .property("numberOfSubmissions", SchemaProperty::integer())
        .property("isClosed", SchemaProperty::boolean())
        .property("createdAt", SchemaProperty::date_time())
        .property("updatedAt", SchemaProperty::date_time())
        .property(
            "payments",
            SchemaProperty::object(
                [
                    ("amount".to_string(), SchemaProperty::number()),
                    ("currency".to_string(), SchemaProperty::string()),
                ]
                .into_iter()
                .collect(),
            ),
        )
}

fn questions_schema() -> JsonSchema {
    JsonSchema::new()
        .property("id", SchemaProperty::string())
        .property("type", SchemaProperty::string())
        .property("title", SchemaProperty::string())
        .property("isTitleModifiedByUser", SchemaProperty::boolean())
        .property("formId", SchemaProperty::string())
        .property("isDeleted", SchemaProperty::boolean())
        .property("numberOfResponses", SchemaProperty::integer())
        .property("createdAt", SchemaProperty::date_time())
        .property("updatedAt", SchemaProperty::date_time())
        .property(
            "fields",
            SchemaProperty::object(
                [
                    ("uuid".to_string(), SchemaProperty::string()),
                    ("type".to_string(), SchemaProperty::string()),
                    ("blockGroupUuid".to_string(), SchemaProperty::string()),
                    ("title".to_string(), SchemaProperty::integer()),
                ]
                .into_iter()
                .collect(),
            ),
        )
        .property("hasResponses", SchemaProperty::boolean())
}

fn submissions_schema() -> JsonSchema {
    JsonSchema::new()
        .property("id", SchemaProperty::string())
        .property("formId", SchemaProperty::string())
        .property("isCompleted", SchemaProperty::boolean())
        .property("submittedAt", SchemaProperty::date_time())
        .property(
            "responses",
            SchemaProperty::array(SchemaProperty::object(
                [
                    ("questionId".to_string(), SchemaProperty::string()),
                    ("value".to_string(), SchemaProperty::any()),
                ]
                .into_iter()
                .collect(),
            )),
        )
}

fn workspaces_schema() -> JsonSchema {
    JsonSchema::new()
        .property("id", SchemaProperty::string())
        .property("name", SchemaProperty::string())
        .property(
            "members",
            SchemaProperty::array(SchemaProperty::object(member_properties())),
        )
        .property(
            "invites",
            SchemaProperty::array(SchemaProperty::object(
                [
                    ("id".to_string(), SchemaProperty::string()),
                    ("email".to_string(), SchemaProperty::email()),
                    (
                        "workspaceIds".to_string(),
                        SchemaProperty::array(SchemaProperty::string()),
                    ),
                ]
                .into_iter()
                .collect(),
            )),
        )
        .property("createdByUserId", SchemaProperty::string())
        .property("createdAt", SchemaProperty::date_time())
        .property("updatedAt", SchemaProperty::date_time())
}

fn webhooks_schema() -> JsonSchema {
    JsonSchema::new()
        .property("id", SchemaProperty::string())
        .property("formId", SchemaProperty::string())
        .property("url", SchemaProperty::uri())
        .property("signingSecret", SchemaProperty::string())
        .property(
            "httpHeaders",
            SchemaProperty::array(SchemaProperty::object(
                [
                    ("name".to_string(), SchemaProperty::string()),
                    ("value".to_string(), SchemaProperty::string()),
                ]
                .into_iter()
                .collect(),
            )),
        )
        .property("eventTypes", SchemaProperty::array(SchemaProperty::string()))
        .property("externalSubscriber", SchemaProperty::string())
        .property("isEnabled", SchemaProperty::boolean())
        .property("lastSyncedAt", SchemaProperty::date_time())
        .property("createdAt", SchemaProperty::date_time())
        .property("updatedAt", SchemaProperty::date_time())
}
