//! Resource Registry - known resource kinds
//!
//! Every named resource type differs only in its collection path, the
//! `_embedded` wrapper key of its list responses, and whether it lives in a
//! parent tree. Those three facts are all a lookup needs.

use crate::api::{ApiError, Result};
use serde::Serialize;

/// Definition of one resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceKind {
    /// Key used on the command line
    pub key: &'static str,
    /// Human-readable name used in error messages
    pub display_name: &'static str,
    /// Collection path segments under `/api/{version}/`
    pub collection: &'static [&'static str],
    /// Key of the item list under `_embedded`
    pub embedded_key: &'static str,
    /// Items carry a `_links.parent` and can be resolved by path
    pub hierarchical: bool,
}

impl ResourceKind {
    pub const fn new(
        key: &'static str,
        display_name: &'static str,
        collection: &'static [&'static str],
        embedded_key: &'static str,
    ) -> Self {
        Self {
            key,
            display_name,
            collection,
            embedded_key,
            hierarchical: false,
        }
    }

    pub const fn tree(mut self) -> Self {
        self.hierarchical = true;
        self
    }
}

pub const GROUPS: ResourceKind =
    ResourceKind::new("groups", "Group", &["cmp", "groups"], "groups").tree();
pub const ENVIRONMENTS: ResourceKind =
    ResourceKind::new("environments", "Environment", &["cmp", "environments"], "environments");
pub const RESOURCE_HANDLERS: ResourceKind = ResourceKind::new(
    "resource-handlers",
    "Resource Handler",
    &["cmp", "resourceHandlers"],
    "resourceHandlers",
);
pub const BLUEPRINTS: ResourceKind =
    ResourceKind::new("blueprints", "Blueprint", &["cmp", "blueprints"], "blueprints");
pub const RESOURCES: ResourceKind =
    ResourceKind::new("resources", "Resource", &["cmp", "resources"], "resources").tree();
pub const SERVERS: ResourceKind =
    ResourceKind::new("servers", "Server", &["cmp", "servers"], "servers");
pub const ORDERS: ResourceKind = ResourceKind::new("orders", "Order", &["cmp", "orders"], "orders");
pub const JOBS: ResourceKind = ResourceKind::new("jobs", "Job", &["cmp", "jobs"], "jobs");
pub const USERS: ResourceKind = ResourceKind::new("users", "User", &["cmp", "users"], "users");
pub const ROLES: ResourceKind = ResourceKind::new("roles", "Role", &["cmp", "roles"], "roles");

/// All built-in kinds, in display order
pub const ALL_KINDS: &[ResourceKind] = &[
    GROUPS,
    ENVIRONMENTS,
    RESOURCE_HANDLERS,
    BLUEPRINTS,
    RESOURCES,
    SERVERS,
    ORDERS,
    JOBS,
    USERS,
    ROLES,
];

/// Get a resource kind by key
pub fn get_kind(key: &str) -> Result<ResourceKind> {
    ALL_KINDS
        .iter()
        .find(|k| k.key == key)
        .copied()
        .ok_or_else(|| ApiError::UnknownKind(key.to_string()))
}

/// Get all kind keys
pub fn kind_keys() -> Vec<&'static str> {
    ALL_KINDS.iter().map(|k| k.key).collect()
}
