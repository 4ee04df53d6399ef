//! Resource abstraction layer
//!
//! Generic lookups shared by every resource kind, so no per-kind glue is
//! needed beyond a [`ResourceKind`] entry.
//!
//! # Architecture
//!
//! - [`model`] - HAL links, linked resources and filtered collections
//! - [`registry`] - Built-in resource kinds
//! - [`path`] - Slash-delimited resource paths
//! - [`locator`] - Name-filtered lookups
//! - [`hierarchy`] - Path resolution through parent links
//!
//! # Example
//!
//! ```ignore
//! use halctl::resource::{resolve, LinkedResource, GROUPS};
//!
//! async fn team(client: &halctl::api::HalClient) -> halctl::api::Result<LinkedResource> {
//!     resolve(client, &GROUPS, "org/dept/team").await
//! }
//! ```

pub mod hierarchy;
pub mod locator;
pub mod model;
pub mod path;
pub mod registry;

pub use hierarchy::{resolve, resolve_path, verify_ancestry};
pub use locator::{find_by_name, find_unique_by_name, get_href, list_filtered};
pub use model::{FilteredCollection, Link, Linked, LinkedResource, Links, ParentLink};
pub use path::ResourcePath;
pub use registry::*;
