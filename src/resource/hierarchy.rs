//! Hierarchical path resolution
//!
//! Names are only unique within one parent, so a flat name search can return
//! decoys from other branches. Each candidate's ancestor chain is walked, one
//! request per level, until it either matches the requested path or diverges.

use super::locator::list_filtered;
use super::model::{Linked, LinkedResource, ParentLink};
use super::path::ResourcePath;
use super::registry::ResourceKind;
use crate::api::{ApiError, HalClient, Result};
use serde::de::DeserializeOwned;

/// Check that the resource at `href` sits under `ancestors` (outermost first).
///
/// A mismatch or running into the root early yields `Ok(false)`; request
/// failures are returned as errors. The outermost ancestor itself is never
/// fetched: matching its title on the child's parent link is enough.
///
/// With no ancestors the resource must itself be a root.
pub async fn verify_ancestry(client: &HalClient, href: &str, ancestors: &[String]) -> Result<bool> {
    if ancestors.is_empty() {
        let node: LinkedResource = client.get_json(href).await?;
        if node.parent_link() != &ParentLink::Root {
            tracing::debug!("{} has a parent, expected a root", node.name);
            return Ok(false);
        }
        return Ok(true);
    }

    let mut href = href.to_string();
    let mut remaining = ancestors;

    while let Some((expected, rest)) = remaining.split_last() {
        let node: LinkedResource = client.get_json(&href).await?;

        let parent = match node.parent_link() {
            ParentLink::Link(link) if link.title == *expected => link,
            ParentLink::Link(link) => {
                tracing::debug!(
                    "{} has parent '{}', expected '{}'",
                    node.name,
                    link.title,
                    expected
                );
                return Ok(false);
            },
            ParentLink::Root => {
                tracing::debug!("{} is a root, expected parent '{}'", node.name, expected);
                return Ok(false);
            },
        };

        href = parent.href.clone();
        remaining = rest;
    }

    Ok(true)
}

/// Resolve a slash-delimited path to exactly one node of a tree kind.
///
/// Candidates are tried in the order the name search returned them and the
/// first one whose ancestry matches wins.
pub async fn resolve_path<T>(client: &HalClient, kind: &ResourceKind, path: &ResourcePath) -> Result<T>
where
    T: DeserializeOwned + Linked,
{
    if !kind.hierarchical {
        return Err(ApiError::NotHierarchical(kind.display_name.to_string()));
    }

    let candidates = list_filtered::<T>(client, kind, Some(path.leaf())).await?;

    tracing::debug!(
        "Resolving {} '{}' across {} candidate(s)",
        kind.display_name,
        path,
        candidates.items.len()
    );

    for candidate in candidates.items {
        let href = candidate.self_link().href.clone();
        if verify_ancestry(client, &href, path.ancestors()).await? {
            return Ok(candidate);
        }
    }

    Err(ApiError::PathNotFound {
        kind: kind.display_name.to_string(),
        path: path.to_string(),
    })
}

/// Parse `raw` and resolve it; see [`resolve_path`]
pub async fn resolve<T>(client: &HalClient, kind: &ResourceKind, raw: &str) -> Result<T>
where
    T: DeserializeOwned + Linked,
{
    let path = ResourcePath::parse(raw)?;
    resolve_path(client, kind, &path).await
}
