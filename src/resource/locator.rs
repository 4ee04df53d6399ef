//! Name-filtered lookups
//!
//! Fetch a collection filtered by exact name and take the first embedded
//! entry. The API does not tell "does not exist" apart from "exists but is
//! not readable by this user", so both surface as [`ApiError::NotFound`].

use super::model::{FilteredCollection, RawCollection};
use super::registry::ResourceKind;
use crate::api::{api_path, ApiError, HalClient, Result};
use serde::de::DeserializeOwned;

/// Collection path of a kind, e.g. `/api/v3/cmp/groups/`
pub fn collection_path(client: &HalClient, kind: &ResourceKind) -> String {
    api_path(client.session().api_version(), kind.collection)
}

/// Append `filter=name:{name}` with the name percent-encoded
pub fn name_filter_path(collection_path: &str, name: &str) -> String {
    let separator = if collection_path.contains('?') { '&' } else { '?' };
    format!(
        "{}{}filter=name:{}",
        collection_path,
        separator,
        urlencoding::encode(name)
    )
}

/// Fetch the first page of a kind's collection, optionally filtered by name
pub async fn list_filtered<T: DeserializeOwned>(
    client: &HalClient,
    kind: &ResourceKind,
    name: Option<&str>,
) -> Result<FilteredCollection<T>> {
    let path = collection_path(client, kind);
    let path = match name {
        Some(name) => name_filter_path(&path, name),
        None => path,
    };

    let raw: RawCollection = client.get_json(&path).await?;
    let collection = raw.into_collection(kind.embedded_key)?;

    tracing::debug!(
        "{} lookup returned {} of {} item(s)",
        kind.display_name,
        collection.items.len(),
        collection.total
    );
    Ok(collection)
}

/// Find the resource of `kind` named exactly `name`.
///
/// When the server returns several matches the first one is taken without
/// any uniqueness check. See [`find_unique_by_name`] for the strict form.
pub async fn find_by_name<T: DeserializeOwned>(
    client: &HalClient,
    kind: &ResourceKind,
    name: &str,
) -> Result<T> {
    let collection = list_filtered::<T>(client, kind, Some(name)).await?;

    collection
        .items
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound {
            kind: kind.display_name.to_string(),
            name: name.to_string(),
        })
}

/// Like [`find_by_name`] but fails with [`ApiError::Ambiguous`] when the
/// first page holds more than one match
pub async fn find_unique_by_name<T: DeserializeOwned>(
    client: &HalClient,
    kind: &ResourceKind,
    name: &str,
) -> Result<T> {
    let collection = list_filtered::<T>(client, kind, Some(name)).await?;
    let count = collection.items.len();

    let mut items = collection.items.into_iter();
    match (items.next(), count) {
        (None, _) => Err(ApiError::NotFound {
            kind: kind.display_name.to_string(),
            name: name.to_string(),
        }),
        (Some(item), 1) => Ok(item),
        (Some(_), count) => Err(ApiError::Ambiguous {
            kind: kind.display_name.to_string(),
            name: name.to_string(),
            count,
        }),
    }
}

/// Fetch and decode one resource by its self href
pub async fn get_href<T: DeserializeOwned>(client: &HalClient, href: &str) -> Result<T> {
    client.get_json(href).await
}
