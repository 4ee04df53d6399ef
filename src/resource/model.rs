//! HAL resource model
//!
//! Wire shapes for linked resources and filtered collections.

use crate::api::Result;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `{href, title}` link entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub title: String,
}

/// Wire form of a link; `{}` is how the API spells "no link"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

/// Parent relation of a tree node.
///
/// `Root` is a distinct state: it never matches an expected ancestor name,
/// not even the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawLink", into = "RawLink")]
pub enum ParentLink {
    #[default]
    Root,
    Link(Link),
}

impl From<RawLink> for ParentLink {
    fn from(raw: RawLink) -> Self {
        match raw.href {
            Some(href) => ParentLink::Link(Link {
                href,
                title: raw.title.unwrap_or_default(),
            }),
            None => ParentLink::Root,
        }
    }
}

impl From<ParentLink> for RawLink {
    fn from(parent: ParentLink) -> Self {
        match parent {
            ParentLink::Root => RawLink::default(),
            ParentLink::Link(link) => RawLink {
                href: Some(link.href),
                title: Some(link.title),
            },
        }
    }
}

impl ParentLink {
    pub fn as_link(&self) -> Option<&Link> {
        match self {
            ParentLink::Root => None,
            ParentLink::Link(link) => Some(link),
        }
    }

    /// True when this is a real parent whose title equals `name`
    pub fn is_titled(&self, name: &str) -> bool {
        self.as_link().is_some_and(|link| link.title == name)
    }
}

/// The `_links` object of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(default)]
    pub parent: ParentLink,
    /// Other relations (environments, jobs, ...), kept verbatim
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Access to the HAL links of a decoded resource
pub trait Linked {
    fn self_link(&self) -> &Link;
    fn parent_link(&self) -> &ParentLink;
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A generic HAL resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedResource {
    #[serde(rename = "_links")]
    pub links: Links,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "id_from_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Resource-specific fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Linked for LinkedResource {
    fn self_link(&self) -> &Link {
        &self.links.self_link
    }

    fn parent_link(&self) -> &ParentLink {
        &self.links.parent
    }
}

impl LinkedResource {
    pub fn href(&self) -> &str {
        &self.links.self_link.href
    }
}

/// Wire shape of a collection response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCollection {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    count: u64,
    #[serde(rename = "_embedded", default)]
    embedded: Map<String, Value>,
}

impl RawCollection {
    /// Decode the items stored under `_embedded.{key}`; a missing key is an
    /// empty page.
    pub(crate) fn into_collection<T: DeserializeOwned>(
        mut self,
        key: &str,
    ) -> Result<FilteredCollection<T>> {
        let items = match self.embedded.remove(key) {
            Some(Value::Null) | None => Vec::new(),
            Some(value) => serde_json::from_value(value)?,
        };

        Ok(FilteredCollection {
            total: self.total,
            count: self.count,
            items,
        })
    }
}

/// First page of a (possibly filtered) collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredCollection<T> {
    /// Server-side total; may exceed `items.len()`
    pub total: u64,
    /// Number of items the server reports for this page
    pub count: u64,
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_parent_object_is_root() {
        let res: LinkedResource = serde_json::from_value(json!({
            "_links": {
                "self": {"href": "/api/v3/cmp/groups/GRP-1/", "title": "group"},
                "parent": {}
            },
            "name": "group",
            "id": "GRP-1"
        }))
        .unwrap();

        assert_eq!(res.links.parent, ParentLink::Root);
        assert!(!res.links.parent.is_titled(""));
        assert_eq!(res.href(), "/api/v3/cmp/groups/GRP-1/");
    }

    #[test]
    fn test_missing_parent_is_root() {
        let res: LinkedResource = serde_json::from_value(json!({
            "_links": {"self": {"href": "/x/", "title": "x"}},
            "name": "x"
        }))
        .unwrap();
        assert_eq!(res.parent_link(), &ParentLink::Root);
        assert_eq!(res.id, None);
    }

    #[test]
    fn test_parent_with_empty_title_is_not_root() {
        let parent: ParentLink =
            serde_json::from_value(json!({"href": "/api/v3/cmp/groups/GRP-2/", "title": ""}))
                .unwrap();
        assert!(parent.is_titled(""));
        assert!(parent.as_link().is_some());
    }

    #[test]
    fn test_numeric_id_and_extra_fields() {
        let res: LinkedResource = serde_json::from_value(json!({
            "_links": {
                "self": {"href": "/api/v3/cmp/jobs/42/", "title": "job"},
                "owner": {"href": "/api/v3/cmp/users/1/", "title": "admin"}
            },
            "name": "job",
            "id": 42,
            "status": "SUCCESS"
        }))
        .unwrap();

        assert_eq!(res.id.as_deref(), Some("42"));
        assert_eq!(res.fields["status"], "SUCCESS");
        assert!(res.links.other.contains_key("owner"));
    }

    #[test]
    fn test_root_serializes_as_empty_object() {
        let value = serde_json::to_value(ParentLink::Root).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_collection_missing_key_is_empty() {
        let raw: RawCollection =
            serde_json::from_value(json!({"total": 0, "count": 0, "_embedded": {}})).unwrap();
        let collection = raw.into_collection::<LinkedResource>("groups").unwrap();
        assert!(collection.items.is_empty());
    }

    #[test]
    fn test_collection_decodes_wrapper_key() {
        let raw: RawCollection = serde_json::from_value(json!({
            "_links": {"self": {"href": "/api/v3/cmp/groups/", "title": "List Groups"}},
            "total": 7,
            "count": 1,
            "_embedded": {
                "groups": [
                    {"_links": {"self": {"href": "/api/v3/cmp/groups/GRP-1/", "title": "a"}}, "name": "a"}
                ]
            }
        }))
        .unwrap();

        let collection = raw.into_collection::<LinkedResource>("groups").unwrap();
        assert_eq!(collection.total, 7);
        assert_eq!(collection.count, 1);
        assert_eq!(collection.items[0].name, "a");
    }
}
