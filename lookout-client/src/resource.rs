//! Resource addressing and query encoding

use lookout_core::domain::EntityType;
use lookout_core::dto::page::{Filters, PageRequest};
use serde_json::Value;
use uuid::Uuid;

/// A REST resource, optionally nested under a parent resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub kind: EntityType,
    pub parent: Option<EntityType>,
}

impl Resource {
    /// A top-level resource
    pub fn new(kind: EntityType) -> Self {
        Self { kind, parent: None }
    }

    /// A resource addressed under `{parent}/{parent_id}` for lists and creation
    pub fn nested(kind: EntityType, parent: EntityType) -> Self {
        Self {
            kind,
            parent: Some(parent),
        }
    }

    /// Collection URL, nested when both a parent kind and id are known
    ///
    /// # Example
    /// ```
    /// use lookout_client::Resource;
    /// use lookout_core::domain::EntityType;
    /// use uuid::Uuid;
    ///
    /// let runs = Resource::nested(EntityType::Run, EntityType::Project);
    /// let id = Uuid::nil();
    /// assert_eq!(
    ///     runs.collection_url("http://api/observability/v1", Some(id)),
    ///     format!("http://api/observability/v1/projects/{}/runs", id)
    /// );
    /// ```
    pub fn collection_url(&self, root: &str, parent_id: Option<Uuid>) -> String {
        match (self.parent, parent_id) {
            (Some(parent), Some(parent_id)) => {
                format!("{}/{}/{}/{}", root, parent.segment(), parent_id, self.kind.segment())
            }
            _ => format!("{}/{}", root, self.kind.segment()),
        }
    }

    /// URL of a single entity; entities are always addressable top-level
    pub fn item_url(&self, root: &str, id: Uuid) -> String {
        format!("{}/{}/{}", root, self.kind.segment(), id)
    }
}

/// Query parameters for a page request
///
/// The API pages from 1 and expects an uppercase sort direction.
pub fn page_query(request: &PageRequest) -> Vec<(String, String)> {
    let mut query = vec![
        ("page".to_string(), (u64::from(request.page) + 1).to_string()),
        ("count".to_string(), request.count.to_string()),
    ];

    if let Some(sort) = request.sort.as_deref().filter(|s| !s.is_empty()) {
        query.push(("sort".to_string(), sort.to_uppercase()));
    }

    flatten_filters(&request.filters, &mut query);
    query
}

/// Flatten filter fields into query pairs
///
/// Arrays repeat their key once per element and nulls are dropped.
pub fn flatten_filters(filters: &Filters, query: &mut Vec<(String, String)>) {
    for (key, value) in filters {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar(item) {
                        query.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar(other) {
                    query.push((key.clone(), text));
                }
            }
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "http://localhost:8082/observability/v1";

    #[test]
    fn test_top_level_urls() {
        let projects = Resource::new(EntityType::Project);
        let id = Uuid::new_v4();

        assert_eq!(projects.collection_url(ROOT, None), format!("{}/projects", ROOT));
        assert_eq!(projects.item_url(ROOT, id), format!("{}/projects/{}", ROOT, id));
    }

    #[test]
    fn test_nested_urls() {
        let keys = Resource::nested(EntityType::ServiceKey, EntityType::Project);
        let parent = Uuid::new_v4();

        assert_eq!(
            keys.collection_url(ROOT, Some(parent)),
            format!("{}/projects/{}/service-account-key", ROOT, parent)
        );
        // Without a parent id the resource falls back to its top-level path
        assert_eq!(
            keys.collection_url(ROOT, None),
            format!("{}/service-account-key", ROOT)
        );
    }

    #[test]
    fn test_page_query_is_one_indexed_with_uppercase_sort() {
        let request = PageRequest::new(0, 25).with_sort("desc");
        let query = page_query(&request);

        assert_eq!(query[0], ("page".to_string(), "1".to_string()));
        assert_eq!(query[1], ("count".to_string(), "25".to_string()));
        assert_eq!(query[2], ("sort".to_string(), "DESC".to_string()));
    }

    #[test]
    fn test_filters_flatten() {
        let request = PageRequest::new(2, 10)
            .with_filter("status", serde_json::json!(["FAILED", "MISSING"]))
            .with_filter("search", "orders")
            .with_filter("active", true)
            .with_filter("tool", Value::Null);

        let query = page_query(&request);

        assert!(query.contains(&("page".to_string(), "3".to_string())));
        assert!(query.contains(&("status".to_string(), "FAILED".to_string())));
        assert!(query.contains(&("status".to_string(), "MISSING".to_string())));
        assert!(query.contains(&("search".to_string(), "orders".to_string())));
        assert!(query.contains(&("active".to_string(), "true".to_string())));
        assert!(!query.iter().any(|(k, _)| k == "tool"));
        assert!(!query.iter().any(|(k, _)| k == "sort"));
    }
}
