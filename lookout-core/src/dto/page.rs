//! Pagination DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Filter fields flattened into the query string
pub type Filters = Map<String, Value>;

/// One page of entities as returned by list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<E> {
    pub entities: Vec<E>,
    pub total: u64,
}

impl<E> Page<E> {
    pub fn empty() -> Self {
        Self {
            entities: Vec::new(),
            total: 0,
        }
    }
}

impl<E> Default for Page<E> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Request for a single page
///
/// `page` is 0-indexed here; the wire protocol is 1-indexed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub count: u32,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub sort: Option<String>,
    /// Id of the parent entity for nested resources
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

impl PageRequest {
    pub fn new(page: u32, count: u32) -> Self {
        Self {
            page,
            count,
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Same request advanced to the next page, staying on the last one at `u32::MAX`
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }
}

/// Request for every entity matching the filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindAllRequest {
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

impl FindAllRequest {
    pub fn with_parent(parent_id: Uuid) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Page request carrying the same filters with an explicit page size
    pub fn to_page(&self, count: u32) -> PageRequest {
        PageRequest {
            page: 0,
            count,
            filters: self.filters.clone(),
            sort: self.sort.clone(),
            parent_id: self.parent_id,
        }
    }
}

/// Response of a successful delete, re-mapped client-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedEntity {
    pub id: Uuid,
}
