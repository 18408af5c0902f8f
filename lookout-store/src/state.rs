//! Store state shapes

/// State of a generic entity store
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E> {
    /// Entities currently loaded
    pub list: Vec<E>,
    /// Server-side total for the last list load
    pub total: u64,
    /// Entity last fetched, created or updated individually
    pub selected: Option<E>,
    /// Echo of the last page request
    pub page: Option<u32>,
    pub count: Option<u32>,
    pub sort: Option<String>,
}

impl<E> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
            selected: None,
            page: None,
            count: None,
            sort: None,
        }
    }
}

impl<E> EntityState<E> {
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
