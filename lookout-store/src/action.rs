//! Store actions and the reducer
//!
//! Every effect result is wrapped in an [`EntityAction`] and folded into state
//! by [`reduce`]. Reducers are pure: they read the previous state and return a
//! new one without mutating their input, so any sequence of actions can be
//! replayed deterministically.

use lookout_core::domain::Entity;
use lookout_core::dto::page::{DeletedEntity, Page, PageRequest};
use tracing::error;

use crate::state::EntityState;

/// Result of an effect, ready to be reduced
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction<E> {
    /// A single entity was fetched
    GotOne(E),
    /// Every matching entity was fetched
    FoundAll(Page<E>),
    /// One page was fetched with the given request
    GotPage { page: Page<E>, request: PageRequest },
    Created(E),
    Updated(E),
    Deleted(DeletedEntity),
    /// Point `selected` at an entity without touching the list
    Select(Option<E>),
    /// Back to the initial snapshot
    Reset,
}

impl<E> EntityAction<E> {
    /// True for actions that replace the loaded list wholesale
    pub fn is_list_load(&self) -> bool {
        matches!(self, EntityAction::FoundAll(_) | EntityAction::GotPage { .. })
    }
}

/// Compute the next state
pub fn reduce<E: Entity>(
    state: &EntityState<E>,
    action: EntityAction<E>,
    initial: &EntityState<E>,
) -> EntityState<E> {
    match action {
        EntityAction::GotOne(entity) => on_get_one(state, entity),
        EntityAction::FoundAll(page) => on_find_all(state, page),
        EntityAction::GotPage { page, request } => on_get_page(state, page, &request),
        EntityAction::Created(entity) => on_create_one(state, entity),
        EntityAction::Updated(entity) => on_update_one(state, entity),
        EntityAction::Deleted(deleted) => on_delete_one(state, deleted),
        EntityAction::Select(selected) => EntityState {
            selected,
            ..state.clone()
        },
        EntityAction::Reset => initial.clone(),
    }
}

/// Upsert by id and select
///
/// Replaces a known entity in place; appends an unknown one and counts it.
pub fn on_get_one<E: Entity>(state: &EntityState<E>, entity: E) -> EntityState<E> {
    let id = entity.id();
    let known = state.list.iter().any(|e| e.id() == id);

    let (list, total) = if known {
        let list = state
            .list
            .iter()
            .map(|e| if e.id() == id { entity.clone() } else { e.clone() })
            .collect();
        (list, state.total)
    } else {
        let mut list = state.list.clone();
        list.push(entity.clone());
        (list, state.total + 1)
    };

    EntityState {
        list,
        total,
        selected: Some(entity),
        ..state.clone()
    }
}

pub fn on_find_all<E: Entity>(state: &EntityState<E>, page: Page<E>) -> EntityState<E> {
    EntityState {
        list: page.entities,
        total: page.total,
        ..state.clone()
    }
}

pub fn on_get_page<E: Entity>(
    state: &EntityState<E>,
    page: Page<E>,
    request: &PageRequest,
) -> EntityState<E> {
    EntityState {
        list: page.entities,
        total: page.total,
        page: Some(request.page),
        count: Some(request.count),
        sort: request.sort.clone(),
        ..state.clone()
    }
}

pub fn on_create_one<E: Entity>(state: &EntityState<E>, entity: E) -> EntityState<E> {
    let mut list = state.list.clone();
    list.push(entity.clone());

    EntityState {
        list,
        total: state.total + 1,
        selected: Some(entity),
        ..state.clone()
    }
}

/// Replace by id and select
///
/// An entity missing from the list means the cache drifted from the server.
/// That is logged and the list is left alone; `selected` still follows.
pub fn on_update_one<E: Entity>(state: &EntityState<E>, entity: E) -> EntityState<E> {
    let id = entity.id();

    let list = if state.list.iter().any(|e| e.id() == id) {
        state
            .list
            .iter()
            .map(|e| if e.id() == id { entity.clone() } else { e.clone() })
            .collect()
    } else {
        error!(%id, kind = %E::KIND, "updated entity is not in the store list");
        state.list.clone()
    };

    EntityState {
        list,
        selected: Some(entity),
        ..state.clone()
    }
}

/// Remove exactly the entity with the deleted id
pub fn on_delete_one<E: Entity>(state: &EntityState<E>, deleted: DeletedEntity) -> EntityState<E> {
    let list: Vec<E> = state
        .list
        .iter()
        .filter(|e| e.id() != deleted.id)
        .cloned()
        .collect();
    let removed = (state.list.len() - list.len()) as u64;

    let selected = state
        .selected
        .as_ref()
        .filter(|e| e.id() != deleted.id)
        .cloned();

    EntityState {
        list,
        total: state.total.saturating_sub(removed),
        selected,
        ..state.clone()
    }
}
