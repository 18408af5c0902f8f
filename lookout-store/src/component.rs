//! Component store
//!
//! Adds two effects on top of the generic store:
//! - `update_one` patches a component and reconciles its schedule
//!   sub-resources with separate calls;
//! - `search_page` accumulates fetched pages into an `all` bucket for
//!   incremental multi-select.

use std::sync::Arc;

use lookout_client::{ApiClient, EntityService};
use lookout_core::domain::component::{Component, Schedule, ScheduleDraft};
use lookout_core::domain::Entity;
use lookout_core::dto::page::{Page, PageRequest};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::action::EntityAction;
use crate::error::{Result, StoreError};
use crate::store::{EntityStore, Sequencer};

/// Components gathered across successive search pages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub all: Vec<Component>,
    pub total: u64,
    /// Last page merged into `all`
    pub page: Option<u32>,
}

/// Merge one search page into the accumulated results
///
/// Page 0 starts a fresh search. Later pages append components not seen yet.
pub fn reduce_search(state: &SearchState, page: Page<Component>, request: &PageRequest) -> SearchState {
    let all = if request.page == 0 {
        page.entities
    } else {
        let mut all = state.all.clone();
        for component in page.entities {
            if !all.iter().any(|c| c.id() == component.id()) {
                all.push(component);
            }
        }
        all
    };

    SearchState {
        all,
        total: page.total,
        page: Some(request.page),
    }
}

/// Schedule calls needed to move a component onto new drafts
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleChange {
    Create(ScheduleDraft),
    Replace(Uuid, ScheduleDraft),
    Delete(Uuid),
}

/// Diff existing schedules against drafts, one expectation at a time
///
/// Drafts for expectations the component type cannot carry are rejected.
pub fn plan_schedule_changes(
    component: &Component,
    drafts: &[ScheduleDraft],
) -> Result<Vec<ScheduleChange>> {
    let allowed = component.component_type.allowed_expectations();

    if let Some(draft) = drafts.iter().find(|d| !allowed.contains(&d.expectation)) {
        return Err(StoreError::InvalidRequest(format!(
            "{:?} schedules are not supported for {} components",
            draft.expectation, component.component_type
        )));
    }

    let mut changes = Vec::new();

    for expectation in allowed {
        let existing = component.schedule(*expectation);
        let draft = drafts.iter().find(|d| d.expectation == *expectation);

        match (existing, draft) {
            (Some(existing), Some(draft)) if !draft.matches(existing) => {
                changes.push(ScheduleChange::Replace(existing.id, draft.clone()));
            }
            (Some(existing), None) => changes.push(ScheduleChange::Delete(existing.id)),
            (None, Some(draft)) => changes.push(ScheduleChange::Create(draft.clone())),
            _ => {}
        }
    }

    Ok(changes)
}

/// Store of a project's components
#[derive(Clone)]
pub struct ComponentStore {
    components: EntityStore<Component>,
    schedules: EntityService<Schedule>,
    search: Arc<watch::Sender<SearchState>>,
    search_sequencer: Arc<Sequencer>,
}

impl ComponentStore {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            components: EntityStore::new(client.components()),
            schedules: client.schedules(),
            search: Arc::new(watch::channel(SearchState::default()).0),
            search_sequencer: Arc::new(Sequencer::default()),
        }
    }

    pub fn entities(&self) -> &EntityStore<Component> {
        &self.components
    }

    pub fn subscribe_search(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    pub fn search_snapshot(&self) -> SearchState {
        self.search.borrow().clone()
    }

    /// Patch a component, then bring its schedules in line with `drafts`
    ///
    /// The component is refetched afterwards so the stored copy carries the
    /// server's view of its schedules.
    pub async fn update_one(&self, component: &Component, drafts: &[ScheduleDraft]) -> Result<Component> {
        let changes = plan_schedule_changes(component, drafts)?;
        let ticket = self.components.ticket(false);
        let id = component.id();

        self.components.service().update(component).await?;

        for change in changes {
            match change {
                ScheduleChange::Create(draft) => {
                    debug!(%id, expectation = ?draft.expectation, "creating schedule");
                    self.schedules.create(Some(id), &draft).await?;
                }
                ScheduleChange::Replace(schedule_id, draft) => {
                    debug!(%id, %schedule_id, "replacing schedule");
                    self.schedules.patch(schedule_id, &draft).await?;
                }
                ScheduleChange::Delete(schedule_id) => {
                    debug!(%id, %schedule_id, "deleting schedule");
                    self.schedules.delete(schedule_id).await?;
                }
            }
        }

        let refreshed = self.components.service().get_one(id).await?;
        self.components.apply(ticket, EntityAction::Updated(refreshed.clone()));

        info!(%id, key = %refreshed.key, "component updated");
        Ok(refreshed)
    }

    /// Fetch a search page and merge it into `all`
    pub async fn search_page(&self, request: &PageRequest) -> Result<Page<Component>> {
        let ticket = self.search_sequencer.list();
        let page = self.components.service().get_page(request).await?;

        let sequencer = &self.search_sequencer;
        self.search.send_if_modified(|state| {
            if !sequencer.is_current(ticket) {
                debug!("discarding stale search page");
                return false;
            }
            *state = reduce_search(state, page.clone(), request);
            true
        });

        Ok(page)
    }

    /// Forget accumulated search results
    pub fn clear_search(&self) {
        let sequencer = &self.search_sequencer;
        self.search.send_modify(|state| {
            sequencer.invalidate();
            *state = SearchState::default();
        });
    }
}
