//! Generic entity store
//!
//! Couples an [`EntityService`] (wire calls) with a state channel (what
//! subscribers see). Effects await the service, wrap the result in an
//! [`EntityAction`] and dispatch it; only the reducer computes new state.
//!
//! Two guards keep late replies from corrupting state:
//! - `reset()` bumps an epoch and results issued under an older epoch are dropped;
//! - list loads (`find_all`, `get_page`) are numbered and only the most
//!   recently issued one may apply its result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lookout_client::EntityService;
use lookout_core::domain::Entity;
use lookout_core::dto::page::{DeletedEntity, FindAllRequest, Page, PageRequest};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::action::{EntityAction, reduce};
use crate::error::Result;
use crate::state::EntityState;

/// Position of an effect in the store's timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    generation: Option<u64>,
}

/// A fetched page and whether it reached state
///
/// `applied` is false when a newer list load or a `reset()` superseded the
/// fetch while it was in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLoad<E> {
    pub page: Page<E>,
    pub applied: bool,
}

/// Hands out tickets and decides whether they are still current
#[derive(Debug, Default)]
pub struct Sequencer {
    epoch: AtomicU64,
    generation: AtomicU64,
}

impl Sequencer {
    /// Ticket for an effect whose result merges into state
    pub fn single(&self) -> Ticket {
        Ticket {
            epoch: self.epoch.load(Ordering::SeqCst),
            generation: None,
        }
    }

    /// Ticket for an effect whose result replaces the list
    ///
    /// Issuing one supersedes every list ticket issued before it.
    pub fn list(&self) -> Ticket {
        Ticket {
            epoch: self.epoch.load(Ordering::SeqCst),
            generation: Some(self.generation.fetch_add(1, Ordering::SeqCst) + 1),
        }
    }

    /// Invalidate every outstanding ticket
    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        if ticket.epoch != self.epoch.load(Ordering::SeqCst) {
            return false;
        }

        match ticket.generation {
            Some(generation) => generation == self.generation.load(Ordering::SeqCst),
            None => true,
        }
    }
}

struct Inner<E: Entity> {
    service: EntityService<E>,
    state: watch::Sender<EntityState<E>>,
    initial: EntityState<E>,
    sequencer: Sequencer,
}

/// State container for one entity kind
///
/// Cheap to clone: clones share state and service.
pub struct EntityStore<E: Entity> {
    inner: Arc<Inner<E>>,
}

impl<E: Entity> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Entity> EntityStore<E> {
    /// Store starting from an empty state
    pub fn new(service: EntityService<E>) -> Self {
        Self::with_initial(service, EntityState::default())
    }

    /// Store starting from (and resetting to) `initial`
    pub fn with_initial(service: EntityService<E>, initial: EntityState<E>) -> Self {
        let (state, _) = watch::channel(initial.clone());
        Self {
            inner: Arc::new(Inner {
                service,
                state,
                initial,
                sequencer: Sequencer::default(),
            }),
        }
    }

    pub fn service(&self) -> &EntityService<E> {
        &self.inner.service
    }

    /// Receiver notified after every applied action
    pub fn subscribe(&self) -> watch::Receiver<EntityState<E>> {
        self.inner.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> EntityState<E> {
        self.inner.state.borrow().clone()
    }

    /// Reduce an action into state unconditionally
    pub fn dispatch(&self, action: EntityAction<E>) {
        let initial = &self.inner.initial;
        self.inner
            .state
            .send_modify(|state| *state = reduce(state, action, initial));
    }

    pub(crate) fn ticket(&self, list: bool) -> Ticket {
        if list {
            self.inner.sequencer.list()
        } else {
            self.inner.sequencer.single()
        }
    }

    /// Reduce an action if its ticket is still current
    ///
    /// The check runs under the channel lock so it cannot interleave with a
    /// concurrent `reset()`.
    pub(crate) fn apply(&self, ticket: Ticket, action: EntityAction<E>) -> bool {
        let inner = &self.inner;
        inner.state.send_if_modified(|state| {
            if !inner.sequencer.is_current(ticket) {
                debug!(kind = %E::KIND, "discarding stale result");
                return false;
            }
            *state = reduce(state, action, &inner.initial);
            true
        })
    }

    // =============================================================================
    // Effects
    // =============================================================================

    /// Fetch one entity, upsert it and select it
    pub async fn get_one(&self, id: Uuid) -> Result<E> {
        let ticket = self.ticket(false);
        let entity = self.inner.service.get_one(id).await?;
        self.apply(ticket, EntityAction::GotOne(entity.clone()));
        Ok(entity)
    }

    /// Fetch every matching entity and replace the list
    pub async fn find_all(&self, request: &FindAllRequest) -> Result<Page<E>> {
        let ticket = self.ticket(true);
        let page = self.inner.service.find_all(request).await?;
        self.apply(ticket, EntityAction::FoundAll(page.clone()));
        Ok(page)
    }

    /// Fetch one page and replace the list
    pub async fn get_page(&self, request: &PageRequest) -> Result<Page<E>> {
        self.load_page(request).await.map(|load| load.page)
    }

    /// Like `get_page`, also reporting whether the page was applied
    pub async fn load_page(&self, request: &PageRequest) -> Result<PageLoad<E>> {
        let ticket = self.ticket(true);
        let page = self.inner.service.get_page(request).await?;
        let applied = self.apply(
            ticket,
            EntityAction::GotPage {
                page: page.clone(),
                request: request.clone(),
            },
        );
        Ok(PageLoad { page, applied })
    }

    /// Create an entity and append it
    pub async fn create_one<B>(&self, parent_id: Option<Uuid>, body: &B) -> Result<E>
    where
        B: Serialize + ?Sized + Sync,
    {
        let ticket = self.ticket(false);
        let entity = self.inner.service.create(parent_id, body).await?;
        self.apply(ticket, EntityAction::Created(entity.clone()));
        Ok(entity)
    }

    /// Update an entity and patch it into the list
    pub async fn update_one(&self, entity: &E) -> Result<E> {
        let ticket = self.ticket(false);
        let updated = self.inner.service.update(entity).await?;
        self.apply(ticket, EntityAction::Updated(updated.clone()));
        Ok(updated)
    }

    /// Delete an entity and drop it from the list
    pub async fn delete_one(&self, id: Uuid) -> Result<DeletedEntity> {
        let ticket = self.ticket(false);
        let deleted = self.inner.service.delete(id).await?;
        self.apply(ticket, EntityAction::Deleted(deleted));
        Ok(deleted)
    }

    /// Restore the initial state and orphan every in-flight effect
    pub fn reset(&self) {
        let inner = &self.inner;
        inner.state.send_modify(|state| {
            inner.sequencer.invalidate();
            *state = reduce(state, EntityAction::Reset, &inner.initial);
        });
    }
}
