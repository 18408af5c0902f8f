//! Project store
//!
//! The selected project is the one piece of store state that survives a
//! restart. Persisting it is a side effect of observing state changes; the
//! reducer itself never touches storage.

use std::sync::Arc;

use lookout_client::ApiClient;
use lookout_core::domain::Entity;
use lookout_core::domain::project::Project;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::action::EntityAction;
use crate::error::Result;
use crate::storage::SelectionStorage;
use crate::store::EntityStore;

/// Storage key holding the last selected project
pub const SELECTED_PROJECT_KEY: &str = "selected_project";

/// Store of the projects visible to the session
#[derive(Clone)]
pub struct ProjectStore {
    projects: EntityStore<Project>,
}

impl ProjectStore {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            projects: EntityStore::new(client.projects()),
        }
    }

    pub fn entities(&self) -> &EntityStore<Project> {
        &self.projects
    }

    /// Fetch and select a project
    pub async fn select(&self, id: Uuid) -> Result<Project> {
        self.projects.get_one(id).await
    }

    pub fn selected(&self) -> Option<Project> {
        self.projects.snapshot().selected
    }

    /// Load the persisted selection back into the store
    ///
    /// Only `selected` changes; the list is left for the next fetch.
    pub fn restore_selection(&self, storage: &dyn SelectionStorage) -> Result<Option<Project>> {
        let Some(value) = storage.load(SELECTED_PROJECT_KEY)? else {
            return Ok(None);
        };

        let project: Project = serde_json::from_value(value)?;
        debug!(id = %project.id(), "restored selected project");
        self.projects
            .dispatch(EntityAction::Select(Some(project.clone())));

        Ok(Some(project))
    }

    /// Keep storage in sync with the selected project
    pub fn persist_selection(&self, storage: Arc<dyn SelectionStorage>) -> JoinHandle<()> {
        persist_selection(&self.projects, storage, SELECTED_PROJECT_KEY)
    }
}

/// Spawn an observer writing a store's selection to `key` whenever it changes
///
/// Clearing the selection removes the key. Storage failures are logged and
/// the observer keeps running.
pub fn persist_selection<E: Entity>(
    store: &EntityStore<E>,
    storage: Arc<dyn SelectionStorage>,
    key: &'static str,
) -> JoinHandle<()> {
    // Changes made after this point are observed even if the task starts late
    let mut receiver = store.subscribe();
    let mut last: Option<Value> = receiver
        .borrow()
        .selected
        .as_ref()
        .and_then(|e| serde_json::to_value(e).ok());

    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let selected = receiver.borrow_and_update().selected.clone();
            let current = match selected.as_ref().map(serde_json::to_value).transpose() {
                Ok(current) => current,
                Err(e) => {
                    warn!(key, "failed to serialize selection: {}", e);
                    continue;
                }
            };

            if current == last {
                continue;
            }

            let outcome = match &current {
                Some(value) => storage.save(key, value),
                None => storage.remove(key),
            };

            match outcome {
                Ok(()) => last = current,
                Err(e) => warn!(key, "failed to persist selection: {}", e),
            }
        }
    })
}
