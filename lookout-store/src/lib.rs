//! Lookout entity stores
//!
//! Client-side state for the observability API. Each store pairs an
//! [`lookout_client::EntityService`] with a `watch` channel of its state:
//! effects perform the API call, wrap the result in an [`EntityAction`] and
//! the pure [`reduce`] function computes the next state.
//!
//! Concrete stores add domain effects on top:
//! - [`ProjectStore`] persists the selected project through [`SelectionStorage`];
//! - [`ComponentStore`] reconciles schedules and accumulates search results;
//! - [`RunStore`] links run tasks into a graph and re-issues its last page.

pub mod action;
pub mod component;
pub mod error;
pub mod project;
pub mod refresh;
pub mod run;
pub mod state;
pub mod storage;
pub mod store;

pub use action::{EntityAction, reduce};
pub use component::{ComponentStore, SearchState};
pub use error::{Result, StoreError};
pub use project::{ProjectStore, SELECTED_PROJECT_KEY, persist_selection};
pub use refresh::spawn_refresh;
pub use run::{RunOverview, RunStore, TaskGraph, overview};
pub use state::EntityState;
pub use storage::{JsonFileStorage, MemoryStorage, SelectionStorage};
pub use store::{EntityStore, PageLoad, Sequencer, Ticket};
