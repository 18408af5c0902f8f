//! Core domain types
//!
//! This module contains the entities served by the observability API. They are
//! shared between the REST client (which fetches them) and the stores (which
//! cache them).

pub mod agent;
pub mod alert;
pub mod component;
pub mod entity;
pub mod event;
pub mod instance;
pub mod project;
pub mod run;
pub mod test_outcome;

pub use entity::{Entity, EntityMeta, EntityType};
