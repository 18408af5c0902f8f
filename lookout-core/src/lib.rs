//! Lookout Core
//!
//! Core types and pure derivations for the Lookout observability client.
//!
//! This crate contains:
//! - Domain types: entities fetched from the platform API (Project, Component, Run, etc.)
//! - DTOs: pagination and summary shapes exchanged with the API
//! - Status precedence, task interval-graph inference and summary aggregation
//!
//! Nothing in here performs I/O.

pub mod domain;
pub mod dto;
pub mod graph;
pub mod status;
pub mod summary;
