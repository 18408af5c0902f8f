//! Data Transfer Objects exchanged with the observability API
//!
//! Pagination requests and responses, plus the `{status, count}` summary
//! rows embedded in runs and instances.

pub mod page;
pub mod summary;
