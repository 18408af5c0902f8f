//! Scheduling layer for the monitor
//!
//! Drives the periodic refresh of the watched project's runs.

pub mod poller;

pub use poller::RunPoller;
