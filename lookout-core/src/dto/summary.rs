//! Summary rows

use serde::{Deserialize, Serialize};

/// Number of items sharing a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem<S> {
    pub status: S,
    pub count: u64,
}

impl<S> SummaryItem<S> {
    pub fn new(status: S, count: u64) -> Self {
        Self { status, count }
    }
}
