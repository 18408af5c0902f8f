//! Test outcome domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::component::ComponentRef;
use super::entity::{Entity, EntityType};
use crate::status::TestStatus;

/// Result of one data test against a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcomeItem {
    pub id: Uuid,
    pub name: String,
    pub status: TestStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub component: ComponentRef,
    #[serde(default)]
    pub min_threshold: Option<f64>,
    #[serde(default)]
    pub max_threshold: Option<f64>,
}

impl Entity for TestOutcomeItem {
    const KIND: EntityType = EntityType::TestOutcome;

    fn id(&self) -> Uuid {
        self.id
    }
}
