//! Journey instance domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::alert::AlertLevel;
use super::entity::{Entity, EntityType};
use crate::dto::summary::SummaryItem;
use crate::status::{RunProcessedStatus, TestStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyRef {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}

/// One execution of a journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: Uuid,
    pub journey: JourneyRef,
    #[serde(default)]
    pub active: bool,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub runs_summary: Vec<SummaryItem<RunProcessedStatus>>,
    #[serde(default)]
    pub tests_summary: Vec<SummaryItem<TestStatus>>,
    #[serde(default)]
    pub alerts_summary: Vec<SummaryItem<AlertLevel>>,
}

impl Entity for Instance {
    const KIND: EntityType = EntityType::Instance;

    fn id(&self) -> Uuid {
        self.id
    }
}
