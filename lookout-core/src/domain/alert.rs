//! Alert domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{Entity, EntityType};

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    Warning,
    Error,
}

/// Alert raised against a run or a journey instance
///
/// Alerts may arrive pre-aggregated, in which case `count` carries their
/// multiplicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub level: AlertLevel,
    #[serde(rename = "type")]
    pub alert_type: String,
    #[serde(default)]
    pub description: String,
    pub created_on: DateTime<Utc>,
    #[serde(default = "default_count")]
    pub count: u64,
}

impl Entity for Alert {
    const KIND: EntityType = EntityType::Alert;

    fn id(&self) -> Uuid {
        self.id
    }
}

fn default_count() -> u64 {
    1
}
