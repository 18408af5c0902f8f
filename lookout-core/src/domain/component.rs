//! Component domain types
//!
//! Components are the monitored units of a project: pipelines, datasets and
//! servers. Pipelines and datasets may carry schedule expectations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{Entity, EntityMeta, EntityType};

/// Kind of monitored component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    BatchPipeline,
    StreamingPipeline,
    Dataset,
    Server,
}

impl ComponentType {
    /// Schedule expectations a component of this kind may carry
    pub fn allowed_expectations(self) -> &'static [ScheduleExpectation] {
        match self {
            ComponentType::BatchPipeline => &[
                ScheduleExpectation::BatchPipelineStartTime,
                ScheduleExpectation::BatchPipelineEndTime,
            ],
            ComponentType::Dataset => &[ScheduleExpectation::DatasetArrival],
            ComponentType::StreamingPipeline | ComponentType::Server => &[],
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentType::BatchPipeline => write!(f, "Batch pipeline"),
            ComponentType::StreamingPipeline => write!(f, "Streaming pipeline"),
            ComponentType::Dataset => write!(f, "Dataset"),
            ComponentType::Server => write!(f, "Server"),
        }
    }
}

/// What a schedule promises about its component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleExpectation {
    /// A batch run should start by the scheduled time
    BatchPipelineStartTime,
    /// A batch run should end by the scheduled time
    BatchPipelineEndTime,
    /// A dataset write should arrive within the scheduled window
    DatasetArrival,
}

/// Cron-like timing contract attached to a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    #[serde(default)]
    pub component: Option<Uuid>,
    pub schedule: String,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Grace period in seconds
    #[serde(default)]
    pub margin: Option<u64>,
    pub expectation: ScheduleExpectation,
}

impl Entity for Schedule {
    const KIND: EntityType = EntityType::Schedule;

    fn id(&self) -> Uuid {
        self.id
    }

    fn readonly_fields() -> &'static [&'static str] {
        &["component"]
    }
}

/// Body sent to create or replace a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub schedule: String,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub margin: Option<u64>,
    pub expectation: ScheduleExpectation,
}

impl ScheduleDraft {
    /// True when `schedule` already carries the same timing contract
    pub fn matches(&self, schedule: &Schedule) -> bool {
        self.expectation == schedule.expectation
            && self.schedule == schedule.schedule
            && self.timezone == schedule.timezone
            && self.margin == schedule.margin
    }
}

/// A monitored pipeline, dataset or server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(flatten)]
    pub meta: EntityMeta,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub key: String,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub project: Option<Uuid>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

impl Component {
    /// Human label: display name when set, otherwise the key
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.key)
    }

    /// Schedule attached for the given expectation, if any
    pub fn schedule(&self, expectation: ScheduleExpectation) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.expectation == expectation)
    }

    pub fn is_pipeline(&self) -> bool {
        matches!(
            self.component_type,
            ComponentType::BatchPipeline | ComponentType::StreamingPipeline
        )
    }
}

impl Entity for Component {
    const KIND: EntityType = EntityType::Component;

    fn id(&self) -> Uuid {
        self.meta.id
    }

    fn readonly_fields() -> &'static [&'static str] {
        &[
            "created_on",
            "created_by",
            "active",
            "project",
            "schedules",
            "type",
        ]
    }
}

/// Lightweight component reference embedded in runs, tests and events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRef {
    pub id: Uuid,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub tool: Option<String>,
}

impl ComponentRef {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            key: None,
            display_name: None,
            tool: None,
        }
    }

    /// Human label, falling back to the id when nothing else is known
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.key.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}
