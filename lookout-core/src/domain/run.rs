//! Run domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::alert::Alert;
use super::component::ComponentRef;
use super::entity::{Entity, EntityType};
use crate::dto::summary::SummaryItem;
use crate::status::{RunProcessedStatus, TestStatus};

/// One execution of a pipeline component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: Uuid,
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    pub pipeline: ComponentRef,
    pub status: RunProcessedStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tasks_summary: Vec<SummaryItem<RunProcessedStatus>>,
    #[serde(default)]
    pub tests_summary: Vec<SummaryItem<TestStatus>>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl Entity for Run {
    const KIND: EntityType = EntityType::Run;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Logical task a run task executes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: Uuid,
    pub key: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One step within a run
///
/// A task without `end_time` is still running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTask {
    pub id: Uuid,
    #[serde(default)]
    pub run: Option<Uuid>,
    pub task: TaskRef,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub status: RunProcessedStatus,
}

impl RunTask {
    pub fn label(&self) -> &str {
        self.task.display_name.as_deref().unwrap_or(&self.task.key)
    }
}

impl Entity for RunTask {
    const KIND: EntityType = EntityType::Task;

    fn id(&self) -> Uuid {
        self.id
    }
}
