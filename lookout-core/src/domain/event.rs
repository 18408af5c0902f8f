//! Event domain types
//!
//! Raw events ingested by the platform. Every event carries a reference to the
//! component it was reported for; the payload depends on the event type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::component::ComponentRef;
use super::entity::{Entity, EntityType};
use crate::status::{RunProcessedStatus, TestStatus};

/// Operation reported by a dataset event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetOperation {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Single test result carried by a test-outcomes event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedTestOutcome {
    pub name: String,
    pub status: TestStatus,
    #[serde(default)]
    pub description: Option<String>,
}

/// Event-type specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum EventPayload {
    #[serde(rename = "RunStatusEvent")]
    RunStatus {
        status: RunProcessedStatus,
        #[serde(default)]
        run_key: Option<String>,
    },
    #[serde(rename = "DatasetOperationEvent")]
    DatasetOperation {
        operation: DatasetOperation,
        #[serde(default)]
        path: Option<String>,
    },
    #[serde(rename = "TestOutcomesEvent")]
    TestOutcomes {
        #[serde(default)]
        test_outcomes: Vec<ReportedTestOutcome>,
    },
    #[serde(rename = "MessageLogEvent")]
    MessageLog { log_level: LogLevel, message: String },
    #[serde(rename = "MetricLogEvent")]
    MetricLog { metric_key: String, metric_value: f64 },
}

/// An event as listed by the events endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub component: Option<ComponentRef>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl Event {
    /// True for dataset write operations
    pub fn is_write(&self) -> bool {
        matches!(
            self.payload,
            EventPayload::DatasetOperation {
                operation: DatasetOperation::Write,
                ..
            }
        )
    }

    /// Human key of the component this event was reported for
    pub fn component_label(&self) -> Option<String> {
        self.component.as_ref().map(ComponentRef::label)
    }
}

impl Entity for Event {
    const KIND: EntityType = EntityType::Event;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_event_deserializes() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": "5b0a6c9e-3f1d-4c5a-8d2e-1f3a4b5c6d7e",
            "timestamp": "2026-10-01T09:00:00Z",
            "event_type": "DatasetOperationEvent",
            "operation": "WRITE",
            "path": "s3://bucket/orders/2026-10-01",
            "component": { "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7", "key": "orders" }
        }))
        .unwrap();

        assert!(event.is_write());
        assert_eq!(event.component_label().as_deref(), Some("orders"));
    }

    #[test]
    fn test_metric_event_is_not_a_write() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": "5b0a6c9e-3f1d-4c5a-8d2e-1f3a4b5c6d7e",
            "timestamp": "2026-10-01T09:00:00Z",
            "event_type": "MetricLogEvent",
            "metric_key": "rows",
            "metric_value": 42.0
        }))
        .unwrap();

        assert!(!event.is_write());
        assert!(event.component_label().is_none());
    }
}
