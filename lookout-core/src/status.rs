//! Status precedence
//!
//! Run statuses and test statuses come from two different domains but are
//! ranked on one shared [`Severity`] scale. A single failure anywhere dominates
//! every other outcome, and missing data is the second-worst signal.

use serde::{Deserialize, Serialize};

use crate::domain::component::Schedule;
use crate::domain::event::Event;
use crate::domain::test_outcome::TestOutcomeItem;

/// Shared ranking of run and test outcomes, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Completed = 1,
    Pending = 2,
    Running = 3,
    Warning = 4,
    Missing = 5,
    Failed = 6,
}

impl Severity {
    pub fn weight(self) -> u8 {
        self as u8
    }
}

/// Processed status of a run (and of anything summarized like one)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunProcessedStatus {
    #[default]
    Pending,
    Running,
    Completed,
    CompletedWithWarnings,
    Failed,
    Missing,
}

impl RunProcessedStatus {
    pub fn severity(self) -> Severity {
        match self {
            RunProcessedStatus::Failed => Severity::Failed,
            RunProcessedStatus::Missing => Severity::Missing,
            RunProcessedStatus::CompletedWithWarnings => Severity::Warning,
            RunProcessedStatus::Running => Severity::Running,
            RunProcessedStatus::Pending => Severity::Pending,
            RunProcessedStatus::Completed => Severity::Completed,
        }
    }

    /// True once no further change is expected
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunProcessedStatus::Pending | RunProcessedStatus::Running)
    }
}

impl std::fmt::Display for RunProcessedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunProcessedStatus::Pending => write!(f, "Pending"),
            RunProcessedStatus::Running => write!(f, "Running"),
            RunProcessedStatus::Completed => write!(f, "Completed"),
            RunProcessedStatus::CompletedWithWarnings => write!(f, "Completed with warnings"),
            RunProcessedStatus::Failed => write!(f, "Failed"),
            RunProcessedStatus::Missing => write!(f, "Missing"),
        }
    }
}

/// Outcome of a single data test
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Passed,
    Warning,
    Failed,
}

impl TestStatus {
    pub fn severity(self) -> Severity {
        RunProcessedStatus::from(self).severity()
    }
}

impl From<TestStatus> for RunProcessedStatus {
    fn from(status: TestStatus) -> Self {
        match status {
            TestStatus::Passed => RunProcessedStatus::Completed,
            TestStatus::Warning => RunProcessedStatus::CompletedWithWarnings,
            TestStatus::Failed => RunProcessedStatus::Failed,
        }
    }
}

/// Highest-severity status, or `Pending` when there is nothing to rank
pub fn most_important_status<I>(statuses: I) -> RunProcessedStatus
where
    I: IntoIterator,
    I::Item: Into<RunProcessedStatus>,
{
    most_important_status_or(statuses, RunProcessedStatus::Pending)
}

/// Highest-severity status, or `initial` when there is nothing to rank
///
/// Ties between equally severe statuses cannot be told apart after mapping,
/// so which one wins is irrelevant.
pub fn most_important_status_or<I>(statuses: I, initial: RunProcessedStatus) -> RunProcessedStatus
where
    I: IntoIterator,
    I::Item: Into<RunProcessedStatus>,
{
    statuses
        .into_iter()
        .map(Into::into)
        .max_by_key(|status: &RunProcessedStatus| status.severity())
        .unwrap_or(initial)
}

/// Run status implied by its test outcomes alone
pub fn run_status_from_tests(tests: &[TestOutcomeItem]) -> RunProcessedStatus {
    most_important_status_or(tests.iter().map(|t| t.status), RunProcessedStatus::Completed)
}

/// Derived status of a dataset component
///
/// 1. A failed or warning test decides the status.
/// 2. With a schedule configured, a missing write means the data is `Missing`.
/// 3. Without one, a missing write is merely `Pending`.
pub fn get_dataset_status(
    events: &[Event],
    tests: &[TestOutcomeItem],
    schedules: &[Schedule],
) -> RunProcessedStatus {
    let worst_test = tests
        .iter()
        .map(|t| t.status)
        .filter(|s| matches!(s, TestStatus::Failed | TestStatus::Warning))
        .max_by_key(|s| s.severity());

    if let Some(status) = worst_test {
        return status.into();
    }

    let written = events.iter().any(Event::is_write);

    match (written, schedules.is_empty()) {
        (true, _) => RunProcessedStatus::Completed,
        (false, false) => RunProcessedStatus::Missing,
        (false, true) => RunProcessedStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::component::{ComponentRef, ScheduleExpectation};
    use crate::domain::event::{DatasetOperation, EventPayload};
    use chrono::Utc;
    use uuid::Uuid;

    fn test_item(status: TestStatus) -> TestOutcomeItem {
        TestOutcomeItem {
            id: Uuid::new_v4(),
            name: "row_count".to_string(),
            status,
            description: None,
            start_time: None,
            end_time: None,
            component: ComponentRef::new(Uuid::new_v4()),
            min_threshold: None,
            max_threshold: None,
        }
    }

    fn dataset_event(operation: DatasetOperation) -> Event {
        Event {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            component: None,
            payload: EventPayload::DatasetOperation {
                operation,
                path: None,
            },
        }
    }

    fn arrival_schedule() -> Schedule {
        Schedule {
            id: Uuid::new_v4(),
            component: None,
            schedule: "0 6 * * *".to_string(),
            timezone: None,
            margin: Some(600),
            expectation: ScheduleExpectation::DatasetArrival,
        }
    }

    #[test]
    fn test_severity_weights() {
        assert_eq!(RunProcessedStatus::Failed.severity().weight(), 6);
        assert_eq!(RunProcessedStatus::Missing.severity().weight(), 5);
        assert_eq!(RunProcessedStatus::CompletedWithWarnings.severity().weight(), 4);
        assert_eq!(RunProcessedStatus::Running.severity().weight(), 3);
        assert_eq!(RunProcessedStatus::Pending.severity().weight(), 2);
        assert_eq!(RunProcessedStatus::Completed.severity().weight(), 1);
        assert_eq!(TestStatus::Failed.severity().weight(), 6);
        assert_eq!(TestStatus::Warning.severity().weight(), 4);
        assert_eq!(TestStatus::Passed.severity().weight(), 1);
    }

    #[test]
    fn test_most_important_picks_highest_weight() {
        use RunProcessedStatus::*;

        assert_eq!(most_important_status([Completed, Running, Pending]), Running);
        assert_eq!(most_important_status([Completed, Missing, Running]), Missing);
        assert_eq!(most_important_status([Missing, Failed, Completed]), Failed);
        assert_eq!(
            most_important_status([Pending, CompletedWithWarnings, Running]),
            CompletedWithWarnings
        );
        assert_eq!(most_important_status([Completed]), Completed);
    }

    #[test]
    fn test_most_important_maps_test_statuses() {
        assert_eq!(
            most_important_status([TestStatus::Passed, TestStatus::Warning]),
            RunProcessedStatus::CompletedWithWarnings
        );
        assert_eq!(
            most_important_status([TestStatus::Passed]),
            RunProcessedStatus::Completed
        );
        assert_eq!(
            most_important_status([TestStatus::Warning, TestStatus::Failed]),
            RunProcessedStatus::Failed
        );
    }

    #[test]
    fn test_most_important_empty_returns_initial() {
        let empty: Vec<RunProcessedStatus> = Vec::new();
        assert_eq!(most_important_status(empty.clone()), RunProcessedStatus::Pending);
        assert_eq!(
            most_important_status_or(empty, RunProcessedStatus::Completed),
            RunProcessedStatus::Completed
        );
    }

    #[test]
    fn test_dataset_status_decision_table() {
        // (failed test, warning test, schedule, write) -> expected
        let cases = [
            (false, false, false, false, RunProcessedStatus::Pending),
            (false, false, false, true, RunProcessedStatus::Completed),
            (false, false, true, false, RunProcessedStatus::Missing),
            (false, false, true, true, RunProcessedStatus::Completed),
            (false, true, false, false, RunProcessedStatus::CompletedWithWarnings),
            (false, true, true, true, RunProcessedStatus::CompletedWithWarnings),
            (true, false, true, false, RunProcessedStatus::Failed),
            (true, true, false, true, RunProcessedStatus::Failed),
        ];

        for (failed, warning, scheduled, written, expected) in cases {
            let mut tests = vec![test_item(TestStatus::Passed)];
            if failed {
                tests.push(test_item(TestStatus::Failed));
            }
            if warning {
                tests.push(test_item(TestStatus::Warning));
            }

            let mut events = vec![dataset_event(DatasetOperation::Read)];
            if written {
                events.push(dataset_event(DatasetOperation::Write));
            }

            let schedules = if scheduled {
                vec![arrival_schedule()]
            } else {
                Vec::new()
            };

            assert_eq!(
                get_dataset_status(&events, &tests, &schedules),
                expected,
                "failed={failed} warning={warning} scheduled={scheduled} written={written}"
            );
        }
    }

    #[test]
    fn test_dataset_status_passing_tests_do_not_decide() {
        let tests = vec![test_item(TestStatus::Passed)];
        assert_eq!(
            get_dataset_status(&[], &tests, &[arrival_schedule()]),
            RunProcessedStatus::Missing
        );
    }

    #[test]
    fn test_run_status_from_tests() {
        assert_eq!(run_status_from_tests(&[]), RunProcessedStatus::Completed);
        assert_eq!(
            run_status_from_tests(&[test_item(TestStatus::Passed), test_item(TestStatus::Failed)]),
            RunProcessedStatus::Failed
        );
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(RunProcessedStatus::CompletedWithWarnings).unwrap(),
            serde_json::json!("COMPLETED_WITH_WARNINGS")
        );
        let status: TestStatus = serde_json::from_value(serde_json::json!("WARNING")).unwrap();
        assert_eq!(status, TestStatus::Warning);
    }
}
