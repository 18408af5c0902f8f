//! Task interval graph
//!
//! Infers a sparse execution DAG from task time windows alone, for runs whose
//! integration reports no explicit task dependencies. Each task links only to
//! its immediate successors: a later task is a successor when it starts no
//! earlier than the task ends, and successors already covered by a tighter
//! window are skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::run::RunTask;

/// Time window of one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpan {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    /// `None` while the task is still running
    pub end_time: Option<DateTime<Utc>>,
}

impl From<&RunTask> for TaskSpan {
    fn from(task: &RunTask) -> Self {
        Self {
            id: task.id,
            start_time: task.start_time,
            end_time: task.end_time,
        }
    }
}

/// Directed edge between two tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: Uuid,
    pub to: Uuid,
}

/// Infer task edges, treating unfinished tasks as ending now
pub fn link_tasks(tasks: &[TaskSpan]) -> Vec<Edge> {
    link_tasks_at(tasks, Utc::now())
}

/// Infer edges between the tasks of a run
pub fn link_run_tasks(tasks: &[RunTask]) -> Vec<Edge> {
    let spans: Vec<TaskSpan> = tasks.iter().map(TaskSpan::from).collect();
    link_tasks(&spans)
}

/// Infer task edges, treating unfinished tasks as ending at `now`
pub fn link_tasks_at(tasks: &[TaskSpan], now: DateTime<Utc>) -> Vec<Edge> {
    let mut spans: Vec<(Uuid, DateTime<Utc>, DateTime<Utc>)> = tasks
        .iter()
        .map(|t| (t.id, t.start_time, t.end_time.unwrap_or(now)))
        .collect();
    spans.sort_by(|a, b| a.1.cmp(&b.1).then(a.2.cmp(&b.2)));

    let mut edges = Vec::new();

    for (index, &(from, start, end)) in spans.iter().enumerate() {
        // Earliest end among successors found so far. Anything starting after
        // it is reachable through that successor.
        let mut last_end: Option<DateTime<Utc>> = None;

        for &(to, next_start, next_end) in &spans[index + 1..] {
            if last_end.is_some_and(|last| next_start >= last) {
                break;
            }

            if next_start >= end && next_start > start && to != from {
                edges.push(Edge { from, to });
                last_end = Some(last_end.map_or(next_end, |last| last.min(next_end)));
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, hour, minute, 0).unwrap()
    }

    fn span(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> TaskSpan {
        TaskSpan {
            id: Uuid::new_v4(),
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_single_task_has_no_edges() {
        let tasks = [span(at(9, 0), Some(at(9, 10)))];
        assert!(link_tasks(&tasks).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(link_tasks(&[]).is_empty());
    }

    #[test]
    fn test_sequential_tasks_form_a_chain() {
        let a = span(at(9, 0), Some(at(9, 10)));
        let b = span(at(9, 10), Some(at(9, 20)));
        let c = span(at(9, 20), Some(at(9, 30)));

        let edges = link_tasks_at(&[c, a, b], at(12, 0));

        assert_eq!(
            edges,
            vec![Edge { from: a.id, to: b.id }, Edge { from: b.id, to: c.id }]
        );
    }

    #[test]
    fn test_successor_skipping() {
        let now = at(10, 0);
        let a = span(at(9, 0), Some(at(9, 15)));
        let b = span(at(9, 5), Some(at(9, 40)));
        let c = span(at(9, 15), Some(at(9, 20)));
        let d = span(at(9, 20), Some(at(9, 30)));
        let e = span(at(9, 20), Some(at(9, 45)));
        let f = span(at(9, 35), None);

        let edges = link_tasks_at(&[a, b, c, d, e, f], now);

        assert!(edges.contains(&Edge { from: a.id, to: c.id }));
        assert!(edges.contains(&Edge { from: c.id, to: d.id }));
        assert!(edges.contains(&Edge { from: c.id, to: e.id }));
        assert!(edges.contains(&Edge { from: d.id, to: f.id }));
        assert!(!edges.contains(&Edge { from: c.id, to: f.id }));
        assert!(!edges.iter().any(|edge| edge.from == b.id || edge.to == b.id));
        assert_eq!(edges.len(), 4);
    }

    #[test]
    fn test_zero_duration_tasks_never_self_link() {
        let point = at(9, 0);
        let a = span(point, Some(point));
        let b = span(point, Some(point));
        let c = span(point + Duration::minutes(1), Some(point + Duration::minutes(1)));

        let edges = link_tasks_at(&[a, b, c], at(10, 0));

        assert!(edges.iter().all(|edge| edge.from != edge.to));
        assert!(!edges.contains(&Edge { from: a.id, to: b.id }));
        assert!(!edges.contains(&Edge { from: b.id, to: a.id }));
        assert!(edges.contains(&Edge { from: a.id, to: c.id }));
    }

    #[test]
    fn test_duplicate_ids_never_self_link() {
        let id = Uuid::new_v4();
        let first = TaskSpan {
            id,
            start_time: at(9, 0),
            end_time: Some(at(9, 5)),
        };
        let second = TaskSpan {
            id,
            start_time: at(9, 10),
            end_time: Some(at(9, 15)),
        };

        assert!(link_tasks_at(&[first, second], at(10, 0)).is_empty());
    }

    #[test]
    fn test_running_task_ends_now() {
        let a = span(at(9, 0), None);
        let b = span(at(9, 30), Some(at(9, 40)));

        // A is still running at 10:00, so B started before A finished.
        assert!(link_tasks_at(&[a, b], at(10, 0)).is_empty());
    }
}
