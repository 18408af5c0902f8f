//! Run store
//!
//! Runs of a project or pipeline, the task graph of the run being inspected,
//! and a compact overview of whatever page is loaded.

use std::sync::{Arc, Mutex};

use lookout_client::{ApiClient, EntityService};
use lookout_core::domain::run::{Run, RunTask};
use lookout_core::dto::page::{FindAllRequest, Page, PageRequest};
use lookout_core::dto::summary::SummaryItem;
use lookout_core::graph::{Edge, link_run_tasks};
use lookout_core::status::{RunProcessedStatus, TestStatus, most_important_status};
use lookout_core::summary::{
    AlertAggregate, CompleteSummary, aggregate_alerts, get_complete_summary,
};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::store::{EntityStore, PageLoad, Sequencer};

/// Tasks of one run with the inferred execution edges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskGraph {
    pub run_id: Option<Uuid>,
    pub tasks: Vec<RunTask>,
    pub edges: Vec<Edge>,
}

/// Rollup of a set of runs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunOverview {
    /// Most important status across the runs, `Pending` when there are none
    pub status: RunProcessedStatus,
    pub runs: CompleteSummary<RunProcessedStatus>,
    pub tasks: CompleteSummary<RunProcessedStatus>,
    pub tests: CompleteSummary<TestStatus>,
    pub alerts: AlertAggregate,
}

pub fn overview(runs: &[Run]) -> RunOverview {
    let statuses: Vec<_> = runs
        .iter()
        .map(|run| SummaryItem::new(run.status, 1))
        .collect();

    RunOverview {
        status: most_important_status(runs.iter().map(|run| run.status)),
        runs: get_complete_summary(&statuses),
        tasks: get_complete_summary(runs.iter().flat_map(|run| &run.tasks_summary)),
        tests: get_complete_summary(runs.iter().flat_map(|run| &run.tests_summary)),
        alerts: aggregate_alerts(runs.iter().flat_map(|run| &run.alerts)),
    }
}

/// Store of runs and the task graph of the selected run
#[derive(Clone)]
pub struct RunStore {
    runs: EntityStore<Run>,
    tasks: EntityService<RunTask>,
    graph: Arc<watch::Sender<TaskGraph>>,
    graph_sequencer: Arc<Sequencer>,
    last_request: Arc<Mutex<Option<PageRequest>>>,
}

impl RunStore {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            runs: EntityStore::new(client.runs()),
            tasks: client.run_tasks(),
            graph: Arc::new(watch::channel(TaskGraph::default()).0),
            graph_sequencer: Arc::new(Sequencer::default()),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn entities(&self) -> &EntityStore<Run> {
        &self.runs
    }

    pub fn subscribe_graph(&self) -> watch::Receiver<TaskGraph> {
        self.graph.subscribe()
    }

    pub fn graph_snapshot(&self) -> TaskGraph {
        self.graph.borrow().clone()
    }

    /// Overview of the loaded page
    pub fn overview(&self) -> RunOverview {
        overview(&self.runs.snapshot().list)
    }

    /// Load a page of runs and remember the request for `refresh_page`
    pub async fn get_page(&self, request: &PageRequest) -> Result<Page<Run>> {
        self.load_page(request).await.map(|load| load.page)
    }

    /// Like `get_page`, also reporting whether the page was applied
    pub async fn load_page(&self, request: &PageRequest) -> Result<PageLoad<Run>> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.runs.load_page(request).await
    }

    /// Re-issue the last page request
    ///
    /// Returns `None` when no page has been requested yet.
    pub async fn refresh_page(&self) -> Result<Option<PageLoad<Run>>> {
        let request = self.last_request.lock().unwrap().clone();
        match request {
            Some(request) => self.runs.load_page(&request).await.map(Some),
            None => {
                debug!("no run page to refresh");
                Ok(None)
            }
        }
    }

    /// Fetch every task of a run and derive its execution edges
    pub async fn get_tasks(&self, run_id: Uuid) -> Result<TaskGraph> {
        let ticket = self.graph_sequencer.list();
        let page = self
            .tasks
            .find_all(&FindAllRequest::with_parent(run_id))
            .await?;

        let graph = TaskGraph {
            run_id: Some(run_id),
            edges: link_run_tasks(&page.entities),
            tasks: page.entities,
        };
        debug!(%run_id, tasks = graph.tasks.len(), edges = graph.edges.len(), "linked run tasks");

        let sequencer = &self.graph_sequencer;
        self.graph.send_if_modified(|current| {
            if !sequencer.is_current(ticket) {
                debug!(%run_id, "discarding stale task graph");
                return false;
            }
            *current = graph.clone();
            true
        });

        Ok(graph)
    }

    /// Reset runs and the task graph, orphaning in-flight loads
    pub fn reset(&self) {
        self.runs.reset();
        let sequencer = &self.graph_sequencer;
        self.graph.send_modify(|graph| {
            sequencer.invalidate();
            *graph = TaskGraph::default();
        });
        *self.last_request.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lookout_client::ClientConfig;
    use lookout_client::testing::RecordingTransport;
    use lookout_core::domain::alert::{Alert, AlertLevel};
    use lookout_core::domain::component::ComponentRef;
    use serde_json::{Value, json};

    fn run(status: RunProcessedStatus) -> Run {
        Run {
            id: Uuid::new_v4(),
            key: "nightly".to_string(),
            name: None,
            pipeline: ComponentRef::new(Uuid::new_v4()),
            status,
            start_time: None,
            end_time: None,
            tasks_summary: Vec::new(),
            tests_summary: Vec::new(),
            alerts: Vec::new(),
        }
    }

    fn alert(level: AlertLevel, count: u64) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            level,
            alert_type: "LATE_END".to_string(),
            description: String::new(),
            created_on: Utc::now(),
            count,
        }
    }

    fn task_json(id: Uuid, key: &str, start: &str, end: Option<&str>) -> Value {
        json!({
            "id": id,
            "task": { "id": Uuid::new_v4(), "key": key },
            "start_time": start,
            "end_time": end,
            "status": "COMPLETED"
        })
    }

    fn store(transport: &RecordingTransport) -> RunStore {
        let client = ApiClient::with_transport(
            &ClientConfig::new("http://api.test"),
            Arc::new(transport.clone()),
        );
        RunStore::new(&client)
    }

    #[test]
    fn test_overview_rolls_up_runs() {
        let mut failed = run(RunProcessedStatus::Failed);
        failed.tasks_summary = vec![
            SummaryItem::new(RunProcessedStatus::Completed, 3),
            SummaryItem::new(RunProcessedStatus::Failed, 1),
        ];
        failed.alerts = vec![alert(AlertLevel::Error, 2)];

        let mut warned = run(RunProcessedStatus::CompletedWithWarnings);
        warned.tasks_summary = vec![SummaryItem::new(RunProcessedStatus::Completed, 2)];
        warned.tests_summary = vec![SummaryItem::new(TestStatus::Warning, 1)];
        warned.alerts = vec![alert(AlertLevel::Warning, 1)];

        let overview = overview(&[failed, warned, run(RunProcessedStatus::Running)]);

        assert_eq!(overview.status, RunProcessedStatus::Failed);
        assert_eq!(overview.runs.total, 3);
        assert_eq!(overview.tasks.get(&RunProcessedStatus::Completed), 5);
        assert_eq!(overview.tasks.total, 6);
        assert_eq!(overview.tests.get(&TestStatus::Warning), 1);
        assert_eq!(overview.alerts.errors.count, 2);
        assert_eq!(overview.alerts.total(), 3);
    }

    #[test]
    fn test_overview_of_nothing() {
        let overview = overview(&[]);
        assert_eq!(overview.status, RunProcessedStatus::Pending);
        assert_eq!(overview.runs.total, 0);
        assert_eq!(overview.alerts.total(), 0);
    }

    #[tokio::test]
    async fn test_get_tasks_links_graph() {
        let transport = RecordingTransport::new();
        let run_id = Uuid::new_v4();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        transport
            .respond(200, json!({ "entities": [], "total": 3 }))
            .respond(
                200,
                json!({
                    "entities": [
                        task_json(a, "extract", "2026-01-01T09:00:00Z", Some("2026-01-01T09:10:00Z")),
                        task_json(b, "transform", "2026-01-01T09:10:00Z", Some("2026-01-01T09:20:00Z")),
                        task_json(c, "load", "2026-01-01T09:20:00Z", Some("2026-01-01T09:30:00Z"))
                    ],
                    "total": 3
                }),
            );
        let store = store(&transport);

        let graph = store.get_tasks(run_id).await.unwrap();

        assert_eq!(graph.run_id, Some(run_id));
        assert_eq!(graph.tasks.len(), 3);
        assert_eq!(
            graph.edges,
            vec![Edge { from: a, to: b }, Edge { from: b, to: c }]
        );
        assert_eq!(store.graph_snapshot(), graph);

        let requests = transport.requests();
        assert_eq!(
            requests[1].url,
            format!("http://api.test/observability/v1/runs/{}/tasks", run_id)
        );
        assert_eq!(requests[1].query_value("count"), Some("3"));
        assert_eq!(
            graph.tasks[0].start_time,
            Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_refresh_page_reissues_last_request() {
        let transport = RecordingTransport::new();
        let page = json!({ "entities": [], "total": 0 });
        transport.respond(200, page.clone()).respond(200, page);
        let store = store(&transport);

        assert!(store.refresh_page().await.unwrap().is_none());
        assert!(transport.requests().is_empty());

        let project_id = Uuid::new_v4();
        let request = PageRequest::new(2, 25).with_parent(project_id);
        store.get_page(&request).await.unwrap();
        let refreshed = store.refresh_page().await.unwrap().unwrap();
        assert!(refreshed.applied);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
        assert_eq!(requests[1].query_value("page"), Some("3"));
    }

    #[tokio::test]
    async fn test_reset_clears_graph_and_last_request() {
        let transport = RecordingTransport::new();
        transport
            .respond(200, json!({ "entities": [], "total": 0 }))
            .respond(200, json!({ "entities": [], "total": 0 }));
        let store = store(&transport);

        store.get_page(&PageRequest::new(0, 10)).await.unwrap();
        store.get_tasks(Uuid::new_v4()).await.unwrap();
        store.reset();

        assert_eq!(store.graph_snapshot(), TaskGraph::default());
        assert!(store.refresh_page().await.unwrap().is_none());
    }
}
