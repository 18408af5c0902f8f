//! Run poller
//!
//! Refreshes the watched project's run page on a fixed interval and logs
//! what changed: run status transitions, test progress of running runs and
//! the rolled-up project status.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use lookout_client::ApiClient;
use lookout_core::domain::run::Run;
use lookout_core::dto::page::{FindAllRequest, PageRequest};
use lookout_core::status::{RunProcessedStatus, run_status_from_tests};
use lookout_store::{RunOverview, RunStore, overview, spawn_refresh};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A run whose status differs from the previous poll
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub run_id: Uuid,
    pub key: String,
    /// `None` the first time a run is seen
    pub from: Option<RunProcessedStatus>,
    pub to: RunProcessedStatus,
}

/// Record the latest status of each run and report the ones that moved
pub fn status_changes(
    known: &mut HashMap<Uuid, RunProcessedStatus>,
    runs: &[Run],
) -> Vec<StatusChange> {
    runs.iter()
        .filter_map(|run| {
            let from = known.insert(run.id, run.status);
            (from != Some(run.status)).then(|| StatusChange {
                run_id: run.id,
                key: run.key.clone(),
                from,
                to: run.status,
            })
        })
        .collect()
}

/// Outcome of one poll cycle
#[derive(Debug, Clone)]
pub struct PollReport {
    pub overview: RunOverview,
    pub changes: Vec<StatusChange>,
}

/// Poller keeping one project's runs fresh
#[derive(Clone)]
pub struct RunPoller {
    client: ApiClient,
    runs: RunStore,
    project_id: Uuid,
    page_size: u32,
    known: Arc<Mutex<HashMap<Uuid, RunProcessedStatus>>>,
}

impl RunPoller {
    pub fn new(client: ApiClient, project_id: Uuid, page_size: u32) -> Self {
        Self {
            runs: RunStore::new(&client),
            client,
            project_id,
            page_size,
            known: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn runs(&self) -> &RunStore {
        &self.runs
    }

    /// Starts polling every `interval`
    ///
    /// Cycles are not serialized: a slow cycle overlaps the next one and the
    /// run store keeps only the latest page.
    pub fn start(&self, interval: Duration) -> JoinHandle<()> {
        info!("Starting run poller (interval: {:?})", interval);

        let poller = self.clone();
        spawn_refresh(interval, move || {
            let poller = poller.clone();
            async move {
                if let Err(e) = poller.poll_once().await {
                    warn!("Error during poll cycle: {:#}", e);
                }
            }
        })
    }

    /// Performs a single poll cycle
    ///
    /// Changes are read from the store, not from the fetched page, so a cycle
    /// whose page was superseded by a newer one reports nothing.
    pub async fn poll_once(&self) -> Result<PollReport> {
        let load = match self
            .runs
            .refresh_page()
            .await
            .context("Failed to refresh runs")?
        {
            Some(load) => load,
            None => self
                .runs
                .load_page(&self.first_page())
                .await
                .context("Failed to fetch runs")?,
        };

        if !load.applied {
            debug!("Run page superseded by a newer poll, skipping change detection");
            return Ok(PollReport {
                overview: self.runs.overview(),
                changes: Vec::new(),
            });
        }

        let (runs, changes) = {
            let mut known = self.known.lock().unwrap();
            let runs = self.runs.entities().snapshot().list;
            let changes = status_changes(&mut known, &runs);
            (runs, changes)
        };

        for change in &changes {
            match change.from {
                Some(from) => info!("Run {} changed: {} -> {}", change.key, from, change.to),
                None => debug!("Tracking run {} ({})", change.key, change.to),
            }
        }

        for run in runs
            .iter()
            .filter(|run| run.status == RunProcessedStatus::Running)
        {
            match self.test_status(run).await {
                Ok(Some(status)) => info!("Run {} is running, tests so far: {}", run.key, status),
                Ok(None) => {}
                Err(e) => warn!("Failed to fetch tests for run {}: {:#}", run.key, e),
            }
        }

        let overview = overview(&runs);
        info!(
            "Project {}: {} ({} runs, {} error alerts, {} warning alerts)",
            self.project_id,
            overview.status,
            overview.runs.total,
            overview.alerts.errors.count,
            overview.alerts.warnings.count
        );

        Ok(PollReport { overview, changes })
    }

    fn first_page(&self) -> PageRequest {
        PageRequest::new(0, self.page_size)
            .with_parent(self.project_id)
            .with_sort("desc")
    }

    /// Status implied by the tests a run has reported, if it reported any
    async fn test_status(&self, run: &Run) -> Result<Option<RunProcessedStatus>> {
        let request = FindAllRequest::with_parent(self.project_id).with_filter("run_id", run.id.to_string());
        let tests = self.client.tests().find_all(&request).await?;

        if tests.entities.is_empty() {
            return Ok(None);
        }

        Ok(Some(run_status_from_tests(&tests.entities)))
    }
}
