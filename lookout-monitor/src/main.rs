//! Lookout Monitor
//!
//! A headless watcher that keeps one project's runs fresh and logs their
//! derived status.
//!
//! Architecture:
//! - Configuration: Load settings from environment, defaulting what is unset
//! - Stores: Client-side state for projects and runs (lookout-store)
//! - Scheduler: Fixed-interval run polling
//!
//! The watched project comes from `LOOKOUT_PROJECT_ID` or, failing that, the
//! selection persisted by a previous session.

mod config;
mod scheduler;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::Config;
use crate::scheduler::RunPoller;
use lookout_client::ApiClient;
use lookout_store::{JsonFileStorage, ProjectStore, SelectionStorage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lookout_monitor=info,lookout_store=info,lookout_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lookout Monitor");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: api={}, state_file={}",
        config.client.api_root(),
        config.state_file.display()
    );

    let client = ApiClient::new(&config.client).context("Failed to build API client")?;
    info!("API client initialized");

    // Restore the previous selection, then keep it persisted
    let storage: Arc<dyn SelectionStorage> = Arc::new(JsonFileStorage::new(&config.state_file));
    let projects = ProjectStore::new(&client);
    if let Err(e) = projects.restore_selection(storage.as_ref()) {
        warn!("Failed to restore selected project: {}", e);
    }
    let observer = projects.persist_selection(Arc::clone(&storage));

    let project_id = resolve_project(&config, &projects)?;
    let project = projects
        .select(project_id)
        .await
        .with_context(|| format!("Failed to fetch project {}", project_id))?;
    info!("Watching project {} ({})", project.meta.name, project.meta.id);

    let poller = RunPoller::new(client, project_id, config.page_size);
    let handle = poller.start(config.poll_interval);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutting down");
    handle.abort();
    observer.abort();

    Ok(())
}

/// Loads and validates configuration from environment variables
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Invalid configuration")?;
    config.validate()?;
    Ok(config)
}

/// Project to watch: configured id first, then the restored selection
fn resolve_project(config: &Config, projects: &ProjectStore) -> Result<Uuid> {
    if let Some(id) = config.project_id {
        return Ok(id);
    }

    projects
        .selected()
        .map(|project| project.meta.id)
        .context("No project to watch: set LOOKOUT_PROJECT_ID")
}
