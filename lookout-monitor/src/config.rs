//! Monitor configuration
//!
//! Which API to talk to, which project to watch, and how often to refresh.

use std::path::PathBuf;
use std::time::Duration;

use lookout_client::ClientConfig;
use tracing::info;
use uuid::Uuid;

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection settings for the observability API
    pub client: ClientConfig,

    /// Project to watch; falls back to the persisted selection when unset
    pub project_id: Option<Uuid>,

    /// How often to refresh the run page
    pub poll_interval: Duration,

    /// Runs fetched per refresh
    pub page_size: u32,

    /// File holding the persisted project selection
    pub state_file: PathBuf,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(client: ClientConfig) -> Self {
        Self {
            client,
            project_id: None,
            poll_interval: Duration::from_secs(30),
            page_size: 50,
            state_file: PathBuf::from(".lookout/state.json"),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Client settings fall back to their defaults when LOOKOUT_API_URL is
    /// unset. A malformed LOOKOUT_PROJECT_ID is an error.
    ///
    /// Expected environment variables, on top of the client's own:
    /// - LOOKOUT_PROJECT_ID (optional, UUID)
    /// - POLL_INTERVAL (optional, seconds, default: 30)
    /// - PAGE_SIZE (optional, default: 50)
    /// - LOOKOUT_STATE_FILE (optional, default: .lookout/state.json)
    pub fn from_env() -> anyhow::Result<Self> {
        let client = if std::env::var_os("LOOKOUT_API_URL").is_some() {
            ClientConfig::from_env()?
        } else {
            info!("LOOKOUT_API_URL not set, using default API settings");
            ClientConfig::default()
        };
        let mut config = Self::new(client);

        config.project_id = parse_project_id(std::env::var("LOOKOUT_PROJECT_ID").ok())?;

        config.poll_interval = std::env::var("POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        config.page_size = std::env::var("PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(50);

        if let Ok(path) = std::env::var("LOOKOUT_STATE_FILE") {
            config.state_file = PathBuf::from(path);
        }

        Ok(config)
    }

    pub fn with_project(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.client.validate()?;

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.page_size == 0 {
            anyhow::bail!("page_size must be greater than 0");
        }

        if self.state_file.as_os_str().is_empty() {
            anyhow::bail!("state_file cannot be empty");
        }

        Ok(())
    }
}

/// Parses LOOKOUT_PROJECT_ID; unset or empty means no configured project
pub fn parse_project_id(value: Option<String>) -> anyhow::Result<Option<Uuid>> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            Uuid::parse_str(s.trim())
                .map_err(|e| anyhow::anyhow!("LOOKOUT_PROJECT_ID is not a valid UUID: {}", e))
        })
        .transpose()
}

impl Default for Config {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}
