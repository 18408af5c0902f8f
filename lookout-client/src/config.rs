//! Client configuration
//!
//! Connection settings for the observability API: where it lives, which
//! prefix and version to address, and how to authenticate.

use std::time::Duration;

/// API connection configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8082")
    pub base_url: String,

    /// Path prefix in front of every resource
    pub prefix: String,

    /// API version segment
    pub version: String,

    /// Bearer token attached to every request
    pub token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: "observability".to_string(),
            version: "v1".to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - LOOKOUT_API_URL (required)
    /// - LOOKOUT_API_PREFIX (optional, default: observability)
    /// - LOOKOUT_API_VERSION (optional, default: v1)
    /// - LOOKOUT_API_TOKEN (optional)
    /// - LOOKOUT_API_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("LOOKOUT_API_URL")
            .map_err(|_| anyhow::anyhow!("LOOKOUT_API_URL environment variable not set"))?;

        let mut config = Self::new(base_url);

        if let Ok(prefix) = std::env::var("LOOKOUT_API_PREFIX") {
            config.prefix = prefix;
        }

        if let Ok(version) = std::env::var("LOOKOUT_API_VERSION") {
            config.version = version;
        }

        config.token = std::env::var("LOOKOUT_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        config.timeout = std::env::var("LOOKOUT_API_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// URL every resource path is appended to
    pub fn api_root(&self) -> String {
        [self.base_url.as_str(), self.prefix.as_str(), self.version.as_str()]
            .iter()
            .map(|part| part.trim_matches('/'))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.version.is_empty() {
            anyhow::bail!("version cannot be empty");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8082")
    }
}
