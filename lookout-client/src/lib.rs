//! Lookout HTTP Client
//!
//! A type-safe client for the observability REST API.
//!
//! Resources are addressed through a fixed entity-type to URL-segment mapping,
//! optionally nested under a parent resource. [`EntityService`] provides the
//! generic CRUD calls, pagination and the two-request fetch-all.
//!
//! # Example
//!
//! ```no_run
//! use lookout_client::{ApiClient, ClientConfig};
//! use lookout_core::dto::page::PageRequest;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new(&ClientConfig::new("http://localhost:8082"))?;
//!     let project_id = Uuid::new_v4();
//!
//!     let runs = client
//!         .runs()
//!         .get_page(&PageRequest::new(0, 20).with_parent(project_id))
//!         .await?;
//!
//!     println!("{} runs", runs.total);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod resource;
pub mod service;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use resource::Resource;
pub use service::EntityService;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

use std::sync::Arc;

use lookout_core::domain::agent::Agent;
use lookout_core::domain::component::{Component, Schedule};
use lookout_core::domain::event::Event;
use lookout_core::domain::instance::Instance;
use lookout_core::domain::project::{Journey, Project};
use lookout_core::domain::run::{Run, RunTask};
use lookout_core::domain::test_outcome::TestOutcomeItem;
use lookout_core::domain::{Entity, EntityType};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the observability API
///
/// Cheap to clone: clones share the same transport.
#[derive(Clone)]
pub struct ApiClient {
    /// `{base}/{prefix}/{version}`
    root: String,
    /// Transport every request goes through
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a client backed by reqwest
    ///
    /// # Example
    /// ```
    /// use lookout_client::{ApiClient, ClientConfig};
    ///
    /// let client = ApiClient::new(&ClientConfig::new("http://localhost:8082")).unwrap();
    /// assert_eq!(client.root(), "http://localhost:8082/observability/v1");
    /// ```
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            root: config.api_root(),
            transport,
        }
    }

    /// URL every resource path is appended to
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Service for a top-level resource
    pub fn service<E: Entity>(&self) -> EntityService<E> {
        EntityService::new(self.clone())
    }

    /// Service for a resource listed under `parent`
    pub fn nested_service<E: Entity>(&self, parent: EntityType) -> EntityService<E> {
        EntityService::nested(self.clone(), parent)
    }

    // =============================================================================
    // Resources
    // =============================================================================

    pub fn projects(&self) -> EntityService<Project> {
        self.service()
    }

    pub fn journeys(&self) -> EntityService<Journey> {
        self.nested_service(EntityType::Project)
    }

    pub fn components(&self) -> EntityService<Component> {
        self.nested_service(EntityType::Project)
    }

    /// Schedules are created under their component
    pub fn schedules(&self) -> EntityService<Schedule> {
        self.nested_service(EntityType::Component)
    }

    pub fn runs(&self) -> EntityService<Run> {
        self.nested_service(EntityType::Project)
    }

    pub fn run_tasks(&self) -> EntityService<RunTask> {
        self.nested_service(EntityType::Run)
    }

    pub fn tests(&self) -> EntityService<TestOutcomeItem> {
        self.nested_service(EntityType::Project)
    }

    pub fn instances(&self) -> EntityService<Instance> {
        self.nested_service(EntityType::Project)
    }

    pub fn events(&self) -> EntityService<Event> {
        self.nested_service(EntityType::Project)
    }

    pub fn agents(&self) -> EntityService<Agent> {
        self.nested_service(EntityType::Project)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Send a request and deserialize its JSON body
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        Self::handle_response(response)
    }

    /// Send a request whose reply carries no content (e.g., DELETE)
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        Self::handle_empty_response(response)
    }

    /// Check the status code and deserialize the body on success
    fn handle_response<T: DeserializeOwned>(response: ApiResponse) -> Result<T> {
        if !response.is_success() {
            return Err(ClientError::api_error(response.status, response.body));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Check the status code only
    fn handle_empty_response(response: ApiResponse) -> Result<()> {
        if !response.is_success() {
            return Err(ClientError::api_error(response.status, response.body));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("root", &self.root).finish()
    }
}
