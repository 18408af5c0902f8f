//! Entity abstractions shared by every API resource

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resource kinds known to the API, each mapped to a fixed URL segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    User,
    Company,
    Organization,
    Project,
    Event,
    Pipeline,
    Run,
    Task,
    Rule,
    Journey,
    Instance,
    Component,
    ServiceKey,
    Dashboards,
    Agent,
    Schedule,
    TestOutcome,
    Alert,
}

impl EntityType {
    /// URL path segment for this resource kind
    pub fn segment(self) -> &'static str {
        match self {
            EntityType::User => "users",
            EntityType::Company => "companies",
            EntityType::Organization => "organizations",
            EntityType::Project => "projects",
            EntityType::Event => "events",
            EntityType::Pipeline => "pipelines",
            EntityType::Run => "runs",
            EntityType::Task => "tasks",
            EntityType::Rule => "rules",
            EntityType::Journey => "journeys",
            EntityType::Instance => "instances",
            EntityType::Component => "components",
            EntityType::ServiceKey => "service-account-key",
            EntityType::Dashboards => "dashboards",
            EntityType::Agent => "agents",
            EntityType::Schedule => "schedules",
            EntityType::TestOutcome => "tests",
            EntityType::Alert => "alerts",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segment())
    }
}

/// Fields assigned by the server and never sent back on create or update
pub const SERVER_ASSIGNED_FIELDS: &[&str] = &["created_on", "created_by", "active"];

/// An addressable API resource
///
/// Every entity has an immutable id and belongs to exactly one resource kind.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Resource kind used to build request URLs
    const KIND: EntityType;

    /// Server-assigned identifier
    fn id(&self) -> Uuid;

    /// JSON keys stripped from request bodies
    fn readonly_fields() -> &'static [&'static str] {
        SERVER_ASSIGNED_FIELDS
    }
}

/// Reference to the user that created an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}

/// Common fields of named entities (projects, journeys, components)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMeta {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<UserRef>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl EntityMeta {
    /// Metadata for an entity that has not been persisted yet
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            created_on: None,
            created_by: None,
            active: true,
        }
    }
}

fn default_active() -> bool {
    true
}
