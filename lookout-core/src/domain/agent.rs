//! Agent (integration) domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{Entity, EntityType};

/// Health of an integration agent as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    Online,
    Unhealthy,
    Offline,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Online => write!(f, "Online"),
            AgentStatus::Unhealthy => write!(f, "Unhealthy"),
            AgentStatus::Offline => write!(f, "Offline"),
        }
    }
}

/// An agent pushing events from a tool into a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: Uuid,
    pub key: String,
    pub tool: String,
    #[serde(default)]
    pub version: Option<String>,
    pub latest_heartbeat: DateTime<Utc>,
    pub status: AgentStatus,
}

impl Entity for Agent {
    const KIND: EntityType = EntityType::Agent;

    fn id(&self) -> Uuid {
        self.id
    }
}
