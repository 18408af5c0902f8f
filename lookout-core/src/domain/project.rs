//! Project and journey domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{Entity, EntityMeta, EntityType};

/// A project groups components, journeys and integrations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub meta: EntityMeta,
}

impl Entity for Project {
    const KIND: EntityType = EntityType::Project;

    fn id(&self) -> Uuid {
        self.meta.id
    }
}

/// A journey is a directed graph of components observed together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    #[serde(flatten)]
    pub meta: EntityMeta,
    #[serde(default)]
    pub project: Option<Uuid>,
}

impl Entity for Journey {
    const KIND: EntityType = EntityType::Journey;

    fn id(&self) -> Uuid {
        self.meta.id
    }

    fn readonly_fields() -> &'static [&'static str] {
        &["created_on", "created_by", "active", "project"]
    }
}
