//! Task Board Records
//!
//! Tasks point at their parent by an `(entity_id, entity_type)` pair rather
//! than a relation, so linking is a filter over the flat task list.

use serde::{Deserialize, Serialize};

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub entity_id: String,
    pub entity_type: EntityType,
}

impl Task {
    /// Create task attached to an entity
    pub fn new(id: &str, status: TaskStatus, entity_id: &str, entity_type: EntityType) -> Self {
        Self {
            id: id.to_string(),
            title: String::new(),
            status,
            entity_id: entity_id.to_string(),
            entity_type,
        }
    }

    /// Task attached to a control
    pub fn for_control(id: &str, status: TaskStatus, control_id: &str) -> Self {
        Self::new(id, status, control_id, EntityType::Control)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

/// Kind of entity a task is attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Control,
    Policy,
    Evidence,
    Vendor,
    Risk,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Control => "control",
            Self::Policy => "policy",
            Self::Evidence => "evidence",
            Self::Vendor => "vendor",
            Self::Risk => "risk",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "control" => Self::Control,
            "policy" => Self::Policy,
            "evidence" => Self::Evidence,
            "vendor" => Self::Vendor,
            "risk" => Self::Risk,
            _ => Self::Other(s),
        }
    }
}

impl From<EntityType> for String {
    fn from(t: EntityType) -> Self {
        t.as_str().to_string()
    }
}

/// Tasks attached to one entity
pub fn tasks_for_entity<'a>(
    tasks: &'a [Task],
    entity_id: &str,
    entity_type: &EntityType,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.entity_id == entity_id && &t.entity_type == entity_type)
        .collect()
}
