//! Framework, Requirement and Control Definitions

pub mod soc2;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::artifacts::Artifact;
use crate::control_status::ManualStatus;

/// Compliance framework (static reference data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
}

/// Clause of a framework definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub framework_id: String,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Requirement {
    /// Catalog identity, `{framework_id}_{key}`
    pub fn composite_id(&self) -> String {
        format!("{}_{}", self.framework_id, self.key)
    }
}

/// Framework activated for one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkInstance {
    pub id: String,
    pub framework_id: String,
    #[serde(default)]
    pub framework: Option<Framework>,
    #[serde(default)]
    pub requirement_maps: Vec<RequirementMap>,
}

impl FrameworkInstance {
    /// Display name, falling back to the framework id when the relation is not loaded
    pub fn name(&self) -> &str {
        self.framework
            .as_ref()
            .map(|f| f.name.as_str())
            .unwrap_or(&self.framework_id)
    }

    /// Distinct control ids mapped into this instance, in first-seen order
    pub fn control_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.requirement_maps
            .iter()
            .filter(|m| m.framework_instance_id == self.id)
            .map(|m| m.control_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Maps of this instance that point at `requirement_id`
    pub fn maps_for_requirement<'a>(
        &'a self,
        requirement_id: &'a str,
    ) -> impl Iterator<Item = &'a RequirementMap> + 'a {
        self.requirement_maps
            .iter()
            .filter(move |m| m.framework_instance_id == self.id && m.requirement_id == requirement_id)
    }
}

/// Control to requirement link within one framework instance
///
/// `(control_id, framework_instance_id, requirement_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequirementMap {
    pub control_id: String,
    pub framework_instance_id: String,
    pub requirement_id: String,
}

/// Drop repeated `(control, instance, requirement)` triples, keeping the first
pub fn dedupe_requirement_maps(maps: &[RequirementMap]) -> Vec<RequirementMap> {
    let mut seen = HashSet::new();
    maps.iter().filter(|m| seen.insert(*m)).cloned().collect()
}

/// Organizational control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Status set by hand, takes precedence over the computed one
    #[serde(default)]
    pub manual_status: Option<ManualStatus>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Control {
    /// Create control with no artifacts
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            manual_status: None,
            artifacts: Vec::new(),
        }
    }

    /// Attach artifact
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }
}
