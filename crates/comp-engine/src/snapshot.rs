//! Organization Snapshot
//!
//! The hydrated object graph handed over by the persistence layer. The
//! engine reads it and never writes it back.

use comp_common::{CompError, CompResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

use crate::artifacts::Policy;
use crate::checks::ExternalTestResult;
use crate::evidence::Evidence;
use crate::frameworks::{Control, Framework, FrameworkInstance, Requirement};
use crate::tasks::Task;

/// Everything the engine needs about one organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgSnapshot {
    pub organization_id: String,
    pub frameworks: Vec<Framework>,
    pub framework_instances: Vec<FrameworkInstance>,
    pub requirements: Vec<Requirement>,
    pub controls: Vec<Control>,
    pub policies: Vec<Policy>,
    pub evidence: Vec<Evidence>,
    pub tasks: Vec<Task>,
    pub test_results: Vec<ExternalTestResult>,
}

impl OrgSnapshot {
    /// Decode and sanity-check a JSON snapshot
    pub fn from_json(json: &str) -> CompResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject snapshots whose ids collide
    pub fn validate(&self) -> CompResult<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = self.controls.iter().find(|c| !seen.insert(c.id.as_str())) {
            return Err(CompError::Snapshot(format!("duplicate control id {}", dup.id)));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self
            .framework_instances
            .iter()
            .find(|fi| !seen.insert(fi.id.as_str()))
        {
            return Err(CompError::Snapshot(format!(
                "duplicate framework instance id {}",
                dup.id
            )));
        }
        Ok(())
    }

    /// Hex SHA-256 of the JSON encoding
    ///
    /// Field and element order are fixed, so equal snapshots hash equally.
    pub fn digest(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }

    /// Controls by id
    pub fn control_index(&self) -> HashMap<&str, &Control> {
        self.controls.iter().map(|c| (c.id.as_str(), c)).collect()
    }
}

/// Controls mapped into one framework instance
///
/// Map entries that point at an unknown control are skipped.
pub fn instance_controls<'a>(
    instance: &FrameworkInstance,
    index: &HashMap<&str, &'a Control>,
) -> Vec<&'a Control> {
    instance
        .control_ids()
        .into_iter()
        .filter_map(|id| index.get(id).copied())
        .collect()
}

/// Distinct policies and evidence reachable through a set of controls
///
/// Deduplicated by id, first occurrence wins.
pub fn linked_artifacts<'a>(controls: &[&'a Control]) -> (Vec<&'a Policy>, Vec<&'a Evidence>) {
    let mut policy_ids = HashSet::new();
    let mut evidence_ids = HashSet::new();
    let mut policies = Vec::new();
    let mut evidence = Vec::new();

    for artifact in controls.iter().copied().flat_map(|c| c.artifacts.iter()) {
        if let Some(p) = &artifact.policy {
            if policy_ids.insert(p.id.as_str()) {
                policies.push(p);
            }
        }
        if let Some(e) = &artifact.evidence {
            if evidence_ids.insert(e.id.as_str()) {
                evidence.push(e);
            }
        }
    }
    (policies, evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{Artifact, PolicyStatus};

    #[test]
    fn test_from_json_defaults() {
        let snapshot = OrgSnapshot::from_json(r#"{"organization_id":"org_1"}"#).unwrap();
        assert_eq!(snapshot.organization_id, "org_1");
        assert!(snapshot.controls.is_empty());
    }

    #[test]
    fn test_duplicate_control_rejected() {
        let json = r#"{"controls":[{"id":"c1","name":"A"},{"id":"c1","name":"B"}]}"#;
        let err = OrgSnapshot::from_json(json).unwrap_err();
        assert!(matches!(err, CompError::Snapshot(_)));
    }

    #[test]
    fn test_digest_stable_and_sensitive() {
        let mut snapshot = OrgSnapshot {
            organization_id: "org_1".into(),
            ..OrgSnapshot::default()
        };
        let first = snapshot.digest();
        assert_eq!(first, snapshot.clone().digest());
        assert_eq!(first.len(), 64);

        snapshot.controls.push(Control::new("c1", "Access reviews"));
        assert_ne!(first, snapshot.digest());
    }

    #[test]
    fn test_linked_artifacts_dedupes() {
        let shared = Policy::new("p1", "Access Control", PolicyStatus::Published);
        let c1 = Control::new("c1", "A").with_artifact(Artifact::policy("a1", shared.clone()));
        let c2 = Control::new("c2", "B")
            .with_artifact(Artifact::policy("a2", shared))
            .with_artifact(Artifact::evidence("a3", Evidence::new("e1", "Review")));

        let (policies, evidence) = linked_artifacts(&[&c1, &c2]);
        assert_eq!(policies.len(), 1);
        assert_eq!(evidence.len(), 1);
    }
}
