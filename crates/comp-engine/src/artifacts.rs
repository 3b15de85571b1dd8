//! Control Artifacts and Policies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evidence::{Evidence, Frequency};

/// Artifact attached to a control
///
/// `kind` decides which completion rule applies. Policy and evidence
/// artifacts carry the matching relation; procedure and training
/// artifacts have no substructure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    #[serde(default)]
    pub policy: Option<Policy>,
    #[serde(default)]
    pub evidence: Option<Evidence>,
}

impl Artifact {
    /// Policy artifact
    pub fn policy(id: &str, policy: Policy) -> Self {
        Self {
            id: id.to_string(),
            kind: ArtifactKind::Policy,
            policy: Some(policy),
            evidence: None,
        }
    }

    /// Evidence artifact
    pub fn evidence(id: &str, evidence: Evidence) -> Self {
        Self {
            id: id.to_string(),
            kind: ArtifactKind::Evidence,
            policy: None,
            evidence: Some(evidence),
        }
    }

    /// Artifact without a relation (procedure, training, or an unloaded one)
    pub fn bare(id: &str, kind: ArtifactKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            policy: None,
            evidence: None,
        }
    }
}

/// Artifact type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ArtifactKind {
    Policy,
    Evidence,
    Procedure,
    Training,
    /// Any type this engine does not know how to complete
    Unknown,
}

impl From<String> for ArtifactKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "policy" => Self::Policy,
            "evidence" => Self::Evidence,
            "procedure" => Self::Procedure,
            "training" => Self::Training,
            _ => Self::Unknown,
        }
    }
}

/// Policy record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub status: PolicyStatus,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub last_published_at: Option<DateTime<Utc>>,
}

impl Policy {
    /// Create policy in the given status
    pub fn new(id: &str, name: &str, status: PolicyStatus) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status,
            department: None,
            assignee_id: None,
            frequency: None,
            last_published_at: None,
        }
    }
}

/// Policy lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Draft,
    Published,
    NeedsReview,
    Archived,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_kind_unknown_string() {
        let kind: ArtifactKind = serde_json::from_str("\"vendor_questionnaire\"").unwrap();
        assert_eq!(kind, ArtifactKind::Unknown);
        let kind: ArtifactKind = serde_json::from_str("\"training\"").unwrap();
        assert_eq!(kind, ArtifactKind::Training);
    }

    #[test]
    fn test_artifact_decodes_null_relation() {
        let json = r#"{"id":"a1","type":"policy","policy":null}"#;
        let artifact: Artifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.kind, ArtifactKind::Policy);
        assert!(artifact.policy.is_none());
        assert!(artifact.evidence.is_none());
    }

    #[test]
    fn test_policy_status_strings() {
        let status: PolicyStatus = serde_json::from_str("\"needs_review\"").unwrap();
        assert_eq!(status, PolicyStatus::NeedsReview);
        assert_eq!(
            serde_json::to_string(&PolicyStatus::Published).unwrap(),
            "\"published\""
        );
    }
}
