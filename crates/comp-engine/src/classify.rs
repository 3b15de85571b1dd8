//! Status Classifiers
//!
//! Leaf predicates: is this one unit of work complete. A relation that
//! failed to load counts as incomplete.

use crate::artifacts::{Artifact, ArtifactKind, Policy, PolicyStatus};
use crate::checks::{ExternalTestResult, TestOutcome};
use crate::evidence::Evidence;
use crate::tasks::{Task, TaskStatus};

pub fn is_policy_published(policy: &Policy) -> bool {
    policy.status == PolicyStatus::Published
}

pub fn is_evidence_published(evidence: &Evidence) -> bool {
    evidence.published
}

pub fn is_task_done(task: &Task) -> bool {
    task.status == TaskStatus::Done
}

pub fn is_test_passing(result: &ExternalTestResult) -> bool {
    result.status == TestOutcome::Passed
}

/// Whether an artifact counts as complete
///
/// Procedure and training artifacts are complete by existing.
pub fn is_artifact_completed(artifact: &Artifact) -> bool {
    match artifact.kind {
        ArtifactKind::Policy => match &artifact.policy {
            Some(policy) => is_policy_published(policy),
            None => {
                warn_missing_relation(artifact);
                false
            }
        },
        ArtifactKind::Evidence => match &artifact.evidence {
            Some(evidence) => is_evidence_published(evidence),
            None => {
                warn_missing_relation(artifact);
                false
            }
        },
        ArtifactKind::Procedure | ArtifactKind::Training => true,
        ArtifactKind::Unknown => false,
    }
}

/// Whether no work has started on an artifact
///
/// Draft or missing policies and unpublished or missing evidence are
/// untouched. A policy in `needs_review` or `archived` is incomplete but
/// not untouched.
pub fn is_artifact_untouched(artifact: &Artifact) -> bool {
    match artifact.kind {
        ArtifactKind::Policy => artifact
            .policy
            .as_ref()
            .map_or(true, |p| p.status == PolicyStatus::Draft),
        ArtifactKind::Evidence => artifact
            .evidence
            .as_ref()
            .map_or(true, |e| !is_evidence_published(e)),
        ArtifactKind::Procedure | ArtifactKind::Training => false,
        ArtifactKind::Unknown => true,
    }
}

fn warn_missing_relation(artifact: &Artifact) {
    tracing::warn!(
        artifact_id = %artifact.id,
        kind = ?artifact.kind,
        "artifact relation not loaded, counting as incomplete"
    );
}
