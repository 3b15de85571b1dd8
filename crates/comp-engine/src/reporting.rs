//! Compliance Reporting

use chrono::{DateTime, Utc};
use comp_common::Percentage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::aggregate::{
    aggregate_framework_compliance, requirement_progress, resolve_all, FrameworkCompliance,
    RequirementProgress, StatusIndex,
};
use crate::config::EngineConfig;
use crate::control_status::ControlStatus;
use crate::evidence::policy_needs_review;
use crate::frameworks::{Control, FrameworkInstance};
use crate::grouping::{
    evidence_status_counts, group_controls_by_framework, group_evidence_by_assignee,
    group_evidence_by_department, group_evidence_by_framework, AssigneeGrouping, ControlGroup,
    EvidenceGroup, EvidenceStatusCounts,
};
use crate::overall::OrgCompliance;
use crate::snapshot::{instance_controls, linked_artifacts, OrgSnapshot};

/// Report generator
pub struct ReportGenerator;

impl ReportGenerator {
    /// Full organization report
    ///
    /// Same snapshot, `now` and config always give the same report.
    pub fn org_report(snapshot: &OrgSnapshot, now: DateTime<Utc>, config: &EngineConfig) -> OrgReport {
        let index = snapshot.control_index();
        let statuses = resolve_all(&snapshot.controls, &snapshot.tasks, config);

        let frameworks: Vec<_> = snapshot
            .framework_instances
            .iter()
            .map(|instance| Self::framework_report(snapshot, instance, &index, &statuses, config))
            .collect();

        let overall = OrgCompliance::compute(
            &snapshot.policies,
            &snapshot.evidence,
            &snapshot.test_results,
        );

        tracing::info!(
            organization = %snapshot.organization_id,
            frameworks = frameworks.len(),
            overall = %overall.overall,
            "generated compliance report"
        );

        OrgReport {
            organization_id: snapshot.organization_id.clone(),
            generated_at: now,
            snapshot_digest: snapshot.digest(),
            overall,
            frameworks,
            evidence: evidence_status_counts(&snapshot.evidence, now),
            evidence_by_department: group_evidence_by_department(&snapshot.evidence, now),
            evidence_by_assignee: group_evidence_by_assignee(&snapshot.evidence, now),
            evidence_by_framework: group_evidence_by_framework(&snapshot.evidence, now),
            controls_by_framework: group_controls_by_framework(
                &snapshot.framework_instances,
                &statuses,
            ),
            policies_needing_review: snapshot
                .policies
                .iter()
                .filter(|p| policy_needs_review(p, now))
                .map(|p| p.id.clone())
                .collect(),
        }
    }

    /// Score and requirement progress for one framework instance
    pub fn framework_report(
        snapshot: &OrgSnapshot,
        instance: &FrameworkInstance,
        index: &HashMap<&str, &Control>,
        statuses: &StatusIndex<'_>,
        config: &EngineConfig,
    ) -> FrameworkReport {
        let controls = instance_controls(instance, index);
        let (policies, evidence) = linked_artifacts(&controls);
        let compliance = aggregate_framework_compliance(
            controls.iter().copied(),
            &snapshot.tasks,
            policies,
            evidence,
            config,
        );

        tracing::debug!(
            instance = %instance.id,
            score = %compliance.score,
            "scored framework instance"
        );

        FrameworkReport {
            instance_id: instance.id.clone(),
            framework_id: instance.framework_id.clone(),
            name: instance.name().to_string(),
            requirements: requirement_progress(instance, &snapshot.requirements, statuses),
            gaps: Self::gap_analysis(&controls, statuses),
            compliance,
        }
    }

    /// Controls not yet completed, least advanced first
    pub fn gap_analysis(controls: &[&Control], statuses: &StatusIndex<'_>) -> Vec<Gap> {
        let mut gaps: Vec<Gap> = controls
            .iter()
            .map(|c| Gap {
                control_id: c.id.clone(),
                control_name: c.name.clone(),
                status: statuses
                    .get(c.id.as_str())
                    .copied()
                    .unwrap_or(ControlStatus::NotStarted),
            })
            .filter(|g| g.status != ControlStatus::Completed)
            .collect();
        gaps.sort_by(|a, b| a.status.cmp(&b.status).then_with(|| a.control_id.cmp(&b.control_id)));
        gaps
    }
}

/// Per framework instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkReport {
    pub instance_id: String,
    pub framework_id: String,
    pub name: String,
    pub compliance: FrameworkCompliance,
    pub requirements: RequirementProgress,
    pub gaps: Vec<Gap>,
}

impl FrameworkReport {
    pub fn score(&self) -> Percentage {
        self.compliance.score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub control_id: String,
    pub control_name: String,
    pub status: ControlStatus,
}

/// Organization report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgReport {
    pub organization_id: String,
    pub generated_at: DateTime<Utc>,
    /// Fingerprint of the snapshot this report was computed from
    pub snapshot_digest: String,
    pub overall: OrgCompliance,
    pub frameworks: Vec<FrameworkReport>,
    pub evidence: EvidenceStatusCounts,
    pub evidence_by_department: Vec<EvidenceGroup>,
    pub evidence_by_assignee: AssigneeGrouping,
    pub evidence_by_framework: Vec<EvidenceGroup>,
    pub controls_by_framework: Vec<ControlGroup>,
    pub policies_needing_review: Vec<String>,
}
