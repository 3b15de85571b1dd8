//! Framework Compliance Aggregation
//!
//! A framework score is the rounded mean of up to three dimension scores:
//! weighted control completion, published policies and published evidence.
//! A dimension with no items is left out of the mean instead of counting
//! as zero.

use comp_common::Percentage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::artifacts::Policy;
use crate::classify::{is_evidence_published, is_policy_published};
use crate::config::EngineConfig;
use crate::control_status::{resolve_control, ControlStatus, ControlStatusCounts};
use crate::evidence::Evidence;
use crate::frameworks::{Control, FrameworkInstance, Requirement};
use crate::tasks::Task;

/// Partial credit for an in-progress control
pub const IN_PROGRESS_WEIGHT: f64 = 0.5;

/// Resolved status per control id
pub type StatusIndex<'a> = HashMap<&'a str, ControlStatus>;

/// Items in one dimension and how many of them are compliant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionCount {
    pub total: usize,
    pub compliant: usize,
}

impl DimensionCount {
    /// Count items, and those matching `is_compliant`
    pub fn tally<'a, T: 'a>(
        items: impl IntoIterator<Item = &'a T>,
        is_compliant: impl Fn(&T) -> bool,
    ) -> Self {
        items.into_iter().fold(Self::default(), |mut acc, item| {
            acc.total += 1;
            if is_compliant(item) {
                acc.compliant += 1;
            }
            acc
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Percentage compliant, `None` for an empty dimension
    pub fn score(&self) -> Option<Percentage> {
        (!self.is_empty()).then(|| Percentage::from_ratio(self.compliant, self.total))
    }

    /// Percentage compliant, zero for an empty dimension
    pub fn score_or_zero(&self) -> Percentage {
        self.score().unwrap_or(Percentage::ZERO)
    }
}

/// Framework score with its inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkCompliance {
    pub controls: ControlStatusCounts,
    pub policies: DimensionCount,
    pub evidence: DimensionCount,
    pub controls_score: Option<Percentage>,
    pub policies_score: Option<Percentage>,
    pub evidence_score: Option<Percentage>,
    /// Mean of the present dimension scores
    pub score: Percentage,
}

/// Resolve every control once
pub fn resolve_all<'c>(
    controls: impl IntoIterator<Item = &'c Control>,
    tasks: &[Task],
    config: &EngineConfig,
) -> StatusIndex<'c> {
    controls
        .into_iter()
        .map(|c| (c.id.as_str(), resolve_control(c, tasks, config.honor_manual_override)))
        .collect()
}

/// Weighted completion over a status tally, `None` without controls
///
/// `round((completed + in_progress * weight) / total * 100)`
pub fn controls_compliance(counts: &ControlStatusCounts, in_progress_weight: f64) -> Option<Percentage> {
    let total = counts.total();
    if total == 0 {
        return None;
    }
    let credit = counts.completed as f64 + counts.in_progress as f64 * in_progress_weight;
    Some(Percentage::from_f64((credit / total as f64) * 100.0))
}

/// Score one framework from its controls, policies and evidence
pub fn aggregate_framework_compliance<'c, 'p, 'e>(
    controls: impl IntoIterator<Item = &'c Control>,
    tasks: &[Task],
    policies: impl IntoIterator<Item = &'p Policy>,
    evidence: impl IntoIterator<Item = &'e Evidence>,
    config: &EngineConfig,
) -> FrameworkCompliance {
    let controls: ControlStatusCounts = controls
        .into_iter()
        .map(|c| resolve_control(c, tasks, config.honor_manual_override))
        .collect();
    let policies = DimensionCount::tally(policies, is_policy_published);
    let evidence = DimensionCount::tally(evidence, is_evidence_published);

    let controls_score = controls_compliance(&controls, config.in_progress_weight);
    let policies_score = policies.score();
    let evidence_score = evidence.score();

    let present: Vec<Percentage> = [controls_score, policies_score, evidence_score]
        .into_iter()
        .flatten()
        .collect();
    let score = Percentage::mean(&present);

    tracing::debug!(
        controls = controls.total(),
        policies = policies.total,
        evidence = evidence.total,
        dimensions = present.len(),
        %score,
        "aggregated framework compliance"
    );

    FrameworkCompliance {
        controls,
        policies,
        evidence,
        controls_score,
        policies_score,
        evidence_score,
        score,
    }
}

/// Roll control statuses up into one requirement status
///
/// No controls, or none started, is `not_started`; all completed is
/// `completed`; anything else is `in_progress`.
pub fn rollup_requirement_status(statuses: impl IntoIterator<Item = ControlStatus>) -> ControlStatus {
    let counts: ControlStatusCounts = statuses.into_iter().collect();
    let total = counts.total();
    if total > 0 && counts.completed == total {
        ControlStatus::Completed
    } else if counts.not_started == total {
        ControlStatus::NotStarted
    } else {
        ControlStatus::InProgress
    }
}

/// Status of one requirement within a framework instance
///
/// A mapped control missing from `statuses` counts as not started.
pub fn requirement_status(
    instance: &FrameworkInstance,
    requirement_id: &str,
    statuses: &StatusIndex<'_>,
) -> ControlStatus {
    rollup_requirement_status(instance.maps_for_requirement(requirement_id).map(|m| {
        statuses
            .get(m.control_id.as_str())
            .copied()
            .unwrap_or(ControlStatus::NotStarted)
    }))
}

/// Requirement completion for a framework instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementProgress {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub percentage: Percentage,
}

/// Tally requirement statuses for the catalog entries of the instance's framework
pub fn requirement_progress(
    instance: &FrameworkInstance,
    requirements: &[Requirement],
    statuses: &StatusIndex<'_>,
) -> RequirementProgress {
    let counts: ControlStatusCounts = requirements
        .iter()
        .filter(|r| r.framework_id == instance.framework_id)
        .map(|r| requirement_status(instance, &r.composite_id(), statuses))
        .collect();

    RequirementProgress {
        total: counts.total(),
        completed: counts.completed,
        in_progress: counts.in_progress,
        not_started: counts.not_started,
        percentage: Percentage::from_ratio(counts.completed, counts.total()),
    }
}
