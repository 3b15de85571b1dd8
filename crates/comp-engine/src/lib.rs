//! OpenComp Compliance Aggregation Engine
//!
//! Rolls artifact-level state (policies, evidence, tasks) up through
//! controls, requirements and frameworks into status labels and integer
//! compliance percentages.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   COMPLIANCE AGGREGATION ENGINE                         │
//! │                                                                         │
//! │  OrgSnapshot (hydrated by the persistence layer)                        │
//! │       │                                                                 │
//! │  ┌────▼─────────┐  ┌──────────────┐  ┌──────────────┐                   │
//! │  │   Status     │  │   Control    │  │   Evidence   │                   │
//! │  │ Classifiers  │─▶│   Status     │  │  Freshness   │                   │
//! │  │ (artifacts)  │  │  Resolver    │  │  Resolver    │                   │
//! │  └──────────────┘  └──────┬───────┘  └──────┬───────┘                   │
//! │                           │                 │                           │
//! │  ┌────────────────────────▼──────┐  ┌───────▼────────┐                  │
//! │  │  Framework / Org Aggregators  │  │ Grouping Views │                  │
//! │  │  weighted controls, policies, │  │ department,    │                  │
//! │  │  evidence, external tests     │  │ assignee, fw   │                  │
//! │  └───────────────┬───────────────┘  └───────┬────────┘                  │
//! │                  └──────────┬───────────────┘                           │
//! │                        ┌────▼─────┐                                     │
//! │                        │ OrgReport│                                     │
//! │                        └──────────┘                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function is a synchronous, pure transform over its inputs. The
//! current time is always passed in, never read implicitly, except through
//! [`SystemClock`] at the [`ComplianceEngine::report`] boundary.

#![warn(missing_docs)]

pub mod aggregate;
pub mod artifacts;
pub mod checks;
pub mod classify;
pub mod config;
pub mod control_status;
pub mod evidence;
pub mod frameworks;
pub mod grouping;
pub mod overall;
pub mod reporting;
pub mod snapshot;
pub mod tasks;

use comp_common::CompResult;

pub use aggregate::{aggregate_framework_compliance, FrameworkCompliance, IN_PROGRESS_WEIGHT};
pub use artifacts::{Artifact, ArtifactKind, Policy, PolicyStatus};
pub use checks::{ExternalTestResult, TestOutcome};
pub use classify::{is_artifact_completed, is_task_done};
pub use comp_common::{CompError, Percentage};
pub use config::EngineConfig;
pub use control_status::{resolve_control, resolve_control_status, ControlStatus, ManualStatus};
pub use evidence::{resolve_evidence_status, Clock, Evidence, EvidenceStatus, FixedClock, Frequency, SystemClock};
pub use frameworks::{Control, Framework, FrameworkInstance, Requirement, RequirementMap};
pub use overall::{aggregate_overall_compliance, OrgCompliance};
pub use reporting::{OrgReport, ReportGenerator};
pub use snapshot::OrgSnapshot;
pub use tasks::{tasks_for_entity, EntityType, Task, TaskStatus};

/// Main Compliance Engine
///
/// Holds validated configuration only; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    config: EngineConfig,
}

impl ComplianceEngine {
    /// Create engine with validated configuration
    pub fn new(config: EngineConfig) -> CompResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve one control against the org-wide task list
    pub fn control_status(&self, control: &Control, tasks: &[Task]) -> ControlStatus {
        resolve_control(control, tasks, self.config.honor_manual_override)
    }

    /// Score one framework from its controls, policies and evidence
    pub fn framework_compliance<'c, 'p, 'e>(
        &self,
        controls: impl IntoIterator<Item = &'c Control>,
        tasks: &[Task],
        policies: impl IntoIterator<Item = &'p Policy>,
        evidence: impl IntoIterator<Item = &'e Evidence>,
    ) -> FrameworkCompliance {
        aggregate_framework_compliance(controls, tasks, policies, evidence, &self.config)
    }

    /// Organization report as of the clock's current time
    pub fn report(&self, snapshot: &OrgSnapshot, clock: &impl Clock) -> OrgReport {
        ReportGenerator::org_report(snapshot, clock.now(), &self.config)
    }

    /// Decode a JSON snapshot and report on it
    pub fn report_json(&self, json: &str, clock: &impl Clock) -> CompResult<OrgReport> {
        let snapshot = OrgSnapshot::from_json(json)?;
        Ok(self.report(&snapshot, clock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = EngineConfig {
            in_progress_weight: -0.1,
            ..EngineConfig::default()
        };
        assert!(matches!(ComplianceEngine::new(config), Err(CompError::Config(_))));
    }

    #[test]
    fn test_engine_respects_override_setting() {
        let mut control = Control::new("c1", "Backups");
        control.manual_status = Some(ManualStatus::Compliant);

        let honoring = ComplianceEngine::default();
        assert_eq!(honoring.control_status(&control, &[]), ControlStatus::Completed);

        let ignoring = ComplianceEngine::new(EngineConfig {
            honor_manual_override: false,
            ..EngineConfig::default()
        })
        .unwrap();
        assert_eq!(ignoring.control_status(&control, &[]), ControlStatus::NotStarted);
    }
}
