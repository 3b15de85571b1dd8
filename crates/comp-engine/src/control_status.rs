//! Control Status Resolution
//!
//! A control is classified, not scored: one published artifact out of three
//! makes it `in_progress`, not "33% done". Percentages are computed one level
//! up by the framework aggregator.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

use crate::artifacts::Artifact;
use crate::classify::{is_artifact_completed, is_artifact_untouched, is_task_done};
use crate::frameworks::Control;
use crate::tasks::{tasks_for_entity, EntityType, Task, TaskStatus};

/// Derived control status, ordered by rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    NotStarted,
    InProgress,
    #[serde(alias = "compliant")]
    Completed,
}

/// Status set by hand on a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualStatus {
    NotStarted,
    InProgress,
    Compliant,
}

impl From<ManualStatus> for ControlStatus {
    fn from(status: ManualStatus) -> Self {
        match status {
            ManualStatus::NotStarted => Self::NotStarted,
            ManualStatus::InProgress => Self::InProgress,
            ManualStatus::Compliant => Self::Completed,
        }
    }
}

/// Combine a control's artifacts and linked tasks into one status
///
/// An empty artifact list can never be `completed`; with no tasks either
/// the control is `not_started`.
pub fn resolve_control_status<T: Borrow<Task>>(artifacts: &[Artifact], tasks: &[T]) -> ControlStatus {
    let all_artifacts_untouched = artifacts.iter().all(is_artifact_untouched);
    let tasks: Vec<&Task> = tasks.iter().map(Borrow::<Task>::borrow).collect();
    let all_tasks_todo = tasks.iter().all(|t| t.status == TaskStatus::Todo);
    let all_artifacts_published =
        !artifacts.is_empty() && artifacts.iter().all(is_artifact_completed);
    let all_tasks_done = !tasks.is_empty() && tasks.iter().all(|t| is_task_done(t));

    if all_artifacts_published && (tasks.is_empty() || all_tasks_done) {
        ControlStatus::Completed
    } else if all_artifacts_untouched && all_tasks_todo {
        ControlStatus::NotStarted
    } else {
        ControlStatus::InProgress
    }
}

/// Resolve a control against the org-wide task list
///
/// With `honor_manual_override` set, a manual status wins over the computed one.
pub fn resolve_control(control: &Control, tasks: &[Task], honor_manual_override: bool) -> ControlStatus {
    if honor_manual_override {
        if let Some(manual) = control.manual_status {
            return manual.into();
        }
    }
    let linked = tasks_for_entity(tasks, &control.id, &EntityType::Control);
    resolve_control_status(&control.artifacts, &linked)
}

/// Tally of control statuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlStatusCounts {
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl ControlStatusCounts {
    pub fn record(&mut self, status: ControlStatus) {
        match status {
            ControlStatus::NotStarted => self.not_started += 1,
            ControlStatus::InProgress => self.in_progress += 1,
            ControlStatus::Completed => self.completed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.not_started + self.in_progress + self.completed
    }
}

impl FromIterator<ControlStatus> for ControlStatusCounts {
    fn from_iter<I: IntoIterator<Item = ControlStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}
