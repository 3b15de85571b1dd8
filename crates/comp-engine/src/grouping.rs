//! Dashboard Groupings
//!
//! Evidence is tagged with its freshness, bucketed by department, assignee
//! or framework, and tallied per status. Groups come back largest first,
//! ties ordered by key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::aggregate::StatusIndex;
use crate::control_status::{ControlStatus, ControlStatusCounts};
use crate::evidence::{resolve_evidence_status, Evidence, EvidenceStatus};
use crate::frameworks::FrameworkInstance;

/// Bucket for evidence without a department, or without a framework link
pub const NO_DEPARTMENT: &str = "none";

/// Bucket for evidence without an assignee
pub const UNASSIGNED: &str = "unassigned";

/// Tally of evidence statuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceStatusCounts {
    pub empty: usize,
    pub draft: usize,
    pub needs_review: usize,
    pub up_to_date: usize,
}

impl EvidenceStatusCounts {
    pub fn record(&mut self, status: EvidenceStatus) {
        match status {
            EvidenceStatus::Empty => self.empty += 1,
            EvidenceStatus::Draft => self.draft += 1,
            EvidenceStatus::NeedsReview => self.needs_review += 1,
            EvidenceStatus::UpToDate => self.up_to_date += 1,
        }
    }

    pub fn get(&self, status: EvidenceStatus) -> usize {
        match status {
            EvidenceStatus::Empty => self.empty,
            EvidenceStatus::Draft => self.draft,
            EvidenceStatus::NeedsReview => self.needs_review,
            EvidenceStatus::UpToDate => self.up_to_date,
        }
    }

    pub fn total(&self) -> usize {
        self.empty + self.draft + self.needs_review + self.up_to_date
    }
}

/// One bucket of evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceGroup {
    pub key: String,
    pub counts: EvidenceStatusCounts,
}

impl EvidenceGroup {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            counts: EvidenceStatusCounts::default(),
        }
    }
}

/// Evidence by assignee, with the unassigned bucket kept apart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeGrouping {
    pub assignees: Vec<EvidenceGroup>,
    pub unassigned: EvidenceGroup,
}

/// Status tally over all evidence
pub fn evidence_status_counts<'e>(
    items: impl IntoIterator<Item = &'e Evidence>,
    now: DateTime<Utc>,
) -> EvidenceStatusCounts {
    let mut counts = EvidenceStatusCounts::default();
    for e in items {
        counts.record(resolve_evidence_status(e, now));
    }
    counts
}

fn group_with<'e>(
    items: impl IntoIterator<Item = &'e Evidence>,
    now: DateTime<Utc>,
    keys: impl Fn(&'e Evidence) -> Vec<&'e str>,
) -> Vec<EvidenceGroup> {
    let mut buckets: BTreeMap<&str, EvidenceStatusCounts> = BTreeMap::new();
    for e in items {
        let status = resolve_evidence_status(e, now);
        let mut item_keys = keys(e);
        item_keys.sort_unstable();
        item_keys.dedup();
        for key in item_keys {
            buckets.entry(key).or_default().record(status);
        }
    }

    let mut groups: Vec<EvidenceGroup> = buckets
        .into_iter()
        .map(|(key, counts)| EvidenceGroup {
            key: key.to_string(),
            counts,
        })
        .collect();
    // Stable, so equal totals keep ascending key order
    groups.sort_by_key(|g| Reverse(g.counts.total()));
    groups
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Evidence per department, missing departments under `"none"`
pub fn group_evidence_by_department<'e>(
    items: impl IntoIterator<Item = &'e Evidence>,
    now: DateTime<Utc>,
) -> Vec<EvidenceGroup> {
    group_with(items, now, |e| {
        vec![non_empty(&e.department).unwrap_or(NO_DEPARTMENT)]
    })
}

/// Evidence per linked framework
///
/// An item linked to several frameworks counts once in each; unlinked
/// items go under `"none"`.
pub fn group_evidence_by_framework<'e>(
    items: impl IntoIterator<Item = &'e Evidence>,
    now: DateTime<Utc>,
) -> Vec<EvidenceGroup> {
    group_with(items, now, |e| {
        if e.framework_ids.is_empty() {
            vec![NO_DEPARTMENT]
        } else {
            e.framework_ids.iter().map(String::as_str).collect()
        }
    })
}

/// Evidence per assignee
pub fn group_evidence_by_assignee<'e>(
    items: impl IntoIterator<Item = &'e Evidence>,
    now: DateTime<Utc>,
) -> AssigneeGrouping {
    let mut unassigned = EvidenceGroup::new(UNASSIGNED);
    let mut assigned = Vec::new();
    for e in items {
        if non_empty(&e.assignee_id).is_some() {
            assigned.push(e);
        } else {
            unassigned.counts.record(resolve_evidence_status(e, now));
        }
    }

    AssigneeGrouping {
        assignees: group_with(assigned, now, |e| {
            e.assignee_id.as_deref().into_iter().collect()
        }),
        unassigned,
    }
}

/// Control statuses for one framework instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlGroup {
    pub instance_id: String,
    pub framework_id: String,
    pub name: String,
    pub counts: ControlStatusCounts,
}

/// Control status tally per framework instance
///
/// A mapped control missing from `statuses` counts as not started.
pub fn group_controls_by_framework(
    instances: &[FrameworkInstance],
    statuses: &StatusIndex<'_>,
) -> Vec<ControlGroup> {
    let mut groups: Vec<ControlGroup> = instances
        .iter()
        .map(|instance| ControlGroup {
            instance_id: instance.id.clone(),
            framework_id: instance.framework_id.clone(),
            name: instance.name().to_string(),
            counts: instance
                .control_ids()
                .into_iter()
                .map(|id| statuses.get(id).copied().unwrap_or(ControlStatus::NotStarted))
                .collect(),
        })
        .collect();
    groups.sort_by(|a, b| {
        b.counts
            .total()
            .cmp(&a.counts.total())
            .then_with(|| a.instance_id.cmp(&b.instance_id))
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn item(id: &str, department: Option<&str>, assignee: Option<&str>, status: EvidenceStatus) -> Evidence {
        let mut e = Evidence::new(id, id);
        e.department = department.map(str::to_string);
        e.assignee_id = assignee.map(str::to_string);
        match status {
            EvidenceStatus::Empty => {}
            EvidenceStatus::Draft => e.file_urls.push("f".into()),
            EvidenceStatus::NeedsReview | EvidenceStatus::UpToDate => {
                e.published = true;
                e.frequency = Some(crate::evidence::Frequency::Monthly);
                let age = if status == EvidenceStatus::NeedsReview { 90 } else { 5 };
                e.last_published_at = Some(now() - Duration::days(age));
            }
        }
        e
    }

    #[test]
    fn test_group_by_department() {
        let items = vec![
            item("e1", Some("it"), None, EvidenceStatus::Draft),
            item("e2", Some("hr"), None, EvidenceStatus::UpToDate),
            item("e3", Some("it"), None, EvidenceStatus::NeedsReview),
            item("e4", None, None, EvidenceStatus::Empty),
            item("e5", Some(""), None, EvidenceStatus::Empty),
        ];
        let groups = group_evidence_by_department(&items, now());
        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        // it:2, none:2, hr:1 -> ties ordered by key
        assert_eq!(keys, vec!["it", "none", "hr"]);
        assert_eq!(groups[0].counts.draft, 1);
        assert_eq!(groups[0].counts.needs_review, 1);
        assert_eq!(groups[1].counts.empty, 2);
    }

    #[test]
    fn test_unassigned_is_sibling() {
        let items = vec![
            item("e1", Some("it"), Some("u1"), EvidenceStatus::Draft),
            item("e2", Some("it"), None, EvidenceStatus::Empty),
            item("e3", None, Some("u2"), EvidenceStatus::UpToDate),
            item("e4", None, Some("u2"), EvidenceStatus::UpToDate),
        ];
        let grouping = group_evidence_by_assignee(&items, now());
        let keys: Vec<_> = grouping.assignees.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["u2", "u1"]);
        assert_eq!(grouping.unassigned.key, UNASSIGNED);
        assert_eq!(grouping.unassigned.counts.empty, 1);
        assert_eq!(grouping.unassigned.counts.total(), 1);
    }

    #[test]
    fn test_group_by_framework() {
        let mut a = item("e1", None, None, EvidenceStatus::Draft);
        a.framework_ids = vec!["soc2".into(), "iso27001".into(), "soc2".into()];
        let mut b = item("e2", None, None, EvidenceStatus::UpToDate);
        b.framework_ids = vec!["soc2".into()];
        let c = item("e3", None, None, EvidenceStatus::Empty);

        let groups = group_evidence_by_framework(&[a, b, c], now());
        let keys: Vec<_> = groups.iter().map(|g| (g.key.as_str(), g.counts.total())).collect();
        assert_eq!(keys, vec![("soc2", 2), ("iso27001", 1), ("none", 1)]);
    }

    #[test]
    fn test_counts_cover_every_item() {
        let items: Vec<_> = EvidenceStatus::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| item(&format!("e{i}"), None, None, *s))
            .collect();
        let counts = evidence_status_counts(&items, now());
        for status in EvidenceStatus::ALL {
            assert_eq!(counts.get(status), 1);
        }
        assert_eq!(counts.total(), items.len());
    }

    #[test]
    fn test_group_controls_by_framework() {
        use crate::frameworks::RequirementMap;

        let map = |c: &str, fi: &str| RequirementMap {
            control_id: c.into(),
            framework_instance_id: fi.into(),
            requirement_id: "r".into(),
        };
        let instances = vec![
            FrameworkInstance {
                id: "fi-b".into(),
                framework_id: "iso27001".into(),
                framework: None,
                requirement_maps: vec![map("c1", "fi-b")],
            },
            FrameworkInstance {
                id: "fi-a".into(),
                framework_id: "soc2".into(),
                framework: None,
                requirement_maps: vec![map("c1", "fi-a"), map("c2", "fi-a"), map("c3", "fi-a")],
            },
        ];
        let statuses: StatusIndex<'_> = [
            ("c1", ControlStatus::Completed),
            ("c2", ControlStatus::InProgress),
        ]
        .into_iter()
        .collect();

        let groups = group_controls_by_framework(&instances, &statuses);
        assert_eq!(groups[0].instance_id, "fi-a");
        assert_eq!(groups[0].counts.completed, 1);
        assert_eq!(groups[0].counts.in_progress, 1);
        assert_eq!(groups[0].counts.not_started, 1);
        assert_eq!(groups[1].counts.total(), 1);
    }
}
