//! Evidence Records and Freshness
//!
//! Evidence moves through `empty -> draft -> upToDate -> needsReview`:
//! created without content, content attached, published, and finally
//! overdue once one review cycle has elapsed since the last publication.
//!
//! Review dates use calendar months. When the target month is shorter than
//! the source day, the date clamps to the last day of the target month, so
//! Jan 31 + 1 month is Feb 28 (Feb 29 in leap years).

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::artifacts::{Policy, PolicyStatus};

/// Evidence record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub last_published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub file_urls: Vec<String>,
    #[serde(default)]
    pub additional_urls: Vec<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub framework_ids: Vec<String>,
}

impl Evidence {
    /// Create empty, unpublished evidence
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            published: false,
            last_published_at: None,
            frequency: None,
            file_urls: Vec::new(),
            additional_urls: Vec::new(),
            department: None,
            assignee_id: None,
            framework_ids: Vec::new(),
        }
    }

    /// Whether any file or link has been attached
    pub fn has_content(&self) -> bool {
        !self.file_urls.is_empty() || !self.additional_urls.is_empty()
    }
}

/// Review cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Length of one review cycle in calendar months
    pub const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Yearly => 12,
        }
    }
}

/// Evidence freshness
///
/// Every evidence item is in exactly one of these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvidenceStatus {
    Empty,
    Draft,
    NeedsReview,
    UpToDate,
}

impl EvidenceStatus {
    /// All states, in display order
    pub const ALL: [EvidenceStatus; 4] = [
        Self::Empty,
        Self::Draft,
        Self::NeedsReview,
        Self::UpToDate,
    ];
}

/// Source of "now" for freshness checks
pub trait Clock {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Date one review cycle after `last_published_at`
///
/// `None` when either input is missing or the date falls outside the
/// representable range.
pub fn next_review_date(
    last_published_at: Option<DateTime<Utc>>,
    frequency: Option<Frequency>,
) -> Option<DateTime<Utc>> {
    let (published_at, frequency) = (last_published_at?, frequency?);
    published_at.checked_add_months(Months::new(frequency.months()))
}

/// Classify evidence freshness at `now`
pub fn resolve_evidence_status(evidence: &Evidence, now: DateTime<Utc>) -> EvidenceStatus {
    if !evidence.published {
        return if evidence.has_content() {
            EvidenceStatus::Draft
        } else {
            EvidenceStatus::Empty
        };
    }

    match next_review_date(evidence.last_published_at, evidence.frequency) {
        Some(due) if due < now => EvidenceStatus::NeedsReview,
        _ => EvidenceStatus::UpToDate,
    }
}

/// Whether a published policy is past its review date at `now`
pub fn policy_needs_review(policy: &Policy, now: DateTime<Utc>) -> bool {
    if policy.status == PolicyStatus::NeedsReview {
        return true;
    }
    if policy.status != PolicyStatus::Published {
        return false;
    }
    next_review_date(policy.last_published_at, policy.frequency).is_some_and(|due| due < now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn published(frequency: Frequency, at: DateTime<Utc>) -> Evidence {
        let mut e = Evidence::new("ev1", "Access review");
        e.published = true;
        e.frequency = Some(frequency);
        e.last_published_at = Some(at);
        e
    }

    #[test]
    fn test_empty_then_draft() {
        let mut e = Evidence::new("ev1", "Access review");
        assert_eq!(resolve_evidence_status(&e, now()), EvidenceStatus::Empty);

        e.file_urls.push("s3://bucket/report.pdf".into());
        assert_eq!(resolve_evidence_status(&e, now()), EvidenceStatus::Draft);
    }

    #[test]
    fn test_additional_url_counts_as_content() {
        let mut e = Evidence::new("ev1", "Access review");
        e.additional_urls.push("https://wiki.example.com/access".into());
        assert_eq!(resolve_evidence_status(&e, now()), EvidenceStatus::Draft);
    }

    #[test]
    fn test_monthly_overdue() {
        let e = published(Frequency::Monthly, now() - Duration::days(61));
        assert_eq!(resolve_evidence_status(&e, now()), EvidenceStatus::NeedsReview);
    }

    #[test]
    fn test_monthly_fresh() {
        let e = published(Frequency::Monthly, now() - Duration::days(10));
        assert_eq!(resolve_evidence_status(&e, now()), EvidenceStatus::UpToDate);
    }

    #[test]
    fn test_published_without_content_is_not_empty() {
        let mut e = Evidence::new("ev1", "Attestation");
        e.published = true;
        assert_eq!(resolve_evidence_status(&e, now()), EvidenceStatus::UpToDate);
    }

    #[test]
    fn test_missing_frequency_never_due() {
        let mut e = published(Frequency::Monthly, now() - Duration::days(3650));
        e.frequency = None;
        assert_eq!(resolve_evidence_status(&e, now()), EvidenceStatus::UpToDate);

        let mut e = published(Frequency::Monthly, now());
        e.last_published_at = None;
        assert_eq!(resolve_evidence_status(&e, now()), EvidenceStatus::UpToDate);
    }

    #[test]
    fn test_due_exactly_now_is_up_to_date() {
        let e = published(Frequency::Quarterly, now() - Months::new(3));
        assert_eq!(next_review_date(e.last_published_at, e.frequency), Some(now()));
        assert_eq!(resolve_evidence_status(&e, now()), EvidenceStatus::UpToDate);
    }

    #[test]
    fn test_month_end_clamps() {
        let jan31 = Utc.with_ymd_and_hms(2023, 1, 31, 9, 30, 0).unwrap();
        assert_eq!(
            next_review_date(Some(jan31), Some(Frequency::Monthly)),
            Some(Utc.with_ymd_and_hms(2023, 2, 28, 9, 30, 0).unwrap())
        );

        let leap_jan31 = Utc.with_ymd_and_hms(2024, 1, 31, 9, 30, 0).unwrap();
        assert_eq!(
            next_review_date(Some(leap_jan31), Some(Frequency::Monthly)),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 9, 30, 0).unwrap())
        );

        let nov30 = Utc.with_ymd_and_hms(2023, 11, 30, 0, 0, 0).unwrap();
        assert_eq!(
            next_review_date(Some(nov30), Some(Frequency::Quarterly)),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap())
        );

        let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(
            next_review_date(Some(leap_day), Some(Frequency::Yearly)),
            Some(Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_month_end_clamp_decides_status() {
        // Due Feb 28, checked on Mar 1
        let jan31 = Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap();
        let mar1 = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
        let e = published(Frequency::Monthly, jan31);
        assert_eq!(resolve_evidence_status(&e, mar1), EvidenceStatus::NeedsReview);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(
            serde_json::to_string(&EvidenceStatus::NeedsReview).unwrap(),
            "\"needsReview\""
        );
        assert_eq!(
            serde_json::to_string(&EvidenceStatus::UpToDate).unwrap(),
            "\"upToDate\""
        );
    }

    #[test]
    fn test_policy_needs_review() {
        let mut policy = Policy::new("p1", "Access Control Policy", PolicyStatus::Published);
        policy.frequency = Some(Frequency::Yearly);
        policy.last_published_at = Some(now() - Duration::days(400));
        assert!(policy_needs_review(&policy, now()));

        policy.last_published_at = Some(now() - Duration::days(30));
        assert!(!policy_needs_review(&policy, now()));

        policy.status = PolicyStatus::Draft;
        policy.last_published_at = Some(now() - Duration::days(400));
        assert!(!policy_needs_review(&policy, now()));

        policy.status = PolicyStatus::NeedsReview;
        assert!(policy_needs_review(&policy, now()));
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(now()).now(), now());
    }
}
