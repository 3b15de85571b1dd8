//! Organization-wide Compliance
//!
//! The overall figure is a mean of per-dimension percentages, each already
//! rounded, not a mean over individual items. The two differ; the mean of
//! rounded means is the intended figure.

use comp_common::Percentage;
use serde::{Deserialize, Serialize};

use crate::aggregate::DimensionCount;
use crate::artifacts::Policy;
use crate::checks::ExternalTestResult;
use crate::classify::{is_evidence_published, is_policy_published, is_test_passing};
use crate::evidence::Evidence;

/// Combine the three dimension scores
///
/// `active_category_count` is how many of policies, evidence and tests have
/// at least one item. Empty dimensions are expected to score zero.
pub fn aggregate_overall_compliance(
    policies_compliance: Percentage,
    evidence_compliance: Percentage,
    tests_compliance: Percentage,
    active_category_count: usize,
) -> Percentage {
    if active_category_count == 0 {
        return Percentage::ZERO;
    }
    let sum = u32::from(policies_compliance.value())
        + u32::from(evidence_compliance.value())
        + u32::from(tests_compliance.value());
    Percentage::from_f64(f64::from(sum) / active_category_count as f64)
}

/// Org compliance by dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgCompliance {
    pub policies: DimensionCount,
    pub evidence: DimensionCount,
    pub tests: DimensionCount,
    pub policies_compliance: Percentage,
    pub evidence_compliance: Percentage,
    pub tests_compliance: Percentage,
    pub active_categories: usize,
    pub overall: Percentage,
}

impl OrgCompliance {
    /// Score every dimension from its items and combine them
    pub fn compute<'p, 'e, 't>(
        policies: impl IntoIterator<Item = &'p Policy>,
        evidence: impl IntoIterator<Item = &'e Evidence>,
        tests: impl IntoIterator<Item = &'t ExternalTestResult>,
    ) -> Self {
        let policies = DimensionCount::tally(policies, is_policy_published);
        let evidence = DimensionCount::tally(evidence, is_evidence_published);
        let tests = DimensionCount::tally(tests, is_test_passing);

        let active_categories = [policies, evidence, tests]
            .iter()
            .filter(|d| !d.is_empty())
            .count();

        let policies_compliance = policies.score_or_zero();
        let evidence_compliance = evidence.score_or_zero();
        let tests_compliance = tests.score_or_zero();

        Self {
            policies,
            evidence,
            tests,
            policies_compliance,
            evidence_compliance,
            tests_compliance,
            active_categories,
            overall: aggregate_overall_compliance(
                policies_compliance,
                evidence_compliance,
                tests_compliance,
                active_categories,
            ),
        }
    }
}
