//! Automated Check Results
//!
//! Results reported by external test integrations (cloud configuration
//! scans and the like). They form the third compliance dimension next to
//! policies and evidence.

use serde::{Deserialize, Serialize};

/// One external test result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTestResult {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub status: TestOutcome,
}

impl ExternalTestResult {
    pub fn new(id: &str, status: TestOutcome) -> Self {
        Self {
            id: id.to_string(),
            title: String::new(),
            status,
        }
    }
}

/// Check outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    Failed,
    Pending,
}
