//! Engine Configuration

use comp_common::{CompError, CompResult};
use serde::{Deserialize, Serialize};

use crate::aggregate::IN_PROGRESS_WEIGHT;

/// Aggregation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Credit given to an in-progress control, relative to a completed one
    pub in_progress_weight: f64,
    /// Let a control's manual status replace the computed one
    pub honor_manual_override: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            in_progress_weight: IN_PROGRESS_WEIGHT,
            honor_manual_override: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> CompResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that could push a score outside `0..=100`
    pub fn validate(&self) -> CompResult<()> {
        let w = self.in_progress_weight;
        if !w.is_finite() || !(0.0..=1.0).contains(&w) {
            return Err(CompError::Config(format!(
                "in_progress_weight must be within 0.0..=1.0, got {w}"
            )));
        }
        Ok(())
    }
}
