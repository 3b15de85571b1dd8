//! Value Objects - Immutable domain primitives with validation
//!
//! Value Objects are:
//! - Immutable
//! - Comparable by value (not identity)
//! - Self-validating
//! - Side-effect free

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compliance score (Value Object)
///
/// # Invariants
/// - Integer in `0..=100`
/// - Derived values are rounded half away from zero, never truncated
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent
    pub const ZERO: Self = Self(0);

    /// One hundred percent
    pub const FULL: Self = Self(100);

    /// Create percentage with validation
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if value > 100 {
            return Err(DomainError::InvalidPercentage(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Round a raw percentage, clamping to the valid range
    ///
    /// `NaN` maps to zero.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        // f64::round is half away from zero
        Self(value.clamp(0.0, 100.0).round() as u8)
    }

    /// `round(numerator / denominator * 100)`, or zero for an empty denominator
    pub fn from_ratio(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }
        Self::from_f64((numerator as f64 / denominator as f64) * 100.0)
    }

    /// Rounded mean of already-rounded scores, zero for an empty slice
    pub fn mean(scores: &[Percentage]) -> Self {
        if scores.is_empty() {
            return Self::ZERO;
        }
        let sum: u32 = scores.iter().map(|s| u32::from(s.0)).sum();
        Self::from_f64(f64::from(sum) / scores.len() as f64)
    }

    /// Get value
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Check if meets threshold
    pub fn meets_threshold(&self, threshold: u8) -> bool {
        self.0 >= threshold
    }
}

impl TryFrom<u8> for Percentage {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Domain errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Percentage outside `0..=100`
    #[error("invalid percentage: {0}")]
    InvalidPercentage(String),
}
