//! Error types for OpenComp

use thiserror::Error;

use crate::domain::DomainError;

/// OpenComp error type
///
/// Only the ambient surfaces (configuration, snapshot decoding) produce
/// these. Status resolution and score aggregation are total functions.
#[derive(Error, Debug)]
pub enum CompError {
    /// Configuration rejected by validation
    #[error("config error: {0}")]
    Config(String),

    /// Snapshot could not be interpreted
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// JSON decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Value object rejected its input
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type for OpenComp
pub type CompResult<T> = Result<T, CompError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts() {
        let err: CompError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_domain_error_is_transparent() {
        let err: CompError = DomainError::InvalidPercentage("101".into()).into();
        assert_eq!(err.to_string(), "invalid percentage: 101");
    }
}
