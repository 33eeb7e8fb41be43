//! Error types for driftbench-core.
//!
//! All errors are raised synchronously while a stream is being constructed or
//! a configuration is being validated. Scoring never fails: undefined ratios
//! are reported as `f64::NAN` instead.

use thiserror::Error;

/// Errors that can occur while building a drift stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriftError {
    /// Invalid parameter (number of concepts, drift length, tolerance, beta)
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    /// A concept or transition has no samples to draw from
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    /// Feature/label length mismatch or region shape mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected size description
        expected: String,
        /// Actual size found
        actual: String,
    },
}

impl DriftError {
    /// Shorthand for a [`DriftError::Configuration`] error.
    pub fn config(msg: impl Into<String>) -> Self {
        DriftError::Configuration(msg.into())
    }

    /// Shorthand for a [`DriftError::InsufficientData`] error.
    pub fn insufficient(msg: impl Into<String>) -> Self {
        DriftError::InsufficientData(msg.into())
    }

    /// Shorthand for a [`DriftError::DimensionMismatch`] error.
    pub fn dimension(expected: impl ToString, actual: impl ToString) -> Self {
        DriftError::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DriftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DriftError::config("drift_length must be > 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: drift_length must be > 0"
        );

        let err = DriftError::dimension("100 labels", 99);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 100 labels, got 99"
        );
    }

    #[test]
    fn test_insufficient_data_variant() {
        let err = DriftError::insufficient("concept 3 is empty");
        assert!(matches!(err, DriftError::InsufficientData(_)));
        assert!(err.to_string().contains("concept 3"));
    }
}
