//! Scoring Error Types

use thiserror::Error;

/// Errors that reject an evaluation as a whole
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// Timestamp could not be parsed as RFC 3339
    #[error("Invalid timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    /// Value out of allowed range (also raised for NaN and infinities)
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Context classifier could not answer
    #[error("Traffic classifier failed: {0}")]
    Classifier(String),
}

/// Check that `value` lies within `[min, max]`.
pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ScoringError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ScoringError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
