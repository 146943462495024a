//! Error types for the recommendation pipeline
//!
//! Validation and classifier failures abort a single request. Economics
//! failures are caught by the pipeline and turned into a partial result.

use thiserror::Error;

/// Pipeline error kinds
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A feature value is non-finite or physically implausible
    #[error("Invalid input for '{field}' ({value}): {reason}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: String,
    },

    /// Classifier failed to load or returned a malformed probability vector
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Economics table missing or unreadable
    #[error("Economics data unavailable: {0}")]
    DataUnavailable(String),

    /// Classifier knows fewer classes than the ranking asked for
    #[error("Classifier reports {available} classes, {requested} requested")]
    ClassMismatch { requested: usize, available: usize },
}

impl AdvisorError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: impl Into<String>) -> Self {
        AdvisorError::InvalidInput {
            field,
            value,
            reason: reason.into(),
        }
    }

    /// Name of the offending field for `InvalidInput`
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AdvisorError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_field() {
        let err = AdvisorError::invalid("rainfall", -5.0, "must not be negative");
        assert_eq!(err.field(), Some("rainfall"));
        assert_eq!(
            err.to_string(),
            "Invalid input for 'rainfall' (-5): must not be negative"
        );
    }

    #[test]
    fn test_class_mismatch_message() {
        let err = AdvisorError::ClassMismatch { requested: 3, available: 2 };
        assert!(err.field().is_none());
        assert!(err.to_string().contains("2 classes, 3 requested"));
    }
}
