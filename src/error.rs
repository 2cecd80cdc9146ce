//! Typed failures of a classification call.

use thiserror::Error;

/// Errors raised before a classification result is ready.
/// Nothing partial is returned once one of these occurs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("invalid observation field {field}: {message}")]
    InvalidObservation {
        field: &'static str,
        message: String,
    },
    #[error("no classification: score vector was empty")]
    NoClassification,
}

impl ClassifyError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidObservation {
            field,
            message: message.into(),
        }
    }

    /// Short label used for metrics and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidObservation { .. } => "invalid_observation",
            Self::NoClassification => "no_classification",
        }
    }
}
