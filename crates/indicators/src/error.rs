//! Indicator error types.

use thiserror::Error;

/// Errors that can occur during indicator computation.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// Invalid parameters for the indicator
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Insufficient data for computation
    #[error("insufficient data: need {required} days, got {actual}")]
    InsufficientData {
        /// Required number of days.
        required: usize,
        /// Actual number of days provided.
        actual: usize,
    },
}

impl IndicatorError {
    /// Creates an `InvalidParams` error with a message.
    #[must_use]
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        IndicatorError::InvalidParams(msg.into())
    }

    /// Returns true if the error only signals a short warm-up window.
    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, IndicatorError::InsufficientData { .. })
    }
}
