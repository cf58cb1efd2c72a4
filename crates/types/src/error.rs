use thiserror::Error;

/// Core error types for kairos
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data error
    #[error("Data error: {0}")]
    Data(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Config("top_n must be > 0".to_string());
        assert_eq!(err.to_string(), "Configuration error: top_n must be > 0");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Json(_)));
    }
}
