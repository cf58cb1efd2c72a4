//! Engine error types.

use kairos_types::CoreError;
use thiserror::Error;

/// Errors that can occur while deciding a day's targets.
///
/// Insufficient history is not an error: it yields an all-zero decision.
#[derive(Debug, Error)]
pub enum EngineError {
    /// JSON config parse error
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// Report or response serialization error
    #[error("result serialization error: {0}")]
    ResultSerialize(String),

    /// History and state disagree on the instrument count
    #[error("instrument count mismatch: state has {expected}, history has {actual}")]
    InstrumentMismatch {
        /// Instruments in the state book
        expected: usize,
        /// Instruments in the price history
        actual: usize,
    },

    /// Price history error
    #[error("data error: {0}")]
    Data(#[from] CoreError),

    /// Indicator computation error
    #[error("indicator error: {0}")]
    Indicator(#[from] kairos_indicators::IndicatorError),

    /// Sizing or rebalancing error
    #[error("portfolio error: {0}")]
    Portfolio(#[from] kairos_portfolio::PortfolioError),

    /// Lifecycle state error
    #[error("trade management error: {0}")]
    TradeManagement(#[from] kairos_trade_mgmt::TradeManagementError),
}

impl EngineError {
    /// Returns true if this is a config parse/validation error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigParse(_) | EngineError::ConfigValidation(_)
        )
    }

    /// Returns the error category reported to the harness.
    /// Categories: `config`, `market_data`, `execution`, `runtime`
    #[must_use]
    pub fn error_category(&self) -> &'static str {
        match self {
            EngineError::ConfigParse(_)
            | EngineError::ConfigValidation(_)
            | EngineError::Data(CoreError::Config(_) | CoreError::Json(_)) => "config",

            EngineError::InstrumentMismatch { .. } | EngineError::Data(CoreError::Data(_)) => {
                "market_data"
            }

            EngineError::Portfolio(_) | EngineError::TradeManagement(_) => "execution",

            EngineError::Indicator(_) | EngineError::ResultSerialize(_) => "runtime",
        }
    }
}
