//! JSON entry points for harnesses in other processes or languages.

use kairos_trade_mgmt::StateBook;
use kairos_types::{PriceHistory, StrategyParams};
use serde::{Deserialize, Serialize};

use crate::engine::{DayReport, Decision, decide};
use crate::error::EngineError;

/// One stateless decision request.
#[derive(Debug, Clone, Deserialize)]
pub struct DayRequest {
    /// Strategy parameters; missing fields take their defaults
    #[serde(default)]
    pub params: Option<serde_json::Value>,
    /// Closing prices, one row per instrument
    pub prices: Vec<Vec<f64>>,
    /// State returned by the previous call; all flat when absent
    #[serde(default)]
    pub state: Option<StateBook>,
}

/// Response to a [`DayRequest`].
#[derive(Debug, Clone, Serialize)]
pub struct DayResponse<'a> {
    /// Signed target share count per instrument
    pub targets: &'a [i64],
    /// State to send with the next request
    pub state: &'a StateBook,
    /// Day report
    pub report: &'a DayReport,
}

/// Parses and validates strategy parameters.
///
/// # Errors
/// - [`EngineError::ConfigParse`] when JSON parsing fails.
/// - [`EngineError::ConfigValidation`] for invalid parameter values.
pub fn parse_params(params_json: &str) -> Result<StrategyParams, EngineError> {
    let params: StrategyParams =
        serde_json::from_str(params_json).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
    params
        .validate()
        .map_err(|e| EngineError::ConfigValidation(e.to_string()))?;
    Ok(params)
}

/// Main entry point: receives a request JSON, returns a response JSON.
///
/// # Errors
/// - [`EngineError::ConfigParse`] when the request or its parameters fail to parse.
/// - [`EngineError::ConfigValidation`] for invalid parameter values.
/// - [`EngineError::Data`] for ragged price rows.
/// - Any error from [`decide`].
pub fn run_day_from_json(request_json: &str) -> Result<String, EngineError> {
    let request: DayRequest =
        serde_json::from_str(request_json).map_err(|e| EngineError::ConfigParse(e.to_string()))?;

    let params = match request.params {
        Some(value) => {
            let params: StrategyParams = serde_json::from_value(value)
                .map_err(|e| EngineError::ConfigParse(e.to_string()))?;
            params
                .validate()
                .map_err(|e| EngineError::ConfigValidation(e.to_string()))?;
            params
        }
        None => StrategyParams::default(),
    };

    let history = PriceHistory::from_rows(request.prices)?;
    let prior = request
        .state
        .unwrap_or_else(|| StateBook::new(history.n_instruments()));

    let Decision {
        targets,
        state,
        report,
    } = decide(&params, &history, &prior)?;

    let response = DayResponse {
        targets: &targets,
        state: &state,
        report: &report,
    };
    serde_json::to_string(&response).map_err(|e| EngineError::ResultSerialize(e.to_string()))
}
