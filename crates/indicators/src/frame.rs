//! Per-day indicator snapshot for the whole universe.

use crate::error::IndicatorError;
use crate::impl_::{
    log_volatility::LogReturnVolatility, mean_reversion::MeanReversion, momentum::Momentum,
    sma::SMA,
};
use crate::traits::Indicator;
use kairos_types::{PriceHistory, RankingScore, StrategyParams};

/// Indicator values of one instrument as of the latest day.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InstrumentIndicators {
    /// Latest close
    pub price: f64,
    /// Short moving average
    pub short_ma: f64,
    /// Long moving average
    pub long_ma: f64,
    /// Confirmation moving average
    pub confirm_ma: f64,
    /// Momentum over the configured lookback
    pub momentum: f64,
    /// Floored log-return volatility
    pub volatility: f64,
    /// Deviation of price from the confirmation average
    pub mean_reversion: f64,
}

/// Indicators for every instrument, computed fresh from the full history.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    instruments: Vec<InstrumentIndicators>,
}

impl IndicatorFrame {
    /// Computes all indicators as of the latest day of `history`.
    ///
    /// # Errors
    /// Returns [`IndicatorError::InsufficientData`] when the history is
    /// shorter than [`StrategyParams::min_history`], and
    /// [`IndicatorError::InvalidParams`] for zero-length windows.
    pub fn compute(history: &PriceHistory, params: &StrategyParams) -> Result<Self, IndicatorError> {
        let required = params.min_history();
        if history.n_days() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                actual: history.n_days(),
            });
        }

        let short_ma = SMA::new(params.short_ma_window);
        let long_ma = SMA::new(params.long_ma_window);
        let confirm_ma = SMA::new(params.confirm_ma_window);
        let momentum = Momentum::new(params.momentum_lookback);
        let volatility = LogReturnVolatility::new(params.vol_lookback, params.vol_floor);
        let mean_reversion = MeanReversion::new(params.confirm_ma_window);

        let mut instruments = Vec::with_capacity(history.n_instruments());
        for idx in 0..history.n_instruments() {
            let closes = history.series(idx);
            let value = |indicator: &dyn Indicator| {
                indicator.latest(closes).ok_or_else(|| {
                    IndicatorError::invalid_params(format!(
                        "{} produced no value for instrument {idx}",
                        indicator.name()
                    ))
                })
            };

            instruments.push(InstrumentIndicators {
                price: closes[closes.len() - 1],
                short_ma: value(&short_ma)?,
                long_ma: value(&long_ma)?,
                confirm_ma: value(&confirm_ma)?,
                momentum: value(&momentum)?,
                volatility: value(&volatility)?,
                mean_reversion: value(&mean_reversion)?,
            });
        }

        Ok(Self { instruments })
    }

    /// Builds a frame from precomputed values.
    #[must_use]
    pub fn from_values(instruments: Vec<InstrumentIndicators>) -> Self {
        Self { instruments }
    }

    /// Indicators of one instrument.
    #[must_use]
    pub fn get(&self, instrument: usize) -> Option<&InstrumentIndicators> {
        self.instruments.get(instrument)
    }

    /// Iterates over all instruments in index order.
    pub fn iter(&self) -> impl Iterator<Item = &InstrumentIndicators> {
        self.instruments.iter()
    }

    /// Number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Returns true when the frame holds no instrument.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Latest closes of all instruments.
    #[must_use]
    pub fn prices(&self) -> Vec<f64> {
        self.instruments.iter().map(|i| i.price).collect()
    }
}

/// Cross-sectional ranking score per instrument.
///
/// The selection ranks by the absolute value of these scores.
#[must_use]
pub fn ranking_scores(frame: &IndicatorFrame, params: &StrategyParams) -> Vec<f64> {
    frame
        .iter()
        .map(|ind| match params.ranking {
            RankingScore::Momentum => ind.momentum,
            RankingScore::MomentumMeanReversion => {
                ind.momentum - params.mean_reversion_weight * ind.mean_reversion
            }
        })
        .collect()
}
