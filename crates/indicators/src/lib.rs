//! Kairos Indicators
//!
//! Indicator engine for the kairos position engine.
//! Computes every per-instrument indicator from the closing price history
//! and builds the cross-sectional selection used by the signal layer.
//!
//! # Features
//! - Indicator trait over closing price slices
//! - [`IndicatorFrame`]: all indicators for all instruments as of the latest day
//! - [`Selection`]: top-K instrument set built from a single stable sort
//!
//! # Available Indicators
//! - SMA: Simple Moving Average
//! - Momentum: relative change over a lookback
//! - Log-return volatility: population std of daily log returns, floored
//! - Mean reversion: deviation of price from a moving average

#![deny(clippy::all)]

pub mod error;
pub mod frame;
pub mod impl_;
pub mod selection;
pub mod traits;

// Re-export main types
pub use error::IndicatorError;
pub use frame::{IndicatorFrame, InstrumentIndicators, ranking_scores};
pub use selection::Selection;
pub use traits::Indicator;

// Re-export indicator implementations
pub use impl_::{
    log_volatility::LogReturnVolatility, mean_reversion::MeanReversion, momentum::Momentum,
    sma::SMA,
};
