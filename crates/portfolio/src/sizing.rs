//! Position sizing.
//!
//! Every model converts a directional entry into an unsigned share count,
//! capped at `floor(pos_limit / price)`.

use crate::error::PortfolioError;
use kairos_indicators::{IndicatorFrame, Selection};
use kairos_types::{SizingMode, StrategyParams};

/// Per-instrument inputs to a sizing model.
#[derive(Debug, Clone, Copy)]
pub struct SizingInput {
    /// Instrument index
    pub instrument: usize,
    /// Latest close
    pub price: f64,
    /// Floored volatility
    pub volatility: f64,
    /// Signed signal strength (momentum)
    pub strength: f64,
}

/// Cross-sectional sizing inputs shared by all instruments of one day.
#[derive(Debug, Clone, Copy)]
pub struct SizingContext {
    /// Per-instrument dollar cap
    pub pos_limit: f64,
    /// Sum of inverse volatilities over the selected set
    pub inverse_volatility_sum: f64,
}

impl SizingContext {
    /// Builds the context for one day.
    ///
    /// The sum is taken over the selected instruments; with an empty
    /// selection it falls back to 1 so weights stay finite.
    pub fn new(pos_limit: f64, frame: &IndicatorFrame, selection: &Selection) -> Self {
        Self {
            pos_limit,
            inverse_volatility_sum: inverse_volatility_sum(frame, selection).unwrap_or(1.0),
        }
    }
}

/// Sum of `1 / volatility` over the selected instruments.
pub fn inverse_volatility_sum(frame: &IndicatorFrame, selection: &Selection) -> Option<f64> {
    let inverse: Vec<f64> = selection
        .indices()
        .filter_map(|idx| frame.get(idx))
        .map(|ind| 1.0 / ind.volatility)
        .collect();
    if inverse.is_empty() {
        return None;
    }
    Some(inverse.iter().sum())
}

/// Largest share count whose value stays within `pos_limit`.
///
/// # Errors
/// Returns [`PortfolioError::InvalidPrice`] for non-positive or non-finite prices.
pub fn dollar_cap_shares(instrument: usize, pos_limit: f64, price: f64) -> Result<i64, PortfolioError> {
    let price = PortfolioError::check_price(instrument, price)?;
    Ok(floor_shares(pos_limit / price))
}

#[allow(clippy::cast_possible_truncation)]
fn floor_shares(value: f64) -> i64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as i64
    } else {
        0
    }
}

/// Trait for sizing models.
pub trait PositionSizer: Send + Sync {
    /// Unsigned share count for an entry.
    ///
    /// # Errors
    /// Returns [`PortfolioError::InvalidPrice`] for unusable prices.
    fn size(&self, input: &SizingInput, ctx: &SizingContext) -> Result<i64, PortfolioError>;

    /// Name of the model for logging.
    fn name(&self) -> &'static str;
}

/// `floor(pos_limit / price)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSizer;

impl PositionSizer for FixedSizer {
    fn size(&self, input: &SizingInput, ctx: &SizingContext) -> Result<i64, PortfolioError> {
        dollar_cap_shares(input.instrument, ctx.pos_limit, input.price)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Allocation scaled by `(1/vol) / sum_selected(1/vol)`, never above the cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseVolatilitySizer;

impl InverseVolatilitySizer {
    fn weight(input: &SizingInput, ctx: &SizingContext) -> f64 {
        (1.0 / input.volatility) / ctx.inverse_volatility_sum
    }
}

impl PositionSizer for InverseVolatilitySizer {
    fn size(&self, input: &SizingInput, ctx: &SizingContext) -> Result<i64, PortfolioError> {
        let cap = dollar_cap_shares(input.instrument, ctx.pos_limit, input.price)?;
        let weight = Self::weight(input, ctx).min(1.0);
        Ok(floor_shares(ctx.pos_limit * weight / input.price).min(cap))
    }

    fn name(&self) -> &'static str {
        "inverse_volatility"
    }
}

/// Inverse-volatility weight further scaled by `|strength|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthInverseVolatilitySizer;

impl PositionSizer for StrengthInverseVolatilitySizer {
    fn size(&self, input: &SizingInput, ctx: &SizingContext) -> Result<i64, PortfolioError> {
        let cap = dollar_cap_shares(input.instrument, ctx.pos_limit, input.price)?;
        let weight = (input.strength.abs() * InverseVolatilitySizer::weight(input, ctx)).min(1.0);
        Ok(floor_shares(ctx.pos_limit * weight / input.price).min(cap))
    }

    fn name(&self) -> &'static str {
        "strength_inverse_volatility"
    }
}

/// Builds the sizing model selected by the parameters.
pub fn sizer_from_params(params: &StrategyParams) -> Box<dyn PositionSizer> {
    match params.sizing {
        SizingMode::Fixed => Box::new(FixedSizer),
        SizingMode::InverseVolatility => Box::new(InverseVolatilitySizer),
        SizingMode::StrengthInverseVolatility => Box::new(StrengthInverseVolatilitySizer),
    }
}
