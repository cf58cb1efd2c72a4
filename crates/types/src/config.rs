//! Strategy parameters.
//!
//! A flat set of named numeric parameters. Every field carries a default,
//! so an empty JSON object deserializes to the reference configuration.

use crate::error::CoreError;

/// Score used for the cross-sectional ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingScore {
    /// Rank by absolute momentum
    #[default]
    Momentum,
    /// Rank by absolute value of momentum minus weighted mean-reversion deviation
    MomentumMeanReversion,
}

/// Position sizing model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMode {
    /// `floor(pos_limit / price)`
    #[default]
    Fixed,
    /// Allocation scaled by inverse volatility relative to the selected set
    InverseVolatility,
    /// Inverse-volatility allocation further scaled by signal strength
    StrengthInverseVolatility,
}

/// Stop-loss comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLossMode {
    /// Exit when the adverse move exceeds `stop_multiplier × volatility`
    #[default]
    Volatility,
    /// Exit when the adverse move exceeds `1 + stop_multiplier × volatility`.
    ///
    /// Reproduces a historical threshold that effectively never fires.
    LegacyOffset,
}

/// One stage of the take-profit ladder.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TakeProfitLevel {
    /// Favorable move relative to entry (0.05 = +5%)
    pub threshold: f64,
    /// Share of `initial_size` kept after this stage (0 = full exit)
    pub remaining_fraction: f64,
}

impl TakeProfitLevel {
    /// Creates a new ladder stage.
    #[must_use]
    pub const fn new(threshold: f64, remaining_fraction: f64) -> Self {
        Self {
            threshold,
            remaining_fraction,
        }
    }

    /// Returns true when this stage closes the trade.
    #[must_use]
    pub fn is_full_exit(&self) -> bool {
        self.remaining_fraction <= 0.0
    }
}

/// Strategy parameters
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrategyParams {
    // Indicator windows
    /// Short moving-average window
    #[serde(default = "default_short_ma_window")]
    pub short_ma_window: usize,
    /// Long moving-average window
    #[serde(default = "default_long_ma_window")]
    pub long_ma_window: usize,
    /// Confirmation moving-average window
    #[serde(default = "default_confirm_ma_window")]
    pub confirm_ma_window: usize,
    /// Momentum lookback in days
    #[serde(default = "default_momentum_lookback")]
    pub momentum_lookback: usize,
    /// Number of trailing log returns for volatility
    #[serde(default = "default_vol_lookback")]
    pub vol_lookback: usize,
    /// Volatility floor
    #[serde(default = "default_vol_floor")]
    pub vol_floor: f64,

    // Selection
    /// Breadth of the cross-sectional selection
    #[serde(default = "default_top_n", alias = "topN")]
    pub top_n: usize,
    /// Ranking score
    #[serde(default)]
    pub ranking: RankingScore,
    /// Weight of the mean-reversion deviation in the combined score
    #[serde(default = "default_mean_reversion_weight")]
    pub mean_reversion_weight: f64,
    /// Minimum absolute momentum for an entry
    #[serde(default = "default_min_signal_strength")]
    pub min_signal_strength: f64,

    // Sizing
    /// Per-instrument dollar cap
    #[serde(default = "default_pos_limit")]
    pub pos_limit: f64,
    /// Sizing model
    #[serde(default)]
    pub sizing: SizingMode,
    /// Commission rate used by the minimum-trade-value filter
    #[serde(default)]
    pub commission: f64,
    /// Explicit minimum trade value (overrides `2 × commission × pos_limit`)
    #[serde(default)]
    pub min_trade_value: Option<f64>,
    /// Enable the net-exposure balancing pass
    #[serde(default)]
    pub market_neutral: bool,
    /// Net dollar exposure accepted as balanced
    #[serde(default = "default_neutrality_tolerance")]
    pub neutrality_tolerance: f64,

    // Lifecycle
    /// Volatility multiple for the stop-loss
    #[serde(default = "default_stop_multiplier")]
    pub stop_multiplier: f64,
    /// Stop-loss comparison
    #[serde(default)]
    pub stop_loss_mode: StopLossMode,
    /// Staged take-profit ladder, stage 1 first
    #[serde(default = "default_take_profit_levels")]
    pub take_profit_levels: Vec<TakeProfitLevel>,
    /// Minimum days between position changes for non-risk exits
    #[serde(default)]
    pub hold_period: usize,
    /// Close on an opposite entry signal
    #[serde(default)]
    pub exit_on_reversal: bool,
    /// Qualifying signals suppressed after a full exit
    #[serde(default = "default_cooldown_length")]
    pub cooldown_length: u32,
}

fn default_short_ma_window() -> usize {
    7
}
fn default_long_ma_window() -> usize {
    27
}
fn default_confirm_ma_window() -> usize {
    5
}
fn default_momentum_lookback() -> usize {
    9
}
fn default_vol_lookback() -> usize {
    19
}
fn default_vol_floor() -> f64 {
    1e-6
}
fn default_top_n() -> usize {
    30
}
fn default_mean_reversion_weight() -> f64 {
    0.5
}
fn default_min_signal_strength() -> f64 {
    0.04
}
fn default_pos_limit() -> f64 {
    10_000.0
}
fn default_neutrality_tolerance() -> f64 {
    100.0
}
fn default_stop_multiplier() -> f64 {
    1.0
}
fn default_take_profit_levels() -> Vec<TakeProfitLevel> {
    vec![
        TakeProfitLevel::new(0.05, 2.0 / 3.0),
        TakeProfitLevel::new(0.05, 1.0 / 3.0),
        TakeProfitLevel::new(0.10, 0.0),
    ]
}
fn default_cooldown_length() -> u32 {
    1
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            short_ma_window: default_short_ma_window(),
            long_ma_window: default_long_ma_window(),
            confirm_ma_window: default_confirm_ma_window(),
            momentum_lookback: default_momentum_lookback(),
            vol_lookback: default_vol_lookback(),
            vol_floor: default_vol_floor(),
            top_n: default_top_n(),
            ranking: RankingScore::default(),
            mean_reversion_weight: default_mean_reversion_weight(),
            min_signal_strength: default_min_signal_strength(),
            pos_limit: default_pos_limit(),
            sizing: SizingMode::default(),
            commission: 0.0,
            min_trade_value: None,
            market_neutral: false,
            neutrality_tolerance: default_neutrality_tolerance(),
            stop_multiplier: default_stop_multiplier(),
            stop_loss_mode: StopLossMode::default(),
            take_profit_levels: default_take_profit_levels(),
            hold_period: 0,
            exit_on_reversal: false,
            cooldown_length: default_cooldown_length(),
        }
    }
}

impl StrategyParams {
    /// Parses and validates parameters from JSON.
    ///
    /// # Errors
    /// Returns [`CoreError::Json`] for malformed JSON and
    /// [`CoreError::Config`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Checks parameter ranges.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), CoreError> {
        let windows = [
            ("short_ma_window", self.short_ma_window),
            ("long_ma_window", self.long_ma_window),
            ("confirm_ma_window", self.confirm_ma_window),
            ("momentum_lookback", self.momentum_lookback),
            ("vol_lookback", self.vol_lookback),
            ("top_n", self.top_n),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(CoreError::Config(format!("{name} must be > 0")));
            }
        }

        let positive = [
            ("vol_floor", self.vol_floor),
            ("pos_limit", self.pos_limit),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::Config(format!("{name} must be > 0")));
            }
        }

        let non_negative = [
            ("commission", self.commission),
            ("min_signal_strength", self.min_signal_strength),
            ("stop_multiplier", self.stop_multiplier),
            ("mean_reversion_weight", self.mean_reversion_weight),
            ("neutrality_tolerance", self.neutrality_tolerance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Config(format!("{name} must be >= 0")));
            }
        }

        if let Some(min_value) = self.min_trade_value
            && (!min_value.is_finite() || min_value < 0.0)
        {
            return Err(CoreError::Config("min_trade_value must be >= 0".to_string()));
        }

        for (idx, level) in self.take_profit_levels.iter().enumerate() {
            let stage = idx + 1;
            if !level.threshold.is_finite() || level.threshold <= 0.0 {
                return Err(CoreError::Config(format!(
                    "take_profit_levels[{stage}].threshold must be > 0"
                )));
            }
            if !(0.0..1.0).contains(&level.remaining_fraction) {
                return Err(CoreError::Config(format!(
                    "take_profit_levels[{stage}].remaining_fraction must be in [0, 1)"
                )));
            }
        }
        if self.take_profit_levels.len() > usize::from(u8::MAX) {
            return Err(CoreError::Config(
                "take_profit_levels has too many stages".to_string(),
            ));
        }

        Ok(())
    }

    /// Minimum number of days required before any position is taken.
    #[must_use]
    pub fn min_history(&self) -> usize {
        [
            self.long_ma_window,
            self.short_ma_window,
            self.confirm_ma_window,
            self.momentum_lookback + 1,
            self.vol_lookback + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(1)
    }

    /// Dollar value a discretionary trade must exceed to be accepted.
    #[must_use]
    pub fn effective_min_trade_value(&self) -> f64 {
        self.min_trade_value
            .unwrap_or(2.0 * self.commission * self.pos_limit)
    }
}
