//! Entry signals and the trend/momentum entry rule.

use crate::context::SignalContext;
use crate::traits::SignalRule;
use kairos_indicators::{IndicatorFrame, Selection};
use kairos_types::{Direction, StrategyParams};
use serde::{Deserialize, Serialize};

/// Entry signal for one instrument on one day.
///
/// At most one direction holds. `strength` is the signed momentum that
/// qualified the signal and is `0.0` when there is no signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntrySignal {
    /// Signal direction, `None` when neither side qualifies
    pub direction: Option<Direction>,
    /// Signed signal strength
    pub strength: f64,
}

impl EntrySignal {
    /// No entry.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            direction: None,
            strength: 0.0,
        }
    }

    /// Directional entry with the given strength.
    #[must_use]
    pub const fn new(direction: Direction, strength: f64) -> Self {
        Self {
            direction: Some(direction),
            strength,
        }
    }

    /// Returns true when a direction is signalled.
    #[must_use]
    pub const fn is_directional(&self) -> bool {
        self.direction.is_some()
    }

    /// Returns +1 / -1 / 0.
    #[must_use]
    pub fn sign(&self) -> i64 {
        self.direction.map_or(0, Direction::sign)
    }
}

impl Default for EntrySignal {
    fn default() -> Self {
        Self::none()
    }
}

/// Trend-following entry rule with cross-sectional momentum confirmation.
///
/// Long requires, all at once:
/// - price above the short and the long moving average
/// - membership in the top-K selection
/// - `|momentum| > min_signal_strength` and `momentum > 0`
/// - price above the confirmation average
///
/// Short is the mirror image. Instruments outside the selection never signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendMomentumRule {
    /// Minimum absolute momentum
    pub min_signal_strength: f64,
}

impl TrendMomentumRule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(min_signal_strength: f64) -> Self {
        Self {
            min_signal_strength,
        }
    }

    /// Creates the rule from strategy parameters.
    #[must_use]
    pub fn from_params(params: &StrategyParams) -> Self {
        Self::new(params.min_signal_strength)
    }
}

impl SignalRule for TrendMomentumRule {
    fn evaluate(&self, ctx: &SignalContext<'_>) -> EntrySignal {
        if !ctx.selected {
            return EntrySignal::none();
        }

        let ind = ctx.indicators;
        let price = ind.price;
        let mom = ind.momentum;
        let strong = mom.abs() > self.min_signal_strength;

        let long = price > ind.short_ma
            && price > ind.long_ma
            && strong
            && mom > 0.0
            && price > ind.confirm_ma;
        if long {
            return EntrySignal::new(Direction::Long, mom);
        }

        let short = price < ind.short_ma
            && price < ind.long_ma
            && strong
            && mom < 0.0
            && price < ind.confirm_ma;
        if short {
            return EntrySignal::new(Direction::Short, mom);
        }

        EntrySignal::none()
    }

    fn name(&self) -> &'static str {
        "trend_momentum"
    }
}

/// Evaluates a [`SignalRule`] for every instrument of the day.
pub struct SignalGenerator {
    rule: Box<dyn SignalRule>,
}

impl SignalGenerator {
    /// Creates a generator around a rule.
    pub fn new<R: SignalRule + 'static>(rule: R) -> Self {
        Self {
            rule: Box::new(rule),
        }
    }

    /// Creates the default trend/momentum generator.
    #[must_use]
    pub fn from_params(params: &StrategyParams) -> Self {
        Self::new(TrendMomentumRule::from_params(params))
    }

    /// One signal per instrument, in index order.
    #[must_use]
    pub fn generate(&self, frame: &IndicatorFrame, selection: &Selection) -> Vec<EntrySignal> {
        frame
            .iter()
            .enumerate()
            .map(|(idx, indicators)| {
                let ctx = SignalContext::new(idx, indicators, selection.contains(idx));
                self.rule.evaluate(&ctx)
            })
            .collect()
    }

    /// Name of the underlying rule.
    #[must_use]
    pub fn rule_name(&self) -> &'static str {
        self.rule.name()
    }
}

impl std::fmt::Debug for SignalGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalGenerator")
            .field("rule", &self.rule.name())
            .finish()
    }
}
