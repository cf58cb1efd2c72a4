//! Lifecycle rules
//!
//! Defines the Rule trait and the exit rules applied to open positions.

use crate::actions::Action;
use crate::context::{PositionView, TradeContext};
use kairos_types::{Direction, ExitReason, StopLossMode, TakeProfitLevel};
use serde::{Deserialize, Serialize};

/// Stable identifier for a lifecycle rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new rule identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Rule priority (lower value = evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulePriority(u16);

impl RulePriority {
    /// Stop-loss priority; a stop-out pre-empts any take-profit.
    pub const STOP_LOSS: Self = Self(10);
    /// Take-profit ladder priority.
    pub const TAKE_PROFIT: Self = Self(20);
    /// Signal reversal priority.
    pub const REVERSAL: Self = Self(30);

    /// Creates a new priority value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the numeric priority value.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

/// Trait for lifecycle rules.
///
/// Rules evaluate an open position and produce at most one action.
///
/// # Thread Safety
/// Rules must be `Send + Sync` for parallel evaluation.
pub trait Rule: Send + Sync {
    /// Stable rule identifier.
    fn id(&self) -> RuleId;

    /// Rule priority (lower wins).
    fn priority(&self) -> RulePriority;

    /// Evaluates the rule for a position.
    ///
    /// # Returns
    /// An action to take, or `None` if no action is needed.
    fn evaluate(&self, ctx: &TradeContext, position: &PositionView) -> Option<Action>;

    /// Name of the rule for logging/debugging.
    fn name(&self) -> &'static str;
}

/// Collection of rules, kept in priority order.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// Creates a new empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule; rules of equal priority keep insertion order.
    pub fn add<R: Rule + 'static>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
        self.rules.sort_by_key(|r| r.priority());
    }

    /// Returns an iterator over the rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Checks if the rule set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ==================== Rule Implementations ====================

/// Volatility-scaled stop-loss.
///
/// Closes when the adverse move since entry exceeds
/// `multiplier × volatility` (or `1 + multiplier × volatility` in
/// [`StopLossMode::LegacyOffset`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopLossRule {
    /// Volatility multiple
    pub multiplier: f64,
    /// Threshold comparison
    #[serde(default)]
    pub mode: StopLossMode,
}

impl StopLossRule {
    /// Creates a new stop-loss rule.
    #[must_use]
    pub fn new(multiplier: f64, mode: StopLossMode) -> Self {
        Self { multiplier, mode }
    }

    /// Adverse move beyond which the position is stopped out.
    #[must_use]
    pub fn threshold(&self, volatility: f64) -> f64 {
        let scaled = self.multiplier * volatility;
        match self.mode {
            StopLossMode::Volatility => scaled,
            StopLossMode::LegacyOffset => scaled + 1.0,
        }
    }
}

impl Rule for StopLossRule {
    fn id(&self) -> RuleId {
        RuleId::from("stop_loss")
    }

    fn priority(&self) -> RulePriority {
        RulePriority::STOP_LOSS
    }

    fn evaluate(&self, ctx: &TradeContext, position: &PositionView) -> Option<Action> {
        let adverse = -position
            .direction
            .favorable_move(position.entry_price, ctx.market.price);

        (adverse > self.threshold(ctx.market.volatility))
            .then(|| Action::close(position.instrument, ExitReason::StopLoss))
    }

    fn name(&self) -> &'static str {
        "stop_loss"
    }
}

/// Staged take-profit.
///
/// Stages are numbered from 1 in ladder order. Evaluation starts at the
/// highest stage and fires the first one not yet reached whose threshold is
/// crossed, so a gap through several thresholds lands on the highest of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeProfitLadderRule {
    /// Ladder stages, stage 1 first
    pub levels: Vec<TakeProfitLevel>,
}

impl TakeProfitLadderRule {
    /// Creates a new ladder rule.
    #[must_use]
    pub fn new(levels: Vec<TakeProfitLevel>) -> Self {
        Self { levels }
    }

    fn crossed(direction: Direction, entry: f64, price: f64, threshold: f64) -> bool {
        match direction {
            Direction::Long => price >= entry * (1.0 + threshold),
            Direction::Short => price <= entry * (1.0 - threshold),
        }
    }
}

impl Rule for TakeProfitLadderRule {
    fn id(&self) -> RuleId {
        RuleId::from("take_profit_ladder")
    }

    fn priority(&self) -> RulePriority {
        RulePriority::TAKE_PROFIT
    }

    fn evaluate(&self, ctx: &TradeContext, position: &PositionView) -> Option<Action> {
        for (idx, level) in self.levels.iter().enumerate().rev() {
            let stage = u8::try_from(idx + 1).unwrap_or(u8::MAX);
            if position.take_profit_stage >= stage {
                continue;
            }
            if !Self::crossed(
                position.direction,
                position.entry_price,
                ctx.market.price,
                level.threshold,
            ) {
                continue;
            }

            if level.is_full_exit() {
                return Some(Action::close(position.instrument, ExitReason::TakeProfit));
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let remaining =
                (position.initial_size as f64 * level.remaining_fraction).round_ties_even() as i64;
            if remaining <= 0 {
                return Some(Action::close(position.instrument, ExitReason::TakeProfit));
            }
            return Some(Action::reduce(position.instrument, stage, remaining));
        }

        None
    }

    fn name(&self) -> &'static str {
        "take_profit_ladder"
    }
}

/// Signal reversal exit.
///
/// Closes a position when today's entry signal points the other way, but
/// only once `hold_period` days have passed since the last position change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReversalExitRule {
    /// Minimum days between position changes
    pub hold_period: usize,
}

impl ReversalExitRule {
    /// Creates a new reversal rule.
    #[must_use]
    pub fn new(hold_period: usize) -> Self {
        Self { hold_period }
    }
}

impl Rule for ReversalExitRule {
    fn id(&self) -> RuleId {
        RuleId::from("reversal_exit")
    }

    fn priority(&self) -> RulePriority {
        RulePriority::REVERSAL
    }

    fn evaluate(&self, ctx: &TradeContext, position: &PositionView) -> Option<Action> {
        let reversed = ctx.market.entry_signal == Some(position.direction.opposite());
        if !reversed {
            return None;
        }
        if position.days_held(ctx.day) < self.hold_period {
            tracing::trace!(
                instrument = position.instrument,
                hold_period = self.hold_period,
                "reversal exit deferred by hold period"
            );
            return None;
        }
        Some(Action::close(position.instrument, ExitReason::Reversal))
    }

    fn name(&self) -> &'static str {
        "reversal_exit"
    }
}
