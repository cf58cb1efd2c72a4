//! Trade manager engine
//!
//! Evaluates lifecycle rules for open positions.

use crate::actions::Action;
use crate::context::{PositionView, TradeContext};
use crate::rules::{ReversalExitRule, Rule, RuleSet, StopLossRule, TakeProfitLadderRule};
use kairos_types::StrategyParams;

/// Trade manager for evaluating rules against positions.
///
/// Rules run in priority order and the first one that fires wins, so an
/// instrument takes at most one exit path per day.
///
/// # Example
/// ```ignore
/// let manager = TradeManagerBuilder::new()
///     .with_rule(StopLossRule::new(1.0, StopLossMode::Volatility))
///     .with_rule(TakeProfitLadderRule::new(levels))
///     .build();
///
/// let ctx = TradeContext::new(day, MarketView::new(price, volatility));
/// if let Some(action) = manager.evaluate(&ctx, &position) {
///     // Apply action...
/// }
/// ```
#[derive(Default)]
pub struct TradeManager {
    rules: RuleSet,
}

impl TradeManager {
    /// Creates a new trade manager with the given rules.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Creates the manager configured by the strategy parameters.
    ///
    /// The stop-loss is always present; the ladder only when levels are
    /// configured, the reversal exit only when enabled.
    pub fn from_params(params: &StrategyParams) -> Self {
        TradeManagerBuilder::from_params(params).build()
    }

    /// Evaluates rules for one position; first matching rule wins.
    pub fn evaluate(&self, ctx: &TradeContext, position: &PositionView) -> Option<Action> {
        self.rules.iter().find_map(|rule| rule.evaluate(ctx, position))
    }

    /// Names of the configured rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// Returns the number of rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Checks if the manager has any rules.
    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }
}

impl std::fmt::Debug for TradeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeManager")
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Builder for creating a `TradeManager` with a fluent API.
#[derive(Default)]
pub struct TradeManagerBuilder {
    rules: RuleSet,
}

impl TradeManagerBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new(),
        }
    }

    /// Builder pre-loaded with the rules the parameters enable.
    pub fn from_params(params: &StrategyParams) -> Self {
        let mut builder =
            Self::new().with_rule(StopLossRule::new(params.stop_multiplier, params.stop_loss_mode));
        if !params.take_profit_levels.is_empty() {
            builder = builder.with_rule(TakeProfitLadderRule::new(params.take_profit_levels.clone()));
        }
        if params.exit_on_reversal {
            builder = builder.with_rule(ReversalExitRule::new(params.hold_period));
        }
        builder
    }

    /// Adds a rule to the builder.
    pub fn with_rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.add(rule);
        self
    }

    /// Builds the trade manager.
    pub fn build(self) -> TradeManager {
        TradeManager::new(self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MarketView;
    use kairos_types::{Direction, ExitReason, StopLossMode, TakeProfitLevel};

    fn ladder() -> TakeProfitLadderRule {
        TakeProfitLadderRule::new(vec![
            TakeProfitLevel::new(0.05, 2.0 / 3.0),
            TakeProfitLevel::new(0.05, 1.0 / 3.0),
            TakeProfitLevel::new(0.10, 0.0),
        ])
    }

    fn ctx(price: f64, volatility: f64) -> TradeContext {
        TradeContext::new(40, MarketView::new(price, volatility))
    }

    #[test]
    fn test_from_params_rule_selection() {
        let manager = TradeManager::from_params(&StrategyParams::default());
        assert_eq!(manager.rule_names(), vec!["stop_loss", "take_profit_ladder"]);

        let params = StrategyParams {
            exit_on_reversal: true,
            take_profit_levels: Vec::new(),
            ..StrategyParams::default()
        };
        let manager = TradeManager::from_params(&params);
        assert_eq!(manager.rule_names(), vec!["stop_loss", "reversal_exit"]);
    }

    #[test]
    fn test_stop_loss_preempts_take_profit() {
        // Negative multiplier makes the stop fire on any move, including a
        // favorable one that also crosses the final take-profit threshold
        let manager = TradeManagerBuilder::new()
            .with_rule(ladder())
            .with_rule(StopLossRule::new(-100.0, StopLossMode::Volatility))
            .build();

        let position = PositionView::new(0, Direction::Long, 100.0, 100);
        let action = manager.evaluate(&ctx(111.0, 0.01), &position).unwrap();
        assert_eq!(action.exit_reason(), Some(ExitReason::StopLoss));
    }

    #[test]
    fn test_take_profit_preempts_reversal() {
        let manager = TradeManagerBuilder::new()
            .with_rule(ReversalExitRule::new(0))
            .with_rule(ladder())
            .build();

        let position = PositionView::new(0, Direction::Short, 100.0, 90).with_last_trade_day(0);
        let market = MarketView::new(89.0, 0.01).with_signal(Some(Direction::Long));
        let action = manager
            .evaluate(&TradeContext::new(40, market), &position)
            .unwrap();
        assert_eq!(action, Action::close(0, ExitReason::TakeProfit));
    }

    #[test]
    fn test_trade_manager_one_action_per_position() {
        let manager = TradeManager::from_params(&StrategyParams::default());
        let ctx = ctx(105.0, 0.01);

        // Position 0 hits +5%, position 1 is stopped out, position 2 hits +10%
        let actions: Vec<Action> = [
            PositionView::new(0, Direction::Long, 100.0, 99),
            PositionView::new(1, Direction::Long, 200.0, 50),
            PositionView::new(2, Direction::Long, 95.0, 100),
        ]
        .iter()
        .filter_map(|position| manager.evaluate(&ctx, position))
        .collect();

        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0], Action::reduce(0, 2, 33));
        assert_eq!(actions[1], Action::close(1, ExitReason::StopLoss));
        assert_eq!(actions[2], Action::close(2, ExitReason::TakeProfit));
    }

    #[test]
    fn test_trade_manager_builder() {
        let manager = TradeManagerBuilder::new()
            .with_rule(ladder())
            .with_rule(StopLossRule::new(1.0, StopLossMode::Volatility))
            .build();

        assert_eq!(manager.rule_count(), 2);
        assert_eq!(manager.rule_names(), vec!["stop_loss", "take_profit_ladder"]);
        assert!(format!("{manager:?}").contains("stop_loss"));
    }

    #[test]
    fn test_trade_manager_default() {
        let manager = TradeManager::default();
        assert!(!manager.has_rules());
        assert_eq!(manager.rule_count(), 0);
        let position = PositionView::new(0, Direction::Long, 100.0, 100);
        assert!(manager.evaluate(&ctx(50.0, 0.01), &position).is_none());
    }
}
