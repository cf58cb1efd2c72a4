//! Minimum-trade-value filter.

use kairos_types::StrategyParams;

/// Outcome of filtering one proposed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Proposal is worth trading
    Accepted(i64),
    /// Proposal discarded; the current position stands
    Rejected {
        /// Position kept
        current: i64,
        /// Position proposed
        proposed: i64,
    },
}

impl FilterDecision {
    /// Position the instrument ends up with.
    pub fn position(self) -> i64 {
        match self {
            FilterDecision::Accepted(target) => target,
            FilterDecision::Rejected { current, .. } => current,
        }
    }

    /// Returns true when the proposal was accepted.
    pub fn is_accepted(self) -> bool {
        matches!(self, FilterDecision::Accepted(_))
    }
}

/// Discards discretionary changes whose dollar value does not exceed
/// `min_trade_value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionFilter {
    /// Strict lower bound on `|proposed - current| × price`
    pub min_trade_value: f64,
}

impl CommissionFilter {
    /// Creates a filter with an explicit threshold.
    pub fn new(min_trade_value: f64) -> Self {
        Self { min_trade_value }
    }

    /// Threshold from the parameters (explicit value or `2 × commission × pos_limit`).
    pub fn from_params(params: &StrategyParams) -> Self {
        Self::new(params.effective_min_trade_value())
    }

    /// Dollar value of moving from `current` to `proposed`.
    #[allow(clippy::cast_precision_loss)]
    pub fn trade_value(current: i64, proposed: i64, price: f64) -> f64 {
        (proposed - current).abs() as f64 * price
    }

    /// Returns true when the change is worth its commission.
    pub fn accepts(&self, current: i64, proposed: i64, price: f64) -> bool {
        Self::trade_value(current, proposed, price) > self.min_trade_value
    }

    /// Filters one proposal.
    pub fn apply(&self, instrument: usize, current: i64, proposed: i64, price: f64) -> FilterDecision {
        if self.accepts(current, proposed, price) {
            return FilterDecision::Accepted(proposed);
        }
        tracing::trace!(
            instrument,
            current,
            proposed,
            min_trade_value = self.min_trade_value,
            "proposal below minimum trade value"
        );
        FilterDecision::Rejected { current, proposed }
    }
}
