/// Reason for a full trade exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Final take-profit stage reached
    TakeProfit,
    /// Volatility stop triggered
    StopLoss,
    /// Opposite entry signal after the hold period elapsed
    Reversal,
    /// Position trimmed to zero by the net-exposure balancing pass
    Rebalance,
}

impl ExitReason {
    /// Returns true for exits driven by risk rules (stop-loss, take-profit).
    ///
    /// Risk exits ignore the hold period.
    #[must_use]
    pub const fn is_risk_exit(self) -> bool {
        matches!(self, ExitReason::TakeProfit | ExitReason::StopLoss)
    }

    /// Returns string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ExitReason::TakeProfit => "take_profit",
            ExitReason::StopLoss => "stop_loss",
            ExitReason::Reversal => "reversal",
            ExitReason::Rebalance => "rebalance",
        }
    }
}
