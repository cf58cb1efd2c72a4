//! Warm-up check.

use kairos_types::{PriceHistory, StrategyParams};

/// Days of history still missing before the first decision.
///
/// Returns `None` once `history` covers [`StrategyParams::min_history`].
#[must_use]
pub fn warmup_remaining(history: &PriceHistory, params: &StrategyParams) -> Option<usize> {
    let required = params.min_history();
    let available = history.n_days();
    if available >= required {
        return None;
    }

    tracing::debug!(
        "Warmup: {} days required, {} available",
        required,
        available
    );
    Some(required - available)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(days: usize) -> PriceHistory {
        let mut history = PriceHistory::new(2);
        for day in 0..days {
            #[allow(clippy::cast_precision_loss)]
            let price = 100.0 + day as f64;
            history.push_day(&[price, 50.0]).unwrap();
        }
        history
    }

    #[test]
    fn test_warmup_remaining() {
        let params = StrategyParams::default();
        assert_eq!(warmup_remaining(&history(0), &params), Some(27));
        assert_eq!(warmup_remaining(&history(26), &params), Some(1));
        assert_eq!(warmup_remaining(&history(27), &params), None);
    }

    #[test]
    fn test_warmup_follows_longest_window() {
        let params = StrategyParams {
            vol_lookback: 40,
            ..StrategyParams::default()
        };
        assert_eq!(warmup_remaining(&history(40), &params), Some(1));
        assert_eq!(warmup_remaining(&history(41), &params), None);
    }
}
