//! Momentum indicator

use crate::traits::Indicator;

/// Momentum
///
/// Relative price change over a fixed lookback:
/// `close[t] / close[t - lookback] - 1`.
#[derive(Debug, Clone)]
pub struct Momentum {
    /// Lookback in days
    pub lookback: usize,
}

impl Momentum {
    /// Creates a new momentum indicator.
    pub fn new(lookback: usize) -> Self {
        Self { lookback }
    }
}

impl Indicator for Momentum {
    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; closes.len()];
        if self.lookback == 0 {
            return result;
        }
        for i in self.lookback..closes.len() {
            result[i] = closes[i] / closes[i - self.lookback] - 1.0;
        }
        result
    }

    fn latest(&self, closes: &[f64]) -> Option<f64> {
        let last = closes.len().checked_sub(1)?;
        if self.lookback == 0 || last < self.lookback {
            return None;
        }
        Some(closes[last] / closes[last - self.lookback] - 1.0)
    }

    fn name(&self) -> &str {
        "MOMENTUM"
    }

    fn warmup_periods(&self) -> usize {
        self.lookback + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_momentum_basic() {
        let closes = [100.0, 101.0, 102.0, 110.0];
        let momentum = Momentum::new(3);

        let series = momentum.compute(&closes);
        assert!(series[2].is_nan());
        assert_relative_eq!(series[3], 0.10, epsilon = 1e-12);
        assert_relative_eq!(momentum.latest(&closes).unwrap(), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_momentum_needs_lookback_plus_one() {
        let momentum = Momentum::new(3);
        assert_eq!(momentum.warmup_periods(), 4);
        assert_eq!(momentum.latest(&[1.0, 2.0, 3.0]), None);
        assert_eq!(momentum.latest(&[]), None);
    }

    #[test]
    fn test_momentum_negative() {
        let momentum = Momentum::new(1);
        assert_relative_eq!(momentum.latest(&[100.0, 95.0]).unwrap(), -0.05, epsilon = 1e-12);
    }
}
