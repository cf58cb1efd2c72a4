//! Log-return volatility indicator

use crate::traits::Indicator;

/// Log-return volatility
///
/// Population standard deviation (ddof=0) of the last `lookback` daily log
/// returns `ln(close[t] / close[t-1])`, floored at `floor` so that
/// inverse-volatility sizing and stop thresholds never divide by zero.
#[derive(Debug, Clone)]
pub struct LogReturnVolatility {
    /// Number of trailing log returns
    pub lookback: usize,
    /// Minimum reported volatility
    pub floor: f64,
}

impl LogReturnVolatility {
    /// Creates a new volatility indicator.
    pub fn new(lookback: usize, floor: f64) -> Self {
        Self { lookback, floor }
    }

    fn window_std(&self, closes: &[f64]) -> f64 {
        let returns: Vec<f64> = closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        if std.is_finite() && std > self.floor {
            std
        } else {
            self.floor
        }
    }
}

impl Indicator for LogReturnVolatility {
    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let len = closes.len();
        let mut result = vec![f64::NAN; len];
        if self.lookback == 0 {
            return result;
        }
        for i in self.lookback..len {
            result[i] = self.window_std(&closes[i - self.lookback..=i]);
        }
        result
    }

    fn latest(&self, closes: &[f64]) -> Option<f64> {
        if self.lookback == 0 || closes.len() <= self.lookback {
            return None;
        }
        Some(self.window_std(&closes[closes.len() - self.lookback - 1..]))
    }

    fn name(&self) -> &str {
        "LOG_VOLATILITY"
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
    fn test_constant_prices_hit_floor() {
        let vol = LogReturnVolatility::new(5, 1e-6);
        let closes = [50.0; 10];
        assert_relative_eq!(vol.latest(&closes).unwrap(), 1e-6);
        assert!(vol.compute(&closes)[5..].iter().all(|v| (*v - 1e-6).abs() < 1e-15));
    }

    #[test]
    fn test_constant_growth_has_zero_dispersion() {
        // Every log return is ln(1.01): std is zero and the floor applies
        let closes: Vec<f64> = (0..10).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let vol = LogReturnVolatility::new(5, 1e-6);
        assert!(vol.latest(&closes).unwrap() < 1e-5);
    }

    #[test]
    fn test_alternating_returns() {
        // Returns alternate between +r and -r: population std is r
        let up = 1.02f64;
        let closes = [100.0, 100.0 * up, 100.0, 100.0 * up, 100.0];
        let vol = LogReturnVolatility::new(4, 1e-6);
        assert_relative_eq!(vol.latest(&closes).unwrap(), up.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_latest_uses_trailing_window() {
        let closes = [10.0, 30.0, 10.0, 10.0, 10.0, 10.0];
        let vol = LogReturnVolatility::new(3, 1e-6);
        // Last three returns are all zero; the early spike is outside the window
        assert_relative_eq!(vol.latest(&closes).unwrap(), 1e-6);
        let series = vol.compute(&closes);
        assert_relative_eq!(series[5], vol.latest(&closes).unwrap());
    }

    #[test]
    fn test_insufficient_data() {
        let vol = LogReturnVolatility::new(3, 1e-6);
        assert_eq!(vol.latest(&[1.0, 2.0, 3.0]), None);
        assert_eq!(vol.warmup_periods(), 4);
    }
}
