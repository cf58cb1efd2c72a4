//! Mean reversion deviation indicator

use crate::impl_::sma::SMA;
use crate::traits::Indicator;

/// Deviation of the close from its moving average, normalized by the average:
/// `(close - sma) / sma`.
#[derive(Debug, Clone)]
pub struct MeanReversion {
    sma: SMA,
}

impl MeanReversion {
    /// Creates a new mean reversion indicator over `period` days.
    pub fn new(period: usize) -> Self {
        Self {
            sma: SMA::new(period),
        }
    }
}

impl Indicator for MeanReversion {
    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        self.sma
            .compute(closes)
            .iter()
            .zip(closes)
            .map(|(avg, close)| (close - avg) / avg)
            .collect()
    }

    fn latest(&self, closes: &[f64]) -> Option<f64> {
        let avg = self.sma.latest(closes)?;
        let close = closes.last()?;
        Some((close - avg) / avg)
    }

    fn name(&self) -> &str {
        "MEAN_REVERSION"
    }

    fn warmup_periods(&self) -> usize {
        self.sma.warmup_periods()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deviation_above_average() {
        let closes = [10.0, 10.0, 13.0];
        let mr = MeanReversion::new(3);
        // avg = 11, (13 - 11) / 11
        assert_relative_eq!(mr.latest(&closes).unwrap(), 2.0 / 11.0, epsilon = 1e-12);
        let series = mr.compute(&closes);
        assert!(series[1].is_nan());
        assert_relative_eq!(series[2], 2.0 / 11.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_series_is_zero() {
        let mr = MeanReversion::new(4);
        assert_relative_eq!(mr.latest(&[5.0; 6]).unwrap(), 0.0);
    }
}
