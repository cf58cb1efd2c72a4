//! Simple Moving Average (SMA) indicator

use crate::traits::Indicator;

/// Simple Moving Average
///
/// Calculates the arithmetic mean of the last N closes.
#[derive(Debug, Clone)]
pub struct SMA {
    /// Number of periods for the moving average
    pub period: usize,
}

impl SMA {
    /// Creates a new SMA indicator with the given period.
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for SMA {
    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let len = closes.len();
        let mut result = vec![f64::NAN; len];

        if len < self.period || self.period == 0 {
            return result;
        }

        // Calculate initial sum
        let mut sum: f64 = closes[..self.period].iter().sum();
        result[self.period - 1] = sum / self.period as f64;

        // Rolling calculation
        for i in self.period..len {
            sum += closes[i] - closes[i - self.period];
            result[i] = sum / self.period as f64;
        }

        result
    }

    fn latest(&self, closes: &[f64]) -> Option<f64> {
        if self.period == 0 || closes.len() < self.period {
            return None;
        }
        let tail = &closes[closes.len() - self.period..];
        Some(tail.iter().sum::<f64>() / self.period as f64)
    }

    fn name(&self) -> &str {
        "SMA"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}
