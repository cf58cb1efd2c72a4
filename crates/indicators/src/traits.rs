//! Indicator trait.

/// Trait for single-output indicators over a closing price series.
///
/// `compute` returns a series of the same length as the input with
/// `f64::NAN` before the warm-up period. `latest` evaluates only the most
/// recent value, which is all the daily decision needs.
pub trait Indicator: Send + Sync {
    /// Computes the indicator for every day of the series.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;

    /// Value as of the last day, `None` during warm-up.
    fn latest(&self, closes: &[f64]) -> Option<f64> {
        self.compute(closes).last().copied().filter(|v| v.is_finite())
    }

    /// Name of the indicator (e.g., "SMA", "MOMENTUM").
    fn name(&self) -> &str;

    /// Minimum number of days required for valid output.
    fn warmup_periods(&self) -> usize;
}
