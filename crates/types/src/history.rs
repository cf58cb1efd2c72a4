//! Append-only closing price matrix.

use crate::error::CoreError;

/// Closing prices, one row per instrument, one column per trading day.
///
/// Every row has the same length. Days are appended with [`push_day`]
/// and never rewritten.
///
/// [`push_day`]: PriceHistory::push_day
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct PriceHistory {
    rows: Vec<Vec<f64>>,
    n_days: usize,
}

impl PriceHistory {
    /// Creates an empty history for `n_instruments` instruments.
    #[must_use]
    pub fn new(n_instruments: usize) -> Self {
        Self {
            rows: vec![Vec::new(); n_instruments],
            n_days: 0,
        }
    }

    /// Builds a history from per-instrument rows.
    ///
    /// # Errors
    /// Returns [`CoreError::Data`] if the rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, CoreError> {
        let n_days = rows.first().map_or(0, Vec::len);
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_days) {
            return Err(CoreError::Data(format!(
                "instrument {idx} has {} days, expected {n_days}",
                row.len()
            )));
        }
        Ok(Self { rows, n_days })
    }

    /// Appends one day of closing prices.
    ///
    /// # Errors
    /// Returns [`CoreError::Data`] if `closes` does not hold one price per instrument.
    pub fn push_day(&mut self, closes: &[f64]) -> Result<(), CoreError> {
        if closes.len() != self.rows.len() {
            return Err(CoreError::Data(format!(
                "expected {} closes, got {}",
                self.rows.len(),
                closes.len()
            )));
        }
        for (row, &close) in self.rows.iter_mut().zip(closes) {
            row.push(close);
        }
        self.n_days += 1;
        Ok(())
    }

    /// Number of instruments (rows).
    #[must_use]
    pub fn n_instruments(&self) -> usize {
        self.rows.len()
    }

    /// Number of trading days observed (columns).
    #[must_use]
    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Returns true when no day has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_days == 0
    }

    /// Full closing price series of one instrument.
    #[must_use]
    pub fn series(&self, instrument: usize) -> &[f64] {
        self.rows.get(instrument).map_or(&[], Vec::as_slice)
    }

    /// Most recent closing price of one instrument.
    #[must_use]
    pub fn last_close(&self, instrument: usize) -> Option<f64> {
        self.series(instrument).last().copied()
    }

    /// Most recent closing prices of all instruments.
    ///
    /// Empty histories yield an empty vector.
    #[must_use]
    pub fn last_closes(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.last().copied()).collect()
    }

    /// Index of the most recent day, if any.
    #[must_use]
    pub fn current_day(&self) -> Option<usize> {
        self.n_days.checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = PriceHistory::from_rows(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, CoreError::Data(_)));
    }

    #[test]
    fn test_push_day_appends_column() {
        let mut history = PriceHistory::new(2);
        assert!(history.is_empty());
        assert_eq!(history.current_day(), None);

        history.push_day(&[10.0, 20.0]).unwrap();
        history.push_day(&[11.0, 19.0]).unwrap();

        assert_eq!(history.n_days(), 2);
        assert_eq!(history.series(0), &[10.0, 11.0]);
        assert_eq!(history.last_close(1), Some(19.0));
        assert_eq!(history.last_closes(), vec![11.0, 19.0]);
        assert_eq!(history.current_day(), Some(1));
    }

    #[test]
    fn test_push_day_rejects_wrong_width() {
        let mut history = PriceHistory::new(3);
        assert!(history.push_day(&[1.0, 2.0]).is_err());
        assert_eq!(history.n_days(), 0);
    }

    #[test]
    fn test_series_out_of_range_is_empty() {
        let history = PriceHistory::from_rows(vec![vec![1.0]]).unwrap();
        assert!(history.series(5).is_empty());
        assert_eq!(history.last_close(5), None);
    }
}
