//! Error types for the portfolio crate.

use thiserror::Error;

/// Errors that can occur during sizing and rebalancing.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// Price cannot be used to size a position
    #[error("invalid price for instrument {instrument}: {price}")]
    InvalidPrice {
        /// Instrument index
        instrument: usize,
        /// Offending price
        price: f64,
    },

    /// Positions and prices disagree on the instrument count
    #[error("length mismatch: {positions} positions, {prices} prices")]
    LengthMismatch {
        /// Number of positions
        positions: usize,
        /// Number of prices
        prices: usize,
    },
}

impl PortfolioError {
    /// Checks a price is finite and strictly positive.
    ///
    /// # Errors
    /// Returns [`PortfolioError::InvalidPrice`] otherwise.
    pub fn check_price(instrument: usize, price: f64) -> Result<f64, Self> {
        if price.is_finite() && price > 0.0 {
            Ok(price)
        } else {
            Err(Self::InvalidPrice { instrument, price })
        }
    }
}
