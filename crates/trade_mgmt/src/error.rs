//! Trade management error types

use thiserror::Error;

/// Trade management errors
#[derive(Debug, Error)]
pub enum TradeManagementError {
    /// Instrument index outside the state book
    #[error("Instrument out of range: {0}")]
    InstrumentOutOfRange(usize),
}
