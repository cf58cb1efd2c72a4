//! Indicator implementations
//!
//! Contains all concrete indicator implementations.

pub mod log_volatility;
pub mod mean_reversion;
pub mod momentum;
pub mod sma;
