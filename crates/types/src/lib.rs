//! Kairos Types
//!
//! Core data structures for the kairos position engine.
//! This crate provides the price history matrix, trade directions,
//! exit reasons, strategy parameters and the shared error type.

#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod history;
pub mod signal;
pub mod trade;

// Re-export main types for convenience
pub use config::{RankingScore, SizingMode, StopLossMode, StrategyParams, TakeProfitLevel};
pub use error::CoreError;
pub use history::PriceHistory;
pub use signal::Direction;
pub use trade::ExitReason;
