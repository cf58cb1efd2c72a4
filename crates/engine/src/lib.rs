//! Kairos Engine
//!
//! Once-per-day target position decision for a fixed universe of
//! instruments. Orchestrates indicator computation, cross-sectional
//! selection, entry signals, sizing and the per-instrument lifecycle.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]

pub mod engine;
pub mod error;
pub mod runner;
pub mod warmup;

pub use engine::{DayReport, Decision, PositionEngine, decide};
pub use error::EngineError;
pub use runner::{parse_params, run_day_from_json};
