//! Kairos Strategy
//!
//! Signal layer of the kairos position engine.
//! Turns the day's indicators and cross-sectional selection into one
//! discrete entry signal per instrument.
//!
//! # Features
//! - [`SignalRule`] trait for entry rules
//! - [`SignalContext`] giving a rule one instrument's view of the day
//! - [`TrendMomentumRule`]: moving-average alignment + ranked momentum + confirmation
//! - [`SignalGenerator`] evaluating a rule across the universe
//!
//! # Example
//! ```ignore
//! use kairos_strategy::{SignalGenerator, TrendMomentumRule};
//!
//! let generator = SignalGenerator::new(TrendMomentumRule::from_params(&params));
//! let signals = generator.generate(&frame, &selection);
//! ```

#![deny(clippy::all)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod signals;
pub mod traits;

pub use context::SignalContext;
pub use signals::{EntrySignal, SignalGenerator, TrendMomentumRule};
pub use traits::SignalRule;
