//! Kairos Trade Management
//!
//! Per-instrument trade lifecycle for the kairos position engine.
//! Holds the persisted [`StateBook`] and applies stop-loss, staged
//! take-profit, reversal, cooldown and trim transitions to it.
//!
//! # Features
//! - Rule trait with priority ordering, first match wins
//! - Built-in rules: volatility stop-loss, take-profit ladder, reversal exit
//! - `LifecycleManager`, the only writer of instrument state
//! - Read-only context types (`PositionView`, `MarketView`, `TradeContext`)
//!
//! # Example
//! ```ignore
//! use kairos_trade_mgmt::{LifecycleManager, MarketView, StateBook};
//!
//! let lifecycle = LifecycleManager::from_params(&params);
//! let mut book = StateBook::new(n_instruments);
//!
//! // Once per day, before entries:
//! let markets: Vec<MarketView> = prices
//!     .iter()
//!     .zip(&volatilities)
//!     .map(|(&p, &v)| MarketView::new(p, v))
//!     .collect();
//! let events = lifecycle.apply_exits(&mut book, day, &markets)?;
//! ```

#![deny(clippy::all)]

pub mod actions;
pub mod context;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod rules;
pub mod state;

// Re-export main types
pub use actions::Action;
pub use context::{MarketView, PositionView, TradeContext};
pub use engine::{TradeManager, TradeManagerBuilder};
pub use error::TradeManagementError;
pub use lifecycle::{EntryGate, LifecycleEvent, LifecycleManager};
pub use rules::{
    ReversalExitRule, Rule, RuleId, RulePriority, RuleSet, StopLossRule, TakeProfitLadderRule,
};
pub use state::{InstrumentState, PositionSide, StateBook};
