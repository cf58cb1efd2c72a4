//! # Kairos Portfolio
//!
//! Position sizing and portfolio-level adjustments for the kairos position engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Sizing**: fixed, inverse-volatility and strength-scaled models, all
//!   capped at `floor(pos_limit / price)` shares
//! - **Commission Filter**: discards changes whose dollar value does not
//!   exceed the minimum trade value
//! - **Neutrality**: post-hoc balancing of net dollar exposure
//!
//! ## Example
//!
//! ```rust
//! use kairos_portfolio::{CommissionFilter, NeutralityBalancer};
//!
//! let balancer = NeutralityBalancer::new(100.0, CommissionFilter::new(0.0));
//! let outcome = balancer.balance(&[100, 150, -100], &[10.0, 20.0, 10.0]).unwrap();
//! assert_eq!(outcome.positions, vec![100, 0, -100]);
//! ```

#![deny(clippy::all)]

pub mod error;
pub mod neutrality;
pub mod rebalance;
pub mod sizing;

// Re-exports for convenience
pub use error::PortfolioError;
pub use neutrality::{BalanceOutcome, NeutralityBalancer, Trim, net_exposure};
pub use rebalance::{CommissionFilter, FilterDecision};
pub use sizing::{
    FixedSizer, InverseVolatilitySizer, PositionSizer, SizingContext, SizingInput,
    StrengthInverseVolatilitySizer, dollar_cap_shares, inverse_volatility_sum, sizer_from_params,
};
