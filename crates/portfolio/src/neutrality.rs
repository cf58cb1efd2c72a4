//! Net-exposure balancing.
//!
//! Post-hoc pass that drives `Σ position × price` toward zero by shrinking
//! the largest positions on the side of the net exposure. It plans trims
//! only; applying them to lifecycle state is up to the caller.

use crate::error::PortfolioError;
use crate::rebalance::CommissionFilter;
use serde::{Deserialize, Serialize};

/// One planned position reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trim {
    /// Instrument index
    pub instrument: usize,
    /// Signed position before
    pub from: i64,
    /// Signed position after (same sign or zero)
    pub to: i64,
}

/// Result of a balancing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceOutcome {
    /// Positions after the accepted trims
    pub positions: Vec<i64>,
    /// Accepted trims in application order
    pub trims: Vec<Trim>,
    /// Trims discarded by the commission filter
    pub rejected: Vec<Trim>,
    /// Candidates skipped because their position is held
    pub deferred: Vec<usize>,
    /// Net dollar exposure left over
    pub residual: f64,
}

/// Net dollar exposure.
#[allow(clippy::cast_precision_loss)]
pub fn net_exposure(positions: &[i64], prices: &[f64]) -> f64 {
    positions
        .iter()
        .zip(prices)
        .map(|(&pos, &price)| pos as f64 * price)
        .sum()
}

/// Iterative net-exposure balancer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeutralityBalancer {
    /// Net exposure accepted as balanced
    pub tolerance: f64,
    /// Filter applied to each trim
    pub filter: CommissionFilter,
}

impl NeutralityBalancer {
    /// Creates a balancer.
    pub fn new(tolerance: f64, filter: CommissionFilter) -> Self {
        Self { tolerance, filter }
    }

    /// Plans trims until `|net| <= tolerance` or no candidate can reduce.
    ///
    /// # Errors
    /// See [`NeutralityBalancer::balance_with_holds`].
    pub fn balance(&self, positions: &[i64], prices: &[f64]) -> Result<BalanceOutcome, PortfolioError> {
        self.balance_with_holds(positions, prices, &[])
    }

    /// Plans trims, never touching positions flagged in `held`.
    ///
    /// Each step picks the largest-notional position with the same sign as
    /// the net exposure (lowest index on ties) and cuts it by
    /// `min(|position|, floor(|net| / price))` shares. A candidate that is
    /// held, whose cut is zero, or whose trim the filter rejects is
    /// exhausted. Indices past the end of `held` count as free.
    ///
    /// # Errors
    /// Returns [`PortfolioError::LengthMismatch`] when the slices differ in
    /// length and [`PortfolioError::InvalidPrice`] for unusable prices of
    /// open positions.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn balance_with_holds(
        &self,
        positions: &[i64],
        prices: &[f64],
        held: &[bool],
    ) -> Result<BalanceOutcome, PortfolioError> {
        if positions.len() != prices.len() {
            return Err(PortfolioError::LengthMismatch {
                positions: positions.len(),
                prices: prices.len(),
            });
        }
        for (instrument, (&pos, &price)) in positions.iter().zip(prices).enumerate() {
            if pos != 0 {
                PortfolioError::check_price(instrument, price)?;
            }
        }

        let mut current = positions.to_vec();
        let mut exhausted = vec![false; current.len()];
        let mut trims = Vec::new();
        let mut rejected = Vec::new();
        let mut deferred = Vec::new();

        loop {
            let net = net_exposure(&current, prices);
            if net.abs() <= self.tolerance {
                break;
            }
            let net_sign: i64 = if net > 0.0 { 1 } else { -1 };

            let mut candidate: Option<(usize, f64)> = None;
            for (idx, &pos) in current.iter().enumerate() {
                if exhausted[idx] || pos.signum() != net_sign {
                    continue;
                }
                let notional = (pos as f64 * prices[idx]).abs();
                if candidate.is_none_or(|(_, best)| notional > best) {
                    candidate = Some((idx, notional));
                }
            }
            let Some((idx, _)) = candidate else {
                break;
            };
            if held.get(idx).copied().unwrap_or(false) {
                exhausted[idx] = true;
                deferred.push(idx);
                continue;
            }

            let from = current[idx];
            let price = prices[idx];
            let cut = from.abs().min((net.abs() / price).floor() as i64);
            if cut < 1 {
                exhausted[idx] = true;
                continue;
            }

            let trim = Trim {
                instrument: idx,
                from,
                to: from - net_sign * cut,
            };
            if !self.filter.accepts(trim.from, trim.to, price) {
                exhausted[idx] = true;
                rejected.push(trim);
                continue;
            }

            tracing::trace!(instrument = idx, from, to = trim.to, net, "neutrality trim");
            current[idx] = trim.to;
            trims.push(trim);
        }

        let residual = net_exposure(&current, prices);
        Ok(BalanceOutcome {
            positions: current,
            trims,
            rejected,
            deferred,
            residual,
        })
    }
}
