//! Lifecycle manager
//!
//! Applies rule actions, entries and neutrality trims to the [`StateBook`]
//! and records each transition as a [`LifecycleEvent`].

use crate::actions::Action;
use crate::context::{MarketView, PositionView, TradeContext};
use crate::engine::TradeManager;
use crate::error::TradeManagementError;
use crate::state::{InstrumentState, StateBook};
use kairos_types::{Direction, ExitReason, StrategyParams};
use serde::{Deserialize, Serialize};

/// One state transition, reported to the harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Flat instrument opened a position
    Entered {
        /// Instrument index
        instrument: usize,
        /// Trade direction
        direction: Direction,
        /// Entry price
        price: f64,
        /// Unsigned shares committed
        size: i64,
    },
    /// Partial take-profit stage reached
    PartialTakeProfit {
        /// Instrument index
        instrument: usize,
        /// Stage reached
        stage: u8,
        /// Signed position before
        from: i64,
        /// Signed position after
        to: i64,
    },
    /// Position closed to zero
    Exited {
        /// Instrument index
        instrument: usize,
        /// Why the position closed
        reason: ExitReason,
        /// Signed position before the close
        closed: i64,
    },
    /// Entry signal consumed by the cooldown
    CooldownSkip {
        /// Instrument index
        instrument: usize,
        /// Counter after decrement
        remaining: u32,
    },
    /// Neutrality pass reduced a position
    Trimmed {
        /// Instrument index
        instrument: usize,
        /// Signed position before
        from: i64,
        /// Signed position after
        to: i64,
    },
    /// Neutrality trim skipped while the position is inside its hold window
    TrimDeferred {
        /// Instrument index
        instrument: usize,
        /// Days since the last position change
        days_held: usize,
        /// Configured hold period
        hold_period: usize,
    },
    /// Proposal discarded by the minimum trade value filter
    Filtered {
        /// Instrument index
        instrument: usize,
        /// Signed position proposed
        proposed: i64,
        /// Signed position kept
        current: i64,
    },
}

impl LifecycleEvent {
    /// Instrument the event refers to.
    pub fn instrument(&self) -> usize {
        match self {
            LifecycleEvent::Entered { instrument, .. }
            | LifecycleEvent::PartialTakeProfit { instrument, .. }
            | LifecycleEvent::Exited { instrument, .. }
            | LifecycleEvent::CooldownSkip { instrument, .. }
            | LifecycleEvent::Trimmed { instrument, .. }
            | LifecycleEvent::TrimDeferred { instrument, .. }
            | LifecycleEvent::Filtered { instrument, .. } => *instrument,
        }
    }

    /// Exit reason of a close event.
    pub fn exit_reason(&self) -> Option<ExitReason> {
        match self {
            LifecycleEvent::Exited { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Outcome of the entry gate for a flat instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryGate {
    /// No qualifying signal today
    NoSignal,
    /// Signal consumed by the cooldown; counter already decremented
    Suppressed {
        /// Counter after decrement
        remaining: u32,
    },
    /// Entry may proceed in this direction
    Open(Direction),
}

/// Sole writer of the [`StateBook`].
#[derive(Debug, Default)]
pub struct LifecycleManager {
    manager: TradeManager,
    cooldown_length: u32,
    hold_period: usize,
}

impl LifecycleManager {
    /// Creates a lifecycle manager around a rule engine, with no hold period.
    pub fn new(manager: TradeManager, cooldown_length: u32) -> Self {
        Self {
            manager,
            cooldown_length,
            hold_period: 0,
        }
    }

    /// Sets the minimum days between non-risk position changes.
    #[must_use]
    pub fn with_hold_period(mut self, hold_period: usize) -> Self {
        self.hold_period = hold_period;
        self
    }

    /// Creates the manager configured by the strategy parameters.
    pub fn from_params(params: &StrategyParams) -> Self {
        Self::new(TradeManager::from_params(params), params.cooldown_length)
            .with_hold_period(params.hold_period)
    }

    /// Underlying rule engine.
    pub fn trade_manager(&self) -> &TradeManager {
        &self.manager
    }

    /// Runs exit rules on every open position.
    ///
    /// `markets` holds one view per instrument. Returns the events of the
    /// transitions applied, in instrument order.
    ///
    /// # Errors
    /// Returns [`TradeManagementError::InstrumentOutOfRange`] when `markets`
    /// is shorter than the book.
    pub fn apply_exits(
        &self,
        book: &mut StateBook,
        day: usize,
        markets: &[MarketView],
    ) -> Result<Vec<LifecycleEvent>, TradeManagementError> {
        let mut events = Vec::new();

        for instrument in 0..book.len() {
            let Some(position) = PositionView::from_state(instrument, book.get(instrument)?) else {
                continue;
            };
            let market = markets
                .get(instrument)
                .copied()
                .ok_or(TradeManagementError::InstrumentOutOfRange(instrument))?;
            let ctx = TradeContext::new(day, market);

            if let Some(action) = self.manager.evaluate(&ctx, &position)
                && let Some(event) = self.apply_action(book, day, action)?
            {
                events.push(event);
            }
        }

        Ok(events)
    }

    /// Applies one rule action.
    ///
    /// A stage whose kept size is not below the current position (after a
    /// neutrality trim) records the stage but trades nothing and reports no event.
    ///
    /// # Errors
    /// Returns [`TradeManagementError::InstrumentOutOfRange`] for unknown instruments.
    pub fn apply_action(
        &self,
        book: &mut StateBook,
        day: usize,
        action: Action,
    ) -> Result<Option<LifecycleEvent>, TradeManagementError> {
        let state = book.get_mut(action.instrument())?;
        let from = state.current_position;

        match action {
            Action::ClosePosition { instrument, reason } => {
                state.close(day, self.cooldown_length);
                tracing::info!(
                    instrument,
                    reason = reason.as_str(),
                    closed = from,
                    "position closed"
                );
                Ok(Some(LifecycleEvent::Exited {
                    instrument,
                    reason,
                    closed: from,
                }))
            }
            Action::ReducePosition {
                instrument,
                stage,
                remaining,
            } => {
                if !state.reduce_to(stage, remaining, day) {
                    tracing::trace!(instrument, stage, position = from, "stage reached below kept size");
                    return Ok(None);
                }
                let to = state.current_position;
                tracing::debug!(instrument, stage, from, to, "take-profit stage");
                Ok(Some(LifecycleEvent::PartialTakeProfit {
                    instrument,
                    stage,
                    from,
                    to,
                }))
            }
        }
    }

    /// Gates a signal for a flat instrument through the cooldown.
    ///
    /// A qualifying signal during cooldown decrements the counter by one and
    /// is dropped.
    pub fn gate_entry(&self, state: &mut InstrumentState, signal: Option<Direction>) -> EntryGate {
        let Some(direction) = signal else {
            return EntryGate::NoSignal;
        };
        if state.cooldown_counter > 0 {
            state.cooldown_counter -= 1;
            return EntryGate::Suppressed {
                remaining: state.cooldown_counter,
            };
        }
        EntryGate::Open(direction)
    }

    /// Opens a position on a flat instrument.
    ///
    /// Returns `None` when the instrument is not flat or `size` is not positive.
    ///
    /// # Errors
    /// Returns [`TradeManagementError::InstrumentOutOfRange`] for unknown instruments.
    pub fn open_position(
        &self,
        book: &mut StateBook,
        instrument: usize,
        direction: Direction,
        price: f64,
        size: i64,
        day: usize,
    ) -> Result<Option<LifecycleEvent>, TradeManagementError> {
        let state = book.get_mut(instrument)?;
        if !state.is_flat() || size <= 0 {
            return Ok(None);
        }

        state.open(direction, price, size, day);
        tracing::debug!(instrument, ?direction, price, size, "position opened");
        Ok(Some(LifecycleEvent::Entered {
            instrument,
            direction,
            price,
            size,
        }))
    }

    /// Instruments whose open position is still inside the hold window on `day`.
    pub fn held(&self, book: &StateBook, day: usize) -> Vec<bool> {
        book.iter()
            .map(|state| state.is_held(day, self.hold_period))
            .collect()
    }

    /// Reports a neutrality trim skipped because of the hold window.
    ///
    /// # Errors
    /// Returns [`TradeManagementError::InstrumentOutOfRange`] for unknown instruments.
    pub fn defer_trim(
        &self,
        book: &StateBook,
        instrument: usize,
        day: usize,
    ) -> Result<LifecycleEvent, TradeManagementError> {
        let days_held = book.get(instrument)?.days_since_trade(day).unwrap_or_default();
        tracing::debug!(instrument, days_held, hold_period = self.hold_period, "trim deferred by hold period");
        Ok(LifecycleEvent::TrimDeferred {
            instrument,
            days_held,
            hold_period: self.hold_period,
        })
    }

    /// Reduces a position to `abs_size` shares for the neutrality pass.
    ///
    /// A trim to zero resets the instrument to flat without cooldown.
    ///
    /// # Errors
    /// Returns [`TradeManagementError::InstrumentOutOfRange`] for unknown instruments.
    pub fn apply_trim(
        &self,
        book: &mut StateBook,
        instrument: usize,
        abs_size: i64,
        day: usize,
    ) -> Result<Option<LifecycleEvent>, TradeManagementError> {
        let state = book.get_mut(instrument)?;
        let from = state.current_position;
        if state.is_flat() || abs_size >= from.abs() {
            return Ok(None);
        }

        if abs_size <= 0 {
            state.close(day, 0);
            tracing::trace!(instrument, from, "position trimmed to flat");
            return Ok(Some(LifecycleEvent::Exited {
                instrument,
                reason: ExitReason::Rebalance,
                closed: from,
            }));
        }

        let stage = state.take_profit_stage;
        state.reduce_to(stage, abs_size, day);
        tracing::trace!(instrument, from, to = state.current_position, "position trimmed");
        Ok(Some(LifecycleEvent::Trimmed {
            instrument,
            from,
            to: state.current_position,
        }))
    }
}
