//! Trade context types for rule evaluation
//!
//! Provides read-only views and context for lifecycle rules
//! without dependencies on the sizing or signal crates.

use crate::state::InstrumentState;
use kairos_types::Direction;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of an open position for rule evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionView {
    /// Instrument index
    pub instrument: usize,
    /// Trade direction
    pub direction: Direction,
    /// Entry price
    pub entry_price: f64,
    /// Shares committed at entry
    pub initial_size: i64,
    /// Signed shares currently held
    pub current_position: i64,
    /// Take-profit stage reached
    pub take_profit_stage: u8,
    /// Day of the last position change
    pub last_trade_day: Option<usize>,
}

impl PositionView {
    /// Creates a new `PositionView`.
    pub fn new(instrument: usize, direction: Direction, entry_price: f64, size: i64) -> Self {
        Self {
            instrument,
            direction,
            entry_price,
            initial_size: size,
            current_position: direction.sign() * size,
            take_profit_stage: 0,
            last_trade_day: None,
        }
    }

    /// Builds a view of an open instrument; `None` when the instrument is flat.
    pub fn from_state(instrument: usize, state: &InstrumentState) -> Option<Self> {
        let direction = state.direction()?;
        Some(Self {
            instrument,
            direction,
            entry_price: state.entry_price,
            initial_size: state.initial_size,
            current_position: state.current_position,
            take_profit_stage: state.take_profit_stage,
            last_trade_day: state.last_trade_day,
        })
    }

    /// Sets the take-profit stage.
    pub fn with_stage(mut self, stage: u8) -> Self {
        self.take_profit_stage = stage;
        self
    }

    /// Sets the day of the last position change.
    pub fn with_last_trade_day(mut self, day: usize) -> Self {
        self.last_trade_day = Some(day);
        self
    }

    /// Days held since the last position change, as of `day`.
    pub fn days_held(&self, day: usize) -> usize {
        self.last_trade_day
            .map_or(usize::MAX, |last| day.saturating_sub(last))
    }
}

/// Market snapshot of one instrument for the current day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketView {
    /// Latest close
    pub price: f64,
    /// Floored log-return volatility
    pub volatility: f64,
    /// Direction of today's entry signal, if any
    pub entry_signal: Option<Direction>,
}

impl MarketView {
    /// Creates a market view without an entry signal.
    pub fn new(price: f64, volatility: f64) -> Self {
        Self {
            price,
            volatility,
            entry_signal: None,
        }
    }

    /// Sets today's entry signal.
    pub fn with_signal(mut self, signal: Option<Direction>) -> Self {
        self.entry_signal = signal;
        self
    }
}

/// Context for lifecycle rule evaluation.
#[derive(Debug, Clone, Copy)]
pub struct TradeContext {
    /// Current day index
    pub day: usize,
    /// Market snapshot
    pub market: MarketView,
}

impl TradeContext {
    /// Creates a new `TradeContext`.
    pub fn new(day: usize, market: MarketView) -> Self {
        Self { day, market }
    }
}
