//! Per-instrument lifecycle state.
//!
//! One [`InstrumentState`] per instrument, held in a [`StateBook`] that the
//! caller owns and passes into every daily decision. Only the lifecycle
//! layer mutates it.

use crate::error::TradeManagementError;
use kairos_types::Direction;
use serde::{Deserialize, Serialize};

/// Side of the position currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    /// No position
    #[default]
    Flat,
    /// Long position
    Long,
    /// Short position
    Short,
}

impl PositionSide {
    /// Direction of an open side, `None` when flat.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            PositionSide::Flat => None,
            PositionSide::Long => Some(Direction::Long),
            PositionSide::Short => Some(Direction::Short),
        }
    }
}

impl From<Direction> for PositionSide {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Long => PositionSide::Long,
            Direction::Short => PositionSide::Short,
        }
    }
}

/// Lifecycle state of one instrument.
///
/// Invariant: `position_side == Flat` iff `entry_price == 0` iff
/// `current_position == 0`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstrumentState {
    /// Side of the open position
    pub position_side: PositionSide,
    /// Price at which the open position was established (0 when flat)
    pub entry_price: f64,
    /// Highest take-profit stage reached by the open trade
    pub take_profit_stage: u8,
    /// Unsigned share count committed at entry
    pub initial_size: i64,
    /// Qualifying entry signals still to suppress
    pub cooldown_counter: u32,
    /// Day the position was last opened, resized or closed
    pub last_trade_day: Option<usize>,
    /// Signed share count currently held
    pub current_position: i64,
}

impl InstrumentState {
    /// Returns true when no position is open.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.position_side == PositionSide::Flat
    }

    /// Direction of the open position.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.position_side.direction()
    }

    /// Days elapsed since the last position change; `None` if never traded.
    #[must_use]
    pub fn days_since_trade(&self, day: usize) -> Option<usize> {
        self.last_trade_day.map(|last| day.saturating_sub(last))
    }

    /// Checks the flat/entry/position invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let flat = self.is_flat();
        let no_entry = self.entry_price == 0.0;
        let no_position = self.current_position == 0;
        let signed_ok = match self.direction() {
            Some(direction) => self.current_position.signum() == direction.sign(),
            None => true,
        };
        flat == no_entry && flat == no_position && signed_ok
    }

    /// Opens a new trade of `size` shares.
    ///
    /// `size` must be positive; the caller handles zero-size proposals.
    pub(crate) fn open(&mut self, direction: Direction, price: f64, size: i64, day: usize) {
        self.position_side = direction.into();
        self.entry_price = price;
        self.take_profit_stage = 0;
        self.initial_size = size;
        self.current_position = direction.sign() * size;
        self.last_trade_day = Some(day);
    }

    /// Returns true while an open position is inside its hold window.
    ///
    /// Only non-risk changes (reversal exits, neutrality trims) honor it.
    #[must_use]
    pub fn is_held(&self, day: usize, hold_period: usize) -> bool {
        !self.is_flat() && self.days_since_trade(day).is_some_and(|held| held < hold_period)
    }

    /// Shrinks the open position to at most `abs_size` shares and records `stage`.
    ///
    /// Returns true when the share count changed; only then does the trade
    /// day move.
    pub(crate) fn reduce_to(&mut self, stage: u8, abs_size: i64, day: usize) -> bool {
        let Some(direction) = self.direction() else {
            return false;
        };
        let kept = self.current_position.abs().min(abs_size.max(0));
        self.take_profit_stage = self.take_profit_stage.max(stage);
        if kept == self.current_position.abs() {
            return false;
        }
        self.current_position = direction.sign() * kept;
        self.last_trade_day = Some(day);
        true
    }

    /// Closes the trade, resetting every per-trade field.
    pub(crate) fn close(&mut self, day: usize, cooldown: u32) {
        self.position_side = PositionSide::Flat;
        self.entry_price = 0.0;
        self.take_profit_stage = 0;
        self.initial_size = 0;
        self.current_position = 0;
        self.cooldown_counter = cooldown;
        self.last_trade_day = Some(day);
    }
}

/// Lifecycle state of every instrument, indexed by instrument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateBook {
    instruments: Vec<InstrumentState>,
}

impl StateBook {
    /// Creates an all-flat book for `n_instruments` instruments.
    #[must_use]
    pub fn new(n_instruments: usize) -> Self {
        Self {
            instruments: vec![InstrumentState::default(); n_instruments],
        }
    }

    /// Number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Returns true when the book holds no instrument.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// State of one instrument.
    ///
    /// # Errors
    /// Returns [`TradeManagementError::InstrumentOutOfRange`] for unknown indices.
    pub fn get(&self, instrument: usize) -> Result<&InstrumentState, TradeManagementError> {
        self.instruments
            .get(instrument)
            .ok_or(TradeManagementError::InstrumentOutOfRange(instrument))
    }

    /// Mutable state of one instrument.
    ///
    /// # Errors
    /// Returns [`TradeManagementError::InstrumentOutOfRange`] for unknown indices.
    pub fn get_mut(
        &mut self,
        instrument: usize,
    ) -> Result<&mut InstrumentState, TradeManagementError> {
        self.instruments
            .get_mut(instrument)
            .ok_or(TradeManagementError::InstrumentOutOfRange(instrument))
    }

    /// Iterates over all instrument states in index order.
    pub fn iter(&self) -> impl Iterator<Item = &InstrumentState> {
        self.instruments.iter()
    }

    /// Signed positions of all instruments.
    #[must_use]
    pub fn positions(&self) -> Vec<i64> {
        self.instruments.iter().map(|s| s.current_position).collect()
    }

    /// Returns true when every instrument satisfies the flat invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.instruments.iter().all(InstrumentState::is_consistent)
    }
}
