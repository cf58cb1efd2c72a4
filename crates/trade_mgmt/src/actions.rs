//! Lifecycle actions
//!
//! Defines the actions that lifecycle rules can produce.

use kairos_types::ExitReason;
use serde::{Deserialize, Serialize};

/// Action produced by a lifecycle rule.
///
/// At most one action is produced per instrument per day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Close the position to exactly zero
    ClosePosition {
        /// Instrument to close
        instrument: usize,
        /// Reason for closing
        reason: ExitReason,
    },

    /// Partial take-profit: keep at most `remaining` shares
    ReducePosition {
        /// Instrument to reduce
        instrument: usize,
        /// Take-profit stage reached
        stage: u8,
        /// Unsigned share count kept
        remaining: i64,
    },
}

impl Action {
    /// Creates a close action.
    #[must_use]
    pub fn close(instrument: usize, reason: ExitReason) -> Self {
        Action::ClosePosition { instrument, reason }
    }

    /// Creates a partial take-profit action.
    #[must_use]
    pub fn reduce(instrument: usize, stage: u8, remaining: i64) -> Self {
        Action::ReducePosition {
            instrument,
            stage,
            remaining,
        }
    }

    /// Checks if this is a close action.
    #[must_use]
    pub fn is_close(&self) -> bool {
        matches!(self, Action::ClosePosition { .. })
    }

    /// Gets the instrument this action targets.
    #[must_use]
    pub fn instrument(&self) -> usize {
        match self {
            Action::ClosePosition { instrument, .. } | Action::ReducePosition { instrument, .. } => {
                *instrument
            }
        }
    }

    /// Exit reason of a close action.
    #[must_use]
    pub fn exit_reason(&self) -> Option<ExitReason> {
        match self {
            Action::ClosePosition { reason, .. } => Some(*reason),
            Action::ReducePosition { .. } => None,
        }
    }
}
