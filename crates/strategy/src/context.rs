//! Per-instrument context handed to signal rules.

use kairos_indicators::InstrumentIndicators;

/// Read-only view of one instrument for a single day.
#[derive(Debug, Clone, Copy)]
pub struct SignalContext<'a> {
    /// Instrument index
    pub instrument: usize,
    /// Indicators as of the latest day
    pub indicators: &'a InstrumentIndicators,
    /// Membership in the day's top-K selection
    pub selected: bool,
}

impl<'a> SignalContext<'a> {
    /// Creates a new context.
    #[must_use]
    pub fn new(instrument: usize, indicators: &'a InstrumentIndicators, selected: bool) -> Self {
        Self {
            instrument,
            indicators,
            selected,
        }
    }

    /// Latest close.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.indicators.price
    }
}
