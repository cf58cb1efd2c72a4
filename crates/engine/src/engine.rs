//! Daily decision orchestration.
//!
//! [`decide`] is the pure decision function: prior state and the full price
//! history in, target positions and the next state out. [`PositionEngine`]
//! wraps it for harnesses that prefer a stateful object.

use kairos_indicators::{IndicatorFrame, Selection, ranking_scores};
use kairos_portfolio::{
    CommissionFilter, FilterDecision, NeutralityBalancer, SizingContext, SizingInput,
    net_exposure, sizer_from_params,
};
use kairos_strategy::SignalGenerator;
use kairos_trade_mgmt::{EntryGate, LifecycleEvent, LifecycleManager, MarketView, StateBook};
use kairos_types::{PriceHistory, StrategyParams};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::runner::parse_params;
use crate::warmup::warmup_remaining;

/// What happened on one day, for harness logging.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayReport {
    /// Index of the day decided, `None` for an empty history
    pub day: Option<usize>,
    /// Days still missing before the first decision
    pub warmup_remaining: Option<usize>,
    /// Selected instruments, strongest first
    pub selected: Vec<usize>,
    /// State transitions in application order
    pub events: Vec<LifecycleEvent>,
    /// Net dollar exposure of the targets
    pub net_exposure: f64,
}

impl DayReport {
    /// Returns true when the day was skipped for lack of history.
    #[must_use]
    pub fn is_warming_up(&self) -> bool {
        self.warmup_remaining.is_some()
    }

    /// Events that refer to one instrument.
    pub fn events_for(&self, instrument: usize) -> impl Iterator<Item = &LifecycleEvent> {
        self.events
            .iter()
            .filter(move |event| event.instrument() == instrument)
    }

    /// Serializes the report to JSON.
    ///
    /// # Errors
    /// Returns [`EngineError::ResultSerialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(|e| EngineError::ResultSerialize(e.to_string()))
    }
}

/// Output of one daily decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Signed target share count per instrument
    pub targets: Vec<i64>,
    /// State to pass into the next call
    pub state: StateBook,
    /// Day report
    pub report: DayReport,
}

/// Decides the target positions for the latest day of `history`.
///
/// Exits are evaluated first for open positions, then entries for
/// instruments that were flat at the start of the call, then the optional
/// neutrality pass, which leaves positions inside their hold window alone. With less than [`StrategyParams::min_history`] days the
/// targets are all zero and `prior` is returned unchanged.
///
/// # Errors
/// - [`EngineError::ConfigValidation`] for out-of-range parameters.
/// - [`EngineError::InstrumentMismatch`] when `history` and `prior` disagree
///   on the instrument count.
/// - Sizing errors for non-positive prices.
pub fn decide(
    params: &StrategyParams,
    history: &PriceHistory,
    prior: &StateBook,
) -> Result<Decision, EngineError> {
    params
        .validate()
        .map_err(|e| EngineError::ConfigValidation(e.to_string()))?;

    let n_instruments = history.n_instruments();
    if n_instruments != prior.len() {
        return Err(EngineError::InstrumentMismatch {
            expected: prior.len(),
            actual: n_instruments,
        });
    }

    if let Some(remaining) = warmup_remaining(history, params) {
        return Ok(Decision {
            targets: vec![0; n_instruments],
            state: prior.clone(),
            report: DayReport {
                day: history.current_day(),
                warmup_remaining: Some(remaining),
                ..DayReport::default()
            },
        });
    }
    let day = history.current_day().unwrap_or_default();

    // Indicators and the cross-sectional barrier
    let frame = IndicatorFrame::compute(history, params)?;
    let selection = Selection::top_k(&ranking_scores(&frame, params), params.top_n);
    let signals = SignalGenerator::from_params(params).generate(&frame, &selection);

    let mut state = prior.clone();
    let flat_at_start: Vec<bool> = state.iter().map(|s| s.is_flat()).collect();
    let lifecycle = LifecycleManager::from_params(params);

    // Exits
    let markets: Vec<MarketView> = frame
        .iter()
        .zip(&signals)
        .map(|(ind, signal)| MarketView::new(ind.price, ind.volatility).with_signal(signal.direction))
        .collect();
    let mut events = lifecycle.apply_exits(&mut state, day, &markets)?;

    // Entries
    let sizer = sizer_from_params(params);
    let sizing_ctx = SizingContext::new(params.pos_limit, &frame, &selection);
    let filter = CommissionFilter::from_params(params);

    for (instrument, (ind, signal)) in frame.iter().zip(&signals).enumerate() {
        let instrument_state = state.get_mut(instrument)?;
        if !instrument_state.is_flat() {
            continue;
        }

        let direction = match lifecycle.gate_entry(instrument_state, signal.direction) {
            EntryGate::NoSignal => continue,
            EntryGate::Suppressed { remaining } => {
                tracing::debug!(instrument, remaining, "entry suppressed by cooldown");
                events.push(LifecycleEvent::CooldownSkip {
                    instrument,
                    remaining,
                });
                continue;
            }
            EntryGate::Open(direction) => direction,
        };
        if !flat_at_start[instrument] {
            continue;
        }

        let input = SizingInput {
            instrument,
            price: ind.price,
            volatility: ind.volatility,
            strength: signal.strength,
        };
        let size = sizer.size(&input, &sizing_ctx)?;
        if size == 0 {
            tracing::trace!(instrument, price = ind.price, "entry sized to zero");
            continue;
        }

        match filter.apply(instrument, 0, direction.sign() * size, ind.price) {
            FilterDecision::Accepted(_) => {
                if let Some(event) =
                    lifecycle.open_position(&mut state, instrument, direction, ind.price, size, day)?
                {
                    events.push(event);
                }
            }
            FilterDecision::Rejected { current, proposed } => {
                events.push(LifecycleEvent::Filtered {
                    instrument,
                    proposed,
                    current,
                });
            }
        }
    }

    // Neutrality
    let prices = frame.prices();
    if params.market_neutral {
        let balancer = NeutralityBalancer::new(params.neutrality_tolerance, filter);
        let held = lifecycle.held(&state, day);
        let outcome = balancer.balance_with_holds(&state.positions(), &prices, &held)?;

        for &instrument in &outcome.deferred {
            events.push(lifecycle.defer_trim(&state, instrument, day)?);
        }
        for trim in &outcome.trims {
            if let Some(event) = lifecycle.apply_trim(&mut state, trim.instrument, trim.to.abs(), day)? {
                events.push(event);
            }
        }
        events.extend(outcome.rejected.iter().map(|trim| LifecycleEvent::Filtered {
            instrument: trim.instrument,
            proposed: trim.to,
            current: trim.from,
        }));
    }

    let targets = state.positions();
    let report = DayReport {
        day: Some(day),
        warmup_remaining: None,
        selected: selection.ranked().to_vec(),
        events,
        net_exposure: net_exposure(&targets, &prices),
    };

    Ok(Decision {
        targets,
        state,
        report,
    })
}

/// Stateful wrapper around [`decide`].
///
/// Owns the [`StateBook`] across calls; `on_day` is invoked once per day
/// with the full history seen so far.
#[derive(Debug, Clone)]
pub struct PositionEngine {
    params: StrategyParams,
    state: StateBook,
    last_report: Option<DayReport>,
}

impl PositionEngine {
    /// Creates an engine with all instruments flat.
    ///
    /// # Errors
    /// Returns [`EngineError::ConfigValidation`] for out-of-range parameters.
    pub fn new(params: StrategyParams, n_instruments: usize) -> Result<Self, EngineError> {
        params
            .validate()
            .map_err(|e| EngineError::ConfigValidation(e.to_string()))?;

        tracing::info!(
            n_instruments,
            min_history = params.min_history(),
            top_n = params.top_n,
            "position engine initialized"
        );

        Ok(Self {
            params,
            state: StateBook::new(n_instruments),
            last_report: None,
        })
    }

    /// Creates an engine from a JSON parameter object.
    ///
    /// # Errors
    /// - [`EngineError::ConfigParse`] when JSON parsing fails.
    /// - [`EngineError::ConfigValidation`] for invalid parameter values.
    pub fn from_json(params_json: &str, n_instruments: usize) -> Result<Self, EngineError> {
        Self::new(parse_params(params_json)?, n_instruments)
    }

    /// Decides today's targets and commits the new state.
    ///
    /// On error the state is left untouched.
    ///
    /// # Errors
    /// See [`decide`].
    pub fn on_day(&mut self, history: &PriceHistory) -> Result<Vec<i64>, EngineError> {
        let Decision {
            targets,
            state,
            report,
        } = decide(&self.params, history, &self.state)?;
        self.state = state;
        self.last_report = Some(report);
        Ok(targets)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> &StateBook {
        &self.state
    }

    /// Strategy parameters.
    #[must_use]
    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Report of the most recent successful call.
    #[must_use]
    pub fn last_report(&self) -> Option<&DayReport> {
        self.last_report.as_ref()
    }

    /// Returns every instrument to flat and clears the last report.
    pub fn reset(&mut self) {
        self.state = StateBook::new(self.state.len());
        self.last_report = None;
    }
}
