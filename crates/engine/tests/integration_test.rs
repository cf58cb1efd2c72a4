//! Integration tests for the position engine.
//!
//! Tests cover:
//! - Warm-up short-circuit (zeros, no state change)
//! - Trend entry sizing and the flat control instrument
//! - Staged take-profit, full exit and cooldown
//! - Stop-loss exit followed by a suppressed re-entry
//! - Commission filter and instrument count validation
//! - Net-exposure balancing
//! - Hold period: deferred trims and reversal exits, stop-loss inside the window

use kairos_engine::{DayReport, EngineError, PositionEngine, decide, run_day_from_json};
use kairos_trade_mgmt::{LifecycleEvent, PositionSide, StateBook};
use kairos_types::{Direction, ExitReason, PriceHistory, StopLossMode, StrategyParams};

// ============================================================================
// HELPERS
// ============================================================================

/// Geometric series: `start × (1 + daily)^day`.
fn series(start: f64, daily: f64, days: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(days);
    let mut price = start;
    for _ in 0..days {
        out.push(price);
        price *= 1.0 + daily;
    }
    out
}

fn history_from(rows: &[Vec<f64>], days: usize) -> PriceHistory {
    PriceHistory::from_rows(rows.iter().map(|r| r[..days].to_vec()).collect()).unwrap()
}

/// Runs the engine once per day over every prefix of `rows`.
fn run_days(engine: &mut PositionEngine, rows: &[Vec<f64>]) -> Vec<Vec<i64>> {
    let days = rows[0].len();
    (1..=days)
        .map(|n| engine.on_day(&history_from(rows, n)).unwrap())
        .collect()
}

/// Like [`run_days`], also keeping each day's report.
fn run_days_with_reports(engine: &mut PositionEngine, rows: &[Vec<f64>]) -> Vec<(Vec<i64>, DayReport)> {
    let days = rows[0].len();
    (1..=days)
        .map(|n| {
            let targets = engine.on_day(&history_from(rows, n)).unwrap();
            (targets, engine.last_report().unwrap().clone())
        })
        .collect()
}

/// Rising 27 days, then a crash to 100 that holds for `tail` days.
fn rise_then_crash(tail: usize) -> Vec<f64> {
    let mut prices = series(100.0, 0.01, 27);
    prices.extend(std::iter::repeat_n(100.0, tail));
    prices
}

fn cap_shares(price: f64) -> i64 {
    (10_000.0 / price).floor() as i64
}

// ============================================================================
// WARM-UP
// ============================================================================

#[test]
fn test_warmup_returns_zero_vector_without_state_change() {
    let rows = vec![series(100.0, 0.01, 26), vec![50.0; 26]];
    let mut engine = PositionEngine::new(StrategyParams::default(), 2).unwrap();

    for targets in run_days(&mut engine, &rows) {
        assert_eq!(targets, vec![0, 0]);
    }
    assert_eq!(engine.state(), &StateBook::new(2));
    assert!(engine.last_report().unwrap().is_warming_up());
}

// ============================================================================
// ENTRIES
// ============================================================================

#[test]
fn test_rising_instrument_goes_long_flat_instrument_stays_flat() {
    let rows = vec![series(100.0, 0.01, 30), vec![50.0; 30]];
    let mut engine = PositionEngine::new(StrategyParams::default(), 2).unwrap();
    let daily = run_days(&mut engine, &rows);

    // First decision on the 27th day
    let entry_price = rows[0][26];
    let expected = cap_shares(entry_price);
    for (day, targets) in daily.iter().enumerate() {
        assert_eq!(targets[1], 0, "flat instrument traded on day {day}");
        if day < 26 {
            assert_eq!(targets[0], 0);
        } else {
            assert_eq!(targets[0], expected, "day {day}");
        }
    }

    let state = engine.state().get(0).unwrap();
    assert_eq!(state.position_side, PositionSide::Long);
    assert_eq!(state.entry_price, entry_price);
    assert_eq!(state.initial_size, expected);
    assert_eq!(state.last_trade_day, Some(26));
}

#[test]
fn test_falling_instrument_goes_short() {
    let rows = vec![vec![50.0; 27], series(100.0, -0.01, 27)];
    let decision = decide(
        &StrategyParams::default(),
        &history_from(&rows, 27),
        &StateBook::new(2),
    )
    .unwrap();

    assert_eq!(decision.targets, vec![0, -cap_shares(rows[1][26])]);
    assert_eq!(
        decision.state.get(1).unwrap().direction(),
        Some(Direction::Short)
    );
}

#[test]
fn test_top_n_excludes_weaker_momentum() {
    // Both rise, the faster one wins the single slot
    let rows = vec![series(100.0, 0.01, 27), series(100.0, 0.02, 27)];
    let params = StrategyParams {
        top_n: 1,
        ..StrategyParams::default()
    };
    let decision = decide(&params, &history_from(&rows, 27), &StateBook::new(2)).unwrap();

    assert_eq!(decision.targets[0], 0);
    assert_eq!(decision.targets[1], cap_shares(rows[1][26]));
    assert_eq!(decision.report.selected, vec![1]);
}

// ============================================================================
// TAKE-PROFIT
// ============================================================================

#[test]
fn test_full_take_profit_at_eleven_percent() {
    let mut rows = vec![series(100.0, 0.01, 27), vec![50.0; 27]];
    let mut engine = PositionEngine::new(StrategyParams::default(), 2).unwrap();
    run_days(&mut engine, &rows);

    let entry = engine.state().get(0).unwrap().entry_price;
    assert!(entry > 0.0);

    rows[0].push(entry * 1.11);
    rows[1].push(50.0);
    let targets = engine.on_day(&history_from(&rows, 28)).unwrap();

    assert_eq!(targets[0], 0);
    let state = engine.state().get(0).unwrap();
    assert_eq!(state.position_side, PositionSide::Flat);
    assert_eq!(state.take_profit_stage, 0);
    assert_eq!(state.entry_price, 0.0);
    assert!(engine.state().is_consistent());

    let report = engine.last_report().unwrap();
    let exits: Vec<_> = report.events_for(0).filter_map(LifecycleEvent::exit_reason).collect();
    assert_eq!(exits, vec![ExitReason::TakeProfit]);
}

#[test]
fn test_staged_take_profit_then_cooldown_then_reentry() {
    let rows = vec![series(100.0, 0.01, 39), vec![50.0; 39]];
    let mut engine = PositionEngine::new(StrategyParams::default(), 2).unwrap();
    let daily = run_days(&mut engine, &rows);

    let initial = cap_shares(rows[0][26]);
    let third = (initial as f64 / 3.0).round() as i64;

    // +4.06% after four days: untouched
    assert_eq!(daily[30][0], initial);
    // +5.10% on day 31: straight to stage 2
    assert_eq!(daily[31][0], third);
    // +10.46% on day 36: full exit, same-day signal consumed by the cooldown
    assert_eq!(daily[35][0], third);
    assert_eq!(daily[36][0], 0);
    // Cooldown spent: re-entry on the next signal
    assert_eq!(daily[37][0], cap_shares(rows[0][37]));
    assert_eq!(daily[38][0], cap_shares(rows[0][37]));
}

// ============================================================================
// STOP-LOSS AND COOLDOWN
// ============================================================================

#[test]
fn test_stop_loss_then_cooldown_suppresses_identical_signal() {
    let mut rows = vec![series(100.0, 0.01, 27), vec![50.0; 27]];
    let mut engine = PositionEngine::new(StrategyParams::default(), 2).unwrap();
    run_days(&mut engine, &rows);
    let entry = engine.state().get(0).unwrap().entry_price;
    assert!(engine.state().get(0).unwrap().current_position > 0);

    // 5% drop: far beyond one volatility
    rows[0].push(entry * 0.95);
    rows[1].push(50.0);
    let targets = engine.on_day(&history_from(&rows, 28)).unwrap();
    assert_eq!(targets[0], 0);
    let report = engine.last_report().unwrap();
    let exits: Vec<_> = report.events_for(0).filter_map(LifecycleEvent::exit_reason).collect();
    assert_eq!(exits, vec![ExitReason::StopLoss]);
    assert_eq!(engine.state().get(0).unwrap().cooldown_counter, 1);

    // Strong rebound re-triggers the long entry rule
    rows[0].push(entry * 1.2);
    rows[1].push(50.0);
    let targets = engine.on_day(&history_from(&rows, 29)).unwrap();
    assert_eq!(targets[0], 0);
    assert_eq!(engine.state().get(0).unwrap().cooldown_counter, 0);
    assert!(
        engine
            .last_report()
            .unwrap()
            .events
            .contains(&LifecycleEvent::CooldownSkip {
                instrument: 0,
                remaining: 0
            })
    );

    // Next qualifying signal trades
    rows[0].push(entry * 1.25);
    rows[1].push(50.0);
    let targets = engine.on_day(&history_from(&rows, 30)).unwrap();
    assert_eq!(targets[0], cap_shares(entry * 1.25));
}

#[test]
fn test_legacy_stop_never_fires_on_realistic_drop() {
    let mut rows = vec![series(100.0, 0.01, 27), vec![50.0; 27]];
    let params = StrategyParams {
        stop_loss_mode: StopLossMode::LegacyOffset,
        ..StrategyParams::default()
    };
    let mut engine = PositionEngine::new(params, 2).unwrap();
    run_days(&mut engine, &rows);
    let held = engine.state().get(0).unwrap().current_position;

    let entry = engine.state().get(0).unwrap().entry_price;
    rows[0].push(entry * 0.5);
    rows[1].push(50.0);
    let targets = engine.on_day(&history_from(&rows, 28)).unwrap();
    assert_eq!(targets[0], held);
}

// ============================================================================
// COMMISSION FILTER
// ============================================================================

#[test]
fn test_commission_filter_keeps_previous_position() {
    let rows = vec![series(100.0, 0.01, 27), vec![50.0; 27]];
    let params = StrategyParams {
        commission: 0.6,
        ..StrategyParams::default()
    };
    let decision = decide(&params, &history_from(&rows, 27), &StateBook::new(2)).unwrap();

    assert_eq!(decision.targets, vec![0, 0]);
    assert!(decision.state.get(0).unwrap().is_flat());
    assert!(matches!(
        decision.report.events.as_slice(),
        [LifecycleEvent::Filtered {
            instrument: 0,
            current: 0,
            ..
        }]
    ));
}

// ============================================================================
// NEUTRALITY
// ============================================================================

#[test]
fn test_market_neutral_trims_long_excess() {
    let rows = vec![
        series(100.0, 0.01, 27),
        series(80.0, 0.012, 27),
        series(100.0, -0.01, 27),
    ];
    let params = StrategyParams {
        market_neutral: true,
        ..StrategyParams::default()
    };
    let decision = decide(&params, &history_from(&rows, 27), &StateBook::new(3)).unwrap();

    assert!(decision.targets[0] >= 0);
    assert!(decision.targets[1] >= 0);
    assert!(decision.targets[2] < 0);
    let max_price = rows.iter().map(|r| r[26]).fold(0.0, f64::max);
    assert!(decision.report.net_exposure.abs() <= params.neutrality_tolerance.max(max_price));
    assert!(decision.report.events.iter().any(|e| matches!(
        e,
        LifecycleEvent::Trimmed { .. }
            | LifecycleEvent::Exited {
                reason: ExitReason::Rebalance,
                ..
            }
    )));
    assert!(decision.state.is_consistent());
}

// ============================================================================
// HOLD PERIOD
// ============================================================================

#[test]
fn test_hold_period_defers_neutrality_trim() {
    // Long A and short B both open on day 26; B takes profit on day 27
    let mut a = series(100.0, 0.01, 27);
    let a_entry = a[26];
    a.extend(std::iter::repeat_n(a_entry, 5));
    let mut b = series(100.0, -0.01, 27);
    let b_after = b[26] * 0.94;
    b.extend(std::iter::repeat_n(b_after, 5));
    let rows = vec![a, b];

    let params = StrategyParams {
        market_neutral: true,
        hold_period: 5,
        ..StrategyParams::default()
    };
    let mut engine = PositionEngine::new(params, 2).unwrap();
    let daily = run_days_with_reports(&mut engine, &rows);

    let long = cap_shares(a_entry);
    let short = cap_shares(rows[1][26]);
    assert_eq!(daily[26].0, vec![long, -short]);

    let third = (short as f64 / 3.0).round() as i64;
    let (targets, report) = &daily[27];
    assert_eq!(targets, &vec![long, -third]);
    assert!(report.events.contains(&LifecycleEvent::PartialTakeProfit {
        instrument: 1,
        stage: 2,
        from: -short,
        to: -third,
    }));
    assert!(report.events.contains(&LifecycleEvent::TrimDeferred {
        instrument: 0,
        days_held: 1,
        hold_period: 5,
    }));
    assert!(!report.events.iter().any(|e| matches!(e, LifecycleEvent::Trimmed { .. })));

    // Still inside the window through day 30
    for (targets, _) in &daily[28..=30] {
        assert_eq!(targets[0], long);
    }

    // Window elapsed: the long excess is trimmed
    let (targets, report) = &daily[31];
    assert!(targets[0] > 0 && targets[0] < long);
    assert!(report.events.contains(&LifecycleEvent::Trimmed {
        instrument: 0,
        from: long,
        to: targets[0],
    }));
    assert!(engine.state().is_consistent());
}

#[test]
fn test_hold_period_defers_reversal_exit() {
    let rows = vec![rise_then_crash(3), vec![50.0; 30]];
    let params = StrategyParams {
        exit_on_reversal: true,
        hold_period: 3,
        stop_loss_mode: StopLossMode::LegacyOffset,
        ..StrategyParams::default()
    };
    let mut engine = PositionEngine::new(params, 2).unwrap();
    let daily = run_days_with_reports(&mut engine, &rows);

    let held = cap_shares(rows[0][26]);
    assert_eq!(daily[26].0[0], held);

    // Short signal on days 27 and 28 is ignored inside the window
    for (targets, report) in &daily[27..=28] {
        assert_eq!(targets[0], held);
        assert!(report.events_for(0).next().is_none());
    }

    // Day 29 is three days after entry: the reversal closes the trade
    let (targets, report) = &daily[29];
    assert_eq!(targets[0], 0);
    let exits: Vec<_> = report.events_for(0).filter_map(LifecycleEvent::exit_reason).collect();
    assert_eq!(exits, vec![ExitReason::Reversal]);
}

#[test]
fn test_stop_loss_ignores_hold_period() {
    let rows = vec![rise_then_crash(1), vec![50.0; 28]];
    let params = StrategyParams {
        exit_on_reversal: true,
        hold_period: 3,
        ..StrategyParams::default()
    };
    let mut engine = PositionEngine::new(params, 2).unwrap();
    let daily = run_days_with_reports(&mut engine, &rows);

    assert!(daily[26].0[0] > 0);
    let (targets, report) = &daily[27];
    assert_eq!(targets[0], 0);
    let exits: Vec<_> = report.events_for(0).filter_map(LifecycleEvent::exit_reason).collect();
    assert_eq!(exits, vec![ExitReason::StopLoss]);
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn test_instrument_mismatch_leaves_state_untouched() {
    let rows = vec![series(100.0, 0.01, 30), vec![50.0; 30]];
    let mut engine = PositionEngine::new(StrategyParams::default(), 3).unwrap();

    let err = engine.on_day(&history_from(&rows, 30)).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InstrumentMismatch {
            expected: 3,
            actual: 2
        }
    ));
    assert_eq!(err.error_category(), "market_data");
    assert_eq!(engine.state(), &StateBook::new(3));
}

#[test]
fn test_from_json_config_errors() {
    assert!(matches!(
        PositionEngine::from_json("{", 2),
        Err(EngineError::ConfigParse(_))
    ));
    assert!(matches!(
        PositionEngine::from_json(r#"{"take_profit_levels": [{"threshold": 0.05, "remaining_fraction": 1.5}]}"#, 2),
        Err(EngineError::ConfigValidation(_))
    ));
    let engine = PositionEngine::from_json(r#"{"topN": 10, "hold_period": 3}"#, 2).unwrap();
    assert_eq!(engine.params().top_n, 10);
}

#[test]
fn test_json_round_trip_matches_stateful_engine() {
    let rows = vec![series(100.0, 0.01, 28), vec![50.0; 28]];

    let mut engine = PositionEngine::new(StrategyParams::default(), 2).unwrap();
    let expected = run_days(&mut engine, &rows);

    let mut state: Option<serde_json::Value> = None;
    for n in 1..=28 {
        let prices: Vec<Vec<f64>> = rows.iter().map(|r| r[..n].to_vec()).collect();
        let request = serde_json::json!({ "prices": prices, "state": state });
        let response: serde_json::Value =
            serde_json::from_str(&run_day_from_json(&request.to_string()).unwrap()).unwrap();

        let targets: Vec<i64> = serde_json::from_value(response["targets"].clone()).unwrap();
        assert_eq!(targets, expected[n - 1], "day {}", n - 1);
        state = Some(response["state"].clone());
    }
}
