//! End-to-end lifecycle scenarios against recorded market data.

use swingrisk_core::{
    ExitReason, MarketSnapshot, PositionAction, PositionBook, PositionStatus, RegimeType,
    RiskError,
};

/// High/low/close rows for one trading day.
struct Day {
    high: f64,
    low: f64,
    close: f64,
}

fn day(high: f64, low: f64, close: f64) -> Day {
    Day { high, low, close }
}

/// The EDN utilities trade: entry 45.66 with VIX at 15.43, a quiet bull-tape
/// setup that slid into its stop on day three.
#[test]
fn edn_trade_stops_out_on_day_three() {
    let mut book = PositionBook::default();
    let entry_snapshot = MarketSnapshot::new(15.43, 0)
        .with_t2108(45.0)
        .with_momentum(1.2);

    let receipt = book
        .open("EDN", 45.66, &entry_snapshot, 100.0, Some(1.35))
        .unwrap();

    assert_eq!(receipt.regime, RegimeType::BullNormal);
    // Quiet True Range: the -8% percentage stop wins → 45.66 × 0.92.
    assert!((receipt.stop_level - 42.0072).abs() < 1e-4);
    assert!((receipt.stop_distance_pct - (-8.0)).abs() < 1e-9);

    // Targets strictly ascending above entry, slices 25/25/50.
    let targets = &receipt.profit_targets;
    assert!(targets[0].price > 45.66);
    assert!(targets[1].price > targets[0].price);
    assert!(targets[2].price > targets[1].price);
    let slices: Vec<f64> = targets.iter().map(|t| t.position_to_close).collect();
    assert_eq!(slices, vec![25.0, 25.0, 50.0]);

    let days = [
        day(44.65, 43.30, 44.65),
        day(46.01, 43.33, 43.57),
        day(44.28, 41.70, 42.62), // low breaches the 42.01 stop
    ];

    let mut last = None;
    for (i, d) in days.iter().enumerate() {
        let snapshot = MarketSnapshot::new(15.43, i as u32 + 1)
            .with_t2108(45.0)
            .with_momentum(1.2);
        last = Some(
            book.update("EDN", d.high, d.low, d.close, &snapshot)
                .unwrap(),
        );
    }

    let outcome = last.unwrap();
    assert_eq!(outcome.status, PositionStatus::Closed);
    assert_eq!(outcome.days_held, 3);
    // Stop closes 100% of the position at the stop level: exactly -8%.
    assert!((outcome.realized_pnl - (-0.08)).abs() < 1e-9);
    assert!(matches!(outcome.actions[0], PositionAction::StopLoss { .. }));

    let trade = &book.history()[0];
    assert!(trade.stop_triggered);
    assert_eq!(trade.exit_reason, ExitReason::Stop);
    assert_eq!(trade.profit_levels_hit, 0);
}

/// The ZIM shipping trade from the same session: smaller entry, same regime,
/// same outcome — the stop caps the loss at -8% while the raw close series
/// would have lost far more.
#[test]
fn zim_trade_stop_caps_the_loss() {
    let mut book = PositionBook::default();
    let entry_snapshot = MarketSnapshot::new(15.43, 0)
        .with_t2108(45.0)
        .with_momentum(1.2);

    book.open("ZIM", 22.92, &entry_snapshot, 100.0, Some(0.67))
        .unwrap();

    let days = [
        day(22.49, 22.32, 22.49),
        day(23.00, 21.36, 21.45),
        day(21.56, 20.36, 21.51),
        day(21.12, 20.45, 20.72),
        day(19.33, 18.54, 19.09),
    ];

    for (i, d) in days.iter().enumerate() {
        let snapshot = MarketSnapshot::new(15.43, i as u32 + 1);
        match book.update("ZIM", d.high, d.low, d.close, &snapshot) {
            Ok(outcome) => {
                if outcome.status == PositionStatus::Closed {
                    assert!((outcome.realized_pnl - (-0.08)).abs() < 1e-9);
                    // Raw buy-and-hold through day five would be ~-16.7%.
                    let raw = (19.09 - 22.92) / 22.92;
                    assert!(outcome.realized_pnl > raw);
                    return;
                }
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    panic!("stop never triggered");
}

#[test]
fn profit_ladder_walks_down_the_position() {
    let mut book = PositionBook::default();
    let snapshot = MarketSnapshot::new(20.0, 0);
    book.open("RUN", 100.0, &snapshot, 100.0, Some(2.0)).unwrap();

    // Level 1 at 112: 25% off.
    let o1 = book
        .update("RUN", 112.5, 104.0, 111.0, &MarketSnapshot::new(20.0, 1))
        .unwrap();
    assert_eq!(o1.status, PositionStatus::Active);
    assert_eq!(o1.remaining_pct, 75.0);
    assert!((o1.realized_pnl - 0.12 * 0.25).abs() < 1e-12);

    // Level 2 at 125: another 25%.
    let o2 = book
        .update("RUN", 126.0, 110.0, 124.0, &MarketSnapshot::new(20.0, 2))
        .unwrap();
    assert_eq!(o2.remaining_pct, 50.0);
    assert!((o2.realized_pnl - (0.12 * 0.25 + 0.25 * 0.25)).abs() < 1e-12);

    // Level 3 at 140 closes the rest.
    let o3 = book
        .update("RUN", 141.0, 120.0, 140.5, &MarketSnapshot::new(20.0, 3))
        .unwrap();
    assert_eq!(o3.status, PositionStatus::Closed);
    assert!((o3.realized_pnl - 0.2925).abs() < 1e-12);

    // Each fill grew the hit set by exactly one.
    let trade = &book.history()[0];
    assert_eq!(trade.profit_levels_hit, 3);
    assert_eq!(trade.exit_reason, ExitReason::ProfitComplete);
}

#[test]
fn closed_positions_reject_further_updates() {
    let mut book = PositionBook::default();
    let snapshot = MarketSnapshot::new(20.0, 0);
    book.open("X", 100.0, &snapshot, 100.0, Some(2.0)).unwrap();
    book.update("X", 95.0, 90.0, 92.0, &MarketSnapshot::new(20.0, 1))
        .unwrap();

    for _ in 0..3 {
        let err = book
            .update("X", 95.0, 90.0, 92.0, &MarketSnapshot::new(20.0, 2))
            .unwrap_err();
        assert!(matches!(err, RiskError::PositionNotFound(_)));
    }
    // History holds exactly one trade with single-realized PnL.
    assert_eq!(book.history().len(), 1);
    assert!((book.history()[0].total_return - (-0.08)).abs() < 1e-9);
}

#[test]
fn portfolio_performance_reflects_closed_trades() {
    let mut book = PositionBook::default();

    // Winner: full ladder on AAA.
    book.open("AAA", 100.0, &MarketSnapshot::new(20.0, 0), 100.0, Some(2.0))
        .unwrap();
    book.update("AAA", 112.5, 104.0, 111.0, &MarketSnapshot::new(20.0, 1))
        .unwrap();
    book.update("AAA", 126.0, 110.0, 124.0, &MarketSnapshot::new(20.0, 2))
        .unwrap();
    book.update("AAA", 141.0, 120.0, 140.5, &MarketSnapshot::new(20.0, 3))
        .unwrap();

    // Loser: BBB stops out.
    book.open("BBB", 100.0, &MarketSnapshot::new(20.0, 4), 100.0, Some(2.0))
        .unwrap();
    book.update("BBB", 99.0, 90.0, 93.0, &MarketSnapshot::new(20.0, 5))
        .unwrap();

    let summary = book.portfolio_performance();
    assert_eq!(summary.total_trades, 2);
    assert!((summary.win_rate - 0.5).abs() < 1e-12);
    assert!((summary.total_return - (0.2925 - 0.08)).abs() < 1e-9);
    assert!((summary.max_win - 0.2925).abs() < 1e-9);
    assert!((summary.max_loss - (-0.08)).abs() < 1e-9);
}

#[test]
fn emergency_breadth_collapse_tightens_stop_mid_trade() {
    let mut book = PositionBook::default();
    let entry = MarketSnapshot::new(20.0, 0).with_t2108(55.0).with_momentum(1.2);
    book.open("SPY", 100.0, &entry, 100.0, Some(2.0)).unwrap();

    // VIX doubles and breadth craters vs entry: the emergency protocol
    // replaces the delta rules, shrinking the stop distance to 60%.
    let crash = MarketSnapshot::new(40.0, 1).with_t2108(20.0).with_momentum(1.0);
    let outcome = book.update("SPY", 100.5, 99.5, 100.0, &crash).unwrap();

    match &outcome.actions[0] {
        PositionAction::RegimeAdjusted {
            new_stop, reason, ..
        } => {
            // Entry stop 92 (8 points away) → 100 - 8 × 0.6.
            assert!((new_stop - 95.2).abs() < 1e-9);
            assert!(reason.starts_with("EMERGENCY"));
        }
        other => panic!("expected RegimeAdjusted, got {other:?}"),
    }
}
