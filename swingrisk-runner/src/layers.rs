//! Rule isolation layers — measuring each overlay component on its own.
//!
//! Four passes over the same historical trade set:
//! - Baseline: exit at a fixed horizon, no overlay at all
//! - StopOnly: stop-loss rules, baseline exit otherwise
//! - ProfitOnly: profit ladder, baseline exit for the remainder
//! - Combined: the full position lifecycle
//!
//! A trade the overlay cannot price (bad bars, degenerate entry) falls back
//! to its baseline return rather than poisoning the pass.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use swingrisk_core::levels::{profit_ladder, AdaptiveStopEngine};
use swingrisk_core::{
    MarketSnapshot, PortfolioSummary, PositionBook, PositionStatus, RegimeClassifier,
    RegimeRuleSet,
};

use crate::config::BacktestConfig;
use crate::trades::HistoricalTrade;

/// Which rule subset a pass applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleLayer {
    Baseline,
    StopOnly,
    ProfitOnly,
    Combined,
}

impl RuleLayer {
    pub const ALL: [RuleLayer; 4] = [
        RuleLayer::Baseline,
        RuleLayer::StopOnly,
        RuleLayer::ProfitOnly,
        RuleLayer::Combined,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RuleLayer::Baseline => "baseline",
            RuleLayer::StopOnly => "stop_only",
            RuleLayer::ProfitOnly => "profit_only",
            RuleLayer::Combined => "combined",
        }
    }
}

/// Aggregated result of one layer pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerReport {
    pub layer: RuleLayer,
    pub summary: PortfolioSummary,
    pub stop_triggers: usize,
    pub profit_triggers: usize,
    pub composite_score: f64,
}

/// Risk-adjusted composite: `annualized ROI / |max drawdown| × Sharpe`,
/// falling back to plain ROI when drawdown or Sharpe is degenerate.
pub fn composite_score(summary: &PortfolioSummary) -> f64 {
    let roi = summary.annualized_roi;
    let max_dd = summary.max_drawdown.abs();
    if max_dd > 0.0 && summary.sharpe_ratio > 0.0 {
        (roi / max_dd) * summary.sharpe_ratio
    } else {
        roi
    }
}

/// Per-trade outcome inside a layer pass.
struct TradeOutcome {
    trade_return: f64,
    stop_triggered: bool,
    profit_levels_hit: usize,
}

impl TradeOutcome {
    fn plain(trade_return: f64) -> Self {
        Self {
            trade_return,
            stop_triggered: false,
            profit_levels_hit: 0,
        }
    }
}

/// Run one isolation layer over the trade set. Trades are independent and
/// evaluated in parallel, each against its own engine instances.
pub fn run_layer(
    layer: RuleLayer,
    trades: &[HistoricalTrade],
    config: &BacktestConfig,
) -> LayerReport {
    let rules = config.scaled_rules();

    let outcomes: Vec<TradeOutcome> = trades
        .par_iter()
        .map(|trade| match layer {
            RuleLayer::Baseline => TradeOutcome::plain(baseline_return(trade, config)),
            RuleLayer::StopOnly => stop_only(trade, config, &rules),
            RuleLayer::ProfitOnly => profit_only(trade, config, &rules),
            RuleLayer::Combined => combined(trade, config, &rules),
        })
        .collect();

    let returns: Vec<f64> = outcomes.iter().map(|o| o.trade_return).collect();
    let summary = PortfolioSummary::compute(&returns);
    let composite = composite_score(&summary);

    LayerReport {
        layer,
        summary,
        stop_triggers: outcomes.iter().filter(|o| o.stop_triggered).count(),
        profit_triggers: outcomes.iter().map(|o| o.profit_levels_hit).sum(),
        composite_score: composite,
    }
}

/// Exit at the configured horizon (or the last available bar), no overlay.
fn baseline_return(trade: &HistoricalTrade, config: &BacktestConfig) -> f64 {
    if trade.days.is_empty() {
        return 0.0;
    }
    let idx = config.baseline_horizon_days.clamp(1, trade.days.len()) - 1;
    (trade.days[idx].close - trade.entry_price) / trade.entry_price
}

fn entry_snapshot(trade: &HistoricalTrade) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::new(trade.vix, 0);
    if let Some(t) = trade.t2108 {
        snapshot = snapshot.with_t2108(t);
    }
    if let Some(m) = trade.momentum_ratio {
        snapshot = snapshot.with_momentum(m);
    }
    snapshot
}

/// Stop-loss rules only: exit at the stop when any day's low breaches it,
/// baseline exit otherwise.
fn stop_only(
    trade: &HistoricalTrade,
    config: &BacktestConfig,
    rules: &RegimeRuleSet,
) -> TradeOutcome {
    let classifier = RegimeClassifier::new(config.bands);
    let regime = classifier.classify(&entry_snapshot(trade));
    let mut engine = AdaptiveStopEngine::new();

    let decision = match engine.compute(
        &trade.symbol,
        trade.entry_price,
        trade.entry_true_range(),
        rules.get(regime),
        trade.t2108,
    ) {
        Ok(d) => d,
        Err(_) => return TradeOutcome::plain(baseline_return(trade, config)),
    };

    for day in &trade.days {
        if day.low <= decision.stop_level {
            return TradeOutcome {
                trade_return: (decision.stop_level - trade.entry_price) / trade.entry_price,
                stop_triggered: true,
                profit_levels_hit: 0,
            };
        }
    }
    TradeOutcome::plain(baseline_return(trade, config))
}

/// Profit ladder only: at most one level fills per day (the daily-bar
/// granularity of the lifecycle); whatever remains exits at the baseline.
fn profit_only(
    trade: &HistoricalTrade,
    config: &BacktestConfig,
    rules: &RegimeRuleSet,
) -> TradeOutcome {
    let classifier = RegimeClassifier::new(config.bands);
    let regime = classifier.classify(&entry_snapshot(trade));

    let ladder = match profit_ladder(
        trade.entry_price,
        rules.get(regime),
        trade.entry_true_range(),
    ) {
        Ok(l) => l,
        Err(_) => return TradeOutcome::plain(baseline_return(trade, config)),
    };

    let mut total_return = 0.0;
    let mut remaining = 100.0;
    let mut next_level = 0;

    for day in &trade.days {
        if next_level >= ladder.len() {
            break;
        }
        let target = &ladder[next_level];
        if day.high >= target.price {
            let per_unit = (target.price - trade.entry_price) / trade.entry_price;
            total_return += per_unit * (target.position_to_close / 100.0);
            remaining -= target.position_to_close;
            next_level += 1;
        }
    }

    if remaining > 0.0 {
        total_return += baseline_return(trade, config) * (remaining / 100.0);
    }

    TradeOutcome {
        trade_return: total_return,
        stop_triggered: false,
        profit_levels_hit: next_level,
    }
}

/// The full lifecycle: stop, ladder, regime re-adjustment, time exit, and a
/// horizon force-close so every trade has a defined exit.
fn combined(
    trade: &HistoricalTrade,
    config: &BacktestConfig,
    rules: &RegimeRuleSet,
) -> TradeOutcome {
    let mut book = PositionBook::with_bands(rules.clone(), config.bands);
    if let Some(date) = trade.entry_date {
        book = book.with_entry_date(date);
    }
    let snapshot = entry_snapshot(trade);

    if trade.days.is_empty()
        || book
            .open(
                &trade.symbol,
                trade.entry_price,
                &snapshot,
                100.0,
                Some(trade.entry_true_range()),
            )
            .is_err()
    {
        return TradeOutcome::plain(baseline_return(trade, config));
    }

    let mut closed = false;
    for (i, day) in trade.days.iter().enumerate() {
        let day_snapshot = MarketSnapshot {
            day: i as u32 + 1,
            ..snapshot.clone()
        };
        match book.update(&trade.symbol, day.high, day.low, day.close, &day_snapshot) {
            Ok(outcome) if outcome.status == PositionStatus::Closed => {
                closed = true;
                break;
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }

    if !closed && book.position(&trade.symbol).is_some() {
        let last_close = trade.days.last().map(|d| d.close).unwrap_or(trade.entry_price);
        let _ = book.force_close(&trade.symbol, last_close);
    }

    match book.history().first() {
        Some(record) => TradeOutcome {
            trade_return: record.total_return,
            stop_triggered: record.stop_triggered,
            profit_levels_hit: record.profit_levels_hit,
        },
        None => TradeOutcome::plain(baseline_return(trade, config)),
    }
}
