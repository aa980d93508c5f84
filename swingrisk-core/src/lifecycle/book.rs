//! PositionBook — owns active positions and drives them day by day.
//!
//! The book is the single mutator of every `TradePosition` it holds. Each
//! update evaluates the rules in strict priority order — stop-loss, then
//! profit-taking, then regime re-adjustment, then time exit — and the first
//! rule that fires is the only one executed for that call. Closed positions
//! move to an append-only history and cannot be updated again.
//!
//! Not designed for concurrent mutation of one position: callers exposing
//! the book to concurrent traffic must serialize per symbol.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::config::RegimeRuleSet;
use crate::domain::{
    ClosedTrade, ExitReason, MarketSnapshot, PositionStatus, RegimeBands, TradePosition,
};
use crate::error::RiskError;
use crate::levels::{profit_ladder, AdaptiveStopEngine};
use crate::lifecycle::actions::{OpenReceipt, PositionAction, UpdateOutcome};
use crate::performance::PortfolioSummary;
use crate::regime::{RegimeClassifier, RegimeTransitionManager};

/// A VIX move from entry larger than this re-triggers transition detection.
const VIX_READJUST_THRESHOLD: f64 = 15.0;

/// Fallback True Range when the caller has none: 2% of entry.
const DEFAULT_TR_FRACTION: f64 = 0.02;

/// Owns one strategy's active positions and closed-trade history.
#[derive(Debug, Clone)]
pub struct PositionBook {
    rules: RegimeRuleSet,
    stops: AdaptiveStopEngine,
    transitions: RegimeTransitionManager,
    active: HashMap<String, TradePosition>,
    history: Vec<ClosedTrade>,
    current_snapshot: Option<MarketSnapshot>,
    previous_snapshot: Option<MarketSnapshot>,
    entry_date: NaiveDate,
}

impl PositionBook {
    pub fn new(rules: RegimeRuleSet) -> Self {
        Self::with_bands(rules, RegimeBands::default())
    }

    pub fn with_bands(rules: RegimeRuleSet, bands: RegimeBands) -> Self {
        Self {
            rules,
            stops: AdaptiveStopEngine::new(),
            transitions: RegimeTransitionManager::new(RegimeClassifier::new(bands)),
            active: HashMap::new(),
            history: Vec::new(),
            current_snapshot: None,
            previous_snapshot: None,
            // Positions are dated from this anchor plus the snapshot day.
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    pub fn with_entry_date(mut self, date: NaiveDate) -> Self {
        self.entry_date = date;
        self
    }

    // ── Open ────────────────────────────────────────────────────────

    /// Open a position with a full risk setup.
    ///
    /// Classifies the regime, applies any transition adjustment implied by
    /// the move from the book's previous snapshot, and computes the stop and
    /// profit ladder from the adjusted rule bundle. `true_range` defaults to
    /// 2% of entry when the caller has no range data yet.
    pub fn open(
        &mut self,
        symbol: &str,
        entry_price: f64,
        snapshot: &MarketSnapshot,
        position_size_pct: f64,
        true_range: Option<f64>,
    ) -> Result<OpenReceipt, RiskError> {
        if self.active.contains_key(symbol) {
            return Err(RiskError::DuplicatePosition(symbol.to_string()));
        }
        if !(entry_price > 0.0) || !entry_price.is_finite() {
            return Err(RiskError::InvalidInput(format!(
                "entry price must be positive, got {entry_price}"
            )));
        }
        if !(position_size_pct > 0.0 && position_size_pct <= 100.0) {
            return Err(RiskError::InvalidInput(format!(
                "position size must be in (0, 100], got {position_size_pct}"
            )));
        }
        let true_range = true_range.unwrap_or(entry_price * DEFAULT_TR_FRACTION);
        if !(true_range > 0.0) {
            return Err(RiskError::InvalidInput(format!(
                "true range must be positive, got {true_range}"
            )));
        }

        self.previous_snapshot = self.current_snapshot.take();
        self.current_snapshot = Some(snapshot.clone());

        let outcome = self
            .transitions
            .detect(snapshot, self.previous_snapshot.as_ref());
        let regime = outcome.regime;

        let base = self.rules.get(regime);
        let config = if outcome.adjustment.is_neutral() {
            base.clone()
        } else {
            outcome.adjustment.apply_to(base)
        };

        let stop = self
            .stops
            .compute(symbol, entry_price, true_range, &config, snapshot.t2108)?;
        let targets = profit_ladder(entry_price, &config, true_range)?;

        let position = TradePosition {
            symbol: symbol.to_string(),
            entry_price,
            entry_date: self.entry_date + chrono::Duration::days(i64::from(snapshot.day)),
            position_size_pct,
            regime_at_entry: regime,
            vix_at_entry: snapshot.vix,
            snapshot_at_entry: snapshot.clone(),
            stop_level: stop.stop_level,
            profit_levels: [targets[0].price, targets[1].price, targets[2].price],
            profit_scales: config.position_scaling_pct,
            max_hold_days: config.max_hold_days,
            stop_triggered: false,
            profit_levels_hit: BTreeSet::new(),
            remaining_position_pct: 100.0,
            realized_pnl: 0.0,
            max_profit_seen: 0.0,
            max_loss_seen: 0.0,
            days_held: 0,
        };

        let receipt = OpenReceipt {
            symbol: symbol.to_string(),
            regime,
            stop_level: stop.stop_level,
            stop_distance_pct: stop.stop_pct,
            profit_targets: targets,
            expected_hold_days: config.max_hold_days,
            transition_detected: outcome.transition_detected,
            adjustment_reason: if outcome.adjustment.is_neutral() {
                None
            } else {
                Some(outcome.adjustment.reason.clone())
            },
        };

        self.active.insert(symbol.to_string(), position);
        Ok(receipt)
    }

    // ── Update ──────────────────────────────────────────────────────

    /// Feed one day's prices through the rule priority chain.
    ///
    /// `days_held` advances once per call regardless of outcome. Updating a
    /// symbol that is closed (or never opened) fails with `PositionNotFound`
    /// and never double-realizes PnL.
    pub fn update(
        &mut self,
        symbol: &str,
        high: f64,
        low: f64,
        close: f64,
        snapshot: &MarketSnapshot,
    ) -> Result<UpdateOutcome, RiskError> {
        let position = self
            .active
            .get_mut(symbol)
            .ok_or_else(|| RiskError::PositionNotFound(symbol.to_string()))?;

        position.days_held += 1;
        position.observe_range(high, low);

        // 1. Stop-loss.
        if low <= position.stop_level
            && !position.stop_triggered
            && position.remaining_position_pct > 0.0
        {
            let closed_pct = position.remaining_position_pct;
            let pnl = position.unrealized_pnl(position.stop_level) * (closed_pct / 100.0);
            position.realized_pnl += pnl;
            position.stop_triggered = true;
            position.remaining_position_pct = 0.0;

            let action = PositionAction::StopLoss {
                price: position.stop_level,
                closed_pct,
                pnl,
            };
            let stop_level = position.stop_level;
            return Ok(self.close_active(symbol, stop_level, ExitReason::Stop, vec![action]));
        }

        // 2. Profit-taking: the first unhit level within the day's high.
        for i in 0..3 {
            if position.profit_levels_hit.contains(&i) {
                continue;
            }
            let target = position.profit_levels[i];
            if high < target {
                continue;
            }

            let closed_pct = position.slice_for_level(i);
            let profit_per_unit = position.unrealized_pnl(target);
            let pnl = profit_per_unit * (closed_pct / 100.0);
            position.realized_pnl += pnl;
            position.profit_levels_hit.insert(i);
            position.remaining_position_pct -= closed_pct;

            let action = PositionAction::ProfitTaken {
                level: i + 1,
                price: target,
                closed_pct,
                remaining_pct: position.remaining_position_pct.max(0.0),
                pnl,
                profit_pct: profit_per_unit * 100.0,
            };

            if position.is_fully_closed() {
                return Ok(self.close_active(
                    symbol,
                    target,
                    ExitReason::ProfitComplete,
                    vec![action],
                ));
            }
            return Ok(Self::active_outcome(position, close, vec![action]));
        }

        // 3. Regime re-adjustment on a material VIX move from entry. Only
        // the stop distance rescales; profit targets stay as set at entry.
        if (snapshot.vix - position.vix_at_entry).abs() > VIX_READJUST_THRESHOLD {
            let entry_snapshot = position.snapshot_at_entry.clone();
            let outcome = self.transitions.detect(snapshot, Some(&entry_snapshot));
            if !outcome.adjustment.is_neutral() {
                let old_stop = position.stop_level;
                let distance = (position.entry_price - position.stop_level).abs();
                position.stop_level =
                    position.entry_price - distance * outcome.adjustment.stop_multiplier;
                self.current_snapshot = Some(snapshot.clone());

                let action = PositionAction::RegimeAdjusted {
                    old_regime: position.regime_at_entry,
                    new_regime: outcome.regime,
                    old_stop,
                    new_stop: position.stop_level,
                    reason: outcome.adjustment.reason,
                };
                return Ok(Self::active_outcome(position, close, vec![action]));
            }
        }

        // 4. Time exit.
        if position.days_held >= position.max_hold_days && position.remaining_position_pct > 0.0
        {
            let closed_pct = position.remaining_position_pct;
            let pnl = position.unrealized_pnl(close) * (closed_pct / 100.0);
            position.realized_pnl += pnl;
            position.remaining_position_pct = 0.0;

            let action = PositionAction::TimeExit {
                price: close,
                closed_pct,
                pnl,
            };
            return Ok(self.close_active(symbol, close, ExitReason::TimeLimit, vec![action]));
        }

        Ok(Self::active_outcome(position, close, Vec::new()))
    }

    /// Close any remaining exposure at `price` — the end-of-data exit.
    pub fn force_close(&mut self, symbol: &str, price: f64) -> Result<UpdateOutcome, RiskError> {
        let position = self
            .active
            .get_mut(symbol)
            .ok_or_else(|| RiskError::PositionNotFound(symbol.to_string()))?;

        let closed_pct = position.remaining_position_pct;
        let pnl = position.unrealized_pnl(price) * (closed_pct / 100.0);
        position.realized_pnl += pnl;
        position.remaining_position_pct = 0.0;

        let action = PositionAction::HorizonExit {
            price,
            closed_pct,
            pnl,
        };
        Ok(self.close_active(symbol, price, ExitReason::Horizon, vec![action]))
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn position(&self, symbol: &str) -> Option<&TradePosition> {
        self.active.get(symbol)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_symbols(&self) -> Vec<&str> {
        self.active.keys().map(String::as_str).collect()
    }

    /// Read-only closed-trade history, in close order.
    pub fn history(&self) -> &[ClosedTrade] {
        &self.history
    }

    pub fn transition_history(&self) -> &[crate::regime::TransitionRecord] {
        self.transitions.history()
    }

    /// Aggregate statistics over the closed-trade history.
    pub fn portfolio_performance(&self) -> PortfolioSummary {
        let returns: Vec<f64> = self.history.iter().map(|t| t.total_return).collect();
        PortfolioSummary::compute(&returns)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn close_active(
        &mut self,
        symbol: &str,
        exit_price: f64,
        reason: ExitReason,
        actions: Vec<PositionAction>,
    ) -> UpdateOutcome {
        let position = self
            .active
            .remove(symbol)
            .expect("close_active called for a symbol not in the active set");
        let trade = ClosedTrade::from_position(&position, exit_price, reason);
        let outcome = UpdateOutcome {
            symbol: symbol.to_string(),
            actions,
            status: PositionStatus::Closed,
            current_pnl: None,
            realized_pnl: position.realized_pnl,
            remaining_pct: 0.0,
            days_held: position.days_held,
        };
        self.history.push(trade);
        outcome
    }

    fn active_outcome(
        position: &TradePosition,
        close: f64,
        actions: Vec<PositionAction>,
    ) -> UpdateOutcome {
        UpdateOutcome {
            symbol: position.symbol.clone(),
            actions,
            status: PositionStatus::Active,
            current_pnl: Some(position.unrealized_pnl(close)),
            realized_pnl: position.realized_pnl,
            remaining_pct: position.remaining_position_pct,
            days_held: position.days_held,
        }
    }
}

impl Default for PositionBook {
    fn default() -> Self {
        Self::new(RegimeRuleSet::default())
    }
}
