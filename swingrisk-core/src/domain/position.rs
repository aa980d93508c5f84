//! TradePosition — the owned, mutable aggregate for one open trade.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::regime::RegimeType;
use super::snapshot::MarketSnapshot;

/// Lifecycle state reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Active,
    Closed,
}

/// One active position and its risk levels.
///
/// Created on open, mutated exclusively by the position book until
/// `remaining_position_pct` reaches zero, then converted into a read-only
/// [`ClosedTrade`](super::trade::ClosedTrade) and dropped from the active set.
///
/// Accounting invariant: `remaining_position_pct` starts at 100 and only
/// decreases, by the scaling slice of each profit level hit; a triggered stop
/// takes it straight to zero regardless of what remained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePosition {
    pub symbol: String,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    /// Fraction of portfolio allocated at open, in percent.
    pub position_size_pct: f64,
    pub regime_at_entry: RegimeType,
    pub vix_at_entry: f64,
    /// Entry-day market context, kept for later re-adjustment checks.
    pub snapshot_at_entry: MarketSnapshot,

    // ── Risk levels ──
    pub stop_level: f64,
    /// Three ascending target prices.
    pub profit_levels: [f64; 3],
    /// Cumulative close percentages aligned with `profit_levels`.
    pub profit_scales: [f64; 3],
    /// Hold limit in days, after any entry-time adjustment.
    pub max_hold_days: u32,

    // ── Execution tracking ──
    pub stop_triggered: bool,
    pub profit_levels_hit: BTreeSet<usize>,
    pub remaining_position_pct: f64,
    /// Accumulated realized return as a fraction of the full position.
    pub realized_pnl: f64,

    // ── Excursion tracking ──
    pub max_profit_seen: f64,
    pub max_loss_seen: f64,
    pub days_held: u32,
}

impl TradePosition {
    /// Mark-to-market return of the full position at `price`.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price
    }

    /// Record the day's excursion extremes.
    pub fn observe_range(&mut self, high: f64, low: f64) {
        let best = (high - self.entry_price) / self.entry_price;
        let worst = (low - self.entry_price) / self.entry_price;
        if best > self.max_profit_seen {
            self.max_profit_seen = best;
        }
        if worst < self.max_loss_seen {
            self.max_loss_seen = worst;
        }
    }

    /// Position slice (percent) closed by profit level `index`.
    pub fn slice_for_level(&self, index: usize) -> f64 {
        if index == 0 {
            self.profit_scales[0]
        } else {
            self.profit_scales[index] - self.profit_scales[index - 1]
        }
    }

    pub fn is_fully_closed(&self) -> bool {
        self.remaining_position_pct <= 1e-9
    }
}
