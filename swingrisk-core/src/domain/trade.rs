//! ClosedTrade — the read-only record a position becomes on closure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::position::TradePosition;
use super::regime::RegimeType;

/// Why a position left the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Stop-loss executed on the full remainder.
    Stop,
    /// All three profit levels filled.
    ProfitComplete,
    /// Hold-time limit reached; remainder closed at the day's close.
    TimeLimit,
    /// Forced close at the end of available data.
    Horizon,
}

/// Completed trade, appended to the book's history on close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub symbol: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_date: NaiveDate,
    /// Total realized return as a fraction of the full position.
    pub total_return: f64,
    pub days_held: u32,
    pub regime_at_entry: RegimeType,
    pub profit_levels_hit: usize,
    pub stop_triggered: bool,
    pub max_profit_seen: f64,
    pub max_loss_seen: f64,
    pub exit_reason: ExitReason,
}

impl ClosedTrade {
    pub fn from_position(position: &TradePosition, exit_price: f64, reason: ExitReason) -> Self {
        Self {
            symbol: position.symbol.clone(),
            entry_price: position.entry_price,
            exit_price,
            entry_date: position.entry_date,
            total_return: position.realized_pnl,
            days_held: position.days_held,
            regime_at_entry: position.regime_at_entry,
            profit_levels_hit: position.profit_levels_hit.len(),
            stop_triggered: position.stop_triggered,
            max_profit_seen: position.max_profit_seen,
            max_loss_seen: position.max_loss_seen,
            exit_reason: reason,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.total_return > 0.0
    }
}
