//! Results of lifecycle calls: receipts, actions, outcomes.

use serde::{Deserialize, Serialize};

use crate::domain::{PositionStatus, RegimeType};
use crate::levels::ProfitTarget;

/// What a single daily update executed. At most one action fires per call,
/// matching the one-trigger-per-day granularity of the daily bars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PositionAction {
    /// Stop-loss executed on the full remaining position.
    StopLoss {
        price: f64,
        closed_pct: f64,
        pnl: f64,
    },
    /// One profit level filled.
    ProfitTaken {
        level: usize,
        price: f64,
        closed_pct: f64,
        remaining_pct: f64,
        pnl: f64,
        profit_pct: f64,
    },
    /// A material volatility move rescaled the stop distance.
    RegimeAdjusted {
        old_regime: RegimeType,
        new_regime: RegimeType,
        old_stop: f64,
        new_stop: f64,
        reason: String,
    },
    /// Hold-time limit closed the remainder at the day's close.
    TimeExit {
        price: f64,
        closed_pct: f64,
        pnl: f64,
    },
    /// Forced close at the end of available data.
    HorizonExit {
        price: f64,
        closed_pct: f64,
        pnl: f64,
    },
}

/// Returned by a successful open: the position's full risk setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenReceipt {
    pub symbol: String,
    pub regime: RegimeType,
    pub stop_level: f64,
    /// Stop distance from entry, in percent (negative).
    pub stop_distance_pct: f64,
    pub profit_targets: Vec<ProfitTarget>,
    pub expected_hold_days: u32,
    pub transition_detected: bool,
    /// Trace of the entry-time rule adjustment, when one applied.
    pub adjustment_reason: Option<String>,
}

/// Returned by every successful update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub symbol: String,
    pub actions: Vec<PositionAction>,
    pub status: PositionStatus,
    /// Mark-to-market return at the day's close; absent once closed.
    pub current_pnl: Option<f64>,
    pub realized_pnl: f64,
    pub remaining_pct: f64,
    pub days_held: u32,
}
