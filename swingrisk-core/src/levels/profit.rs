//! Staged profit-taking ladder — three targets, each closing a slice.

use serde::{Deserialize, Serialize};

use super::LevelMethod;
use crate::config::RegimeConfig;
use crate::error::RiskError;

/// One rung of the profit ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitTarget {
    /// 1-based ladder level.
    pub level: usize,
    pub price: f64,
    /// Target distance above entry, in percent.
    pub pct: f64,
    /// Percent of the position closed when this level fills.
    pub position_to_close: f64,
    /// Cumulative percent closed once this level has filled.
    pub cumulative_closed: f64,
    pub method: LevelMethod,
}

/// Compute the three-level ladder for a position entered at `entry_price`.
///
/// Each level takes the more optimistic of the percentage target and the
/// True-Range target. Scaling validity (strictly ascending, ending at 100)
/// is a configuration-load concern, not re-checked here.
pub fn profit_ladder(
    entry_price: f64,
    config: &RegimeConfig,
    current_true_range: f64,
) -> Result<Vec<ProfitTarget>, RiskError> {
    if !(entry_price > 0.0) {
        return Err(RiskError::InvalidInput(format!(
            "entry price must be positive, got {entry_price}"
        )));
    }
    if !(current_true_range > 0.0) {
        return Err(RiskError::InvalidInput(format!(
            "true range must be positive, got {current_true_range}"
        )));
    }

    let mut targets = Vec::with_capacity(3);
    for i in 0..3 {
        let base_price = entry_price * (1.0 + config.profit_levels_pct[i] / 100.0);
        let tr_price = entry_price + current_true_range * config.tr_profit_multipliers[i];

        let (price, method) = if tr_price > base_price {
            (tr_price, LevelMethod::TrBased)
        } else {
            (base_price, LevelMethod::PctBased)
        };

        let cumulative = config.position_scaling_pct[i];
        let position_to_close = if i == 0 {
            cumulative
        } else {
            cumulative - config.position_scaling_pct[i - 1]
        };

        targets.push(ProfitTarget {
            level: i + 1,
            price,
            pct: (price - entry_price) / entry_price * 100.0,
            position_to_close,
            cumulative_closed: cumulative,
            method,
        });
    }

    Ok(targets)
}
