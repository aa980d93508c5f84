//! Adaptive stop-loss — percentage rule vs volatility-normalized rule.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::true_range::RollingTrueRange;
use super::LevelMethod;
use crate::config::RegimeConfig;
use crate::error::RiskError;

/// Hard bounds on the final stop distance, enforced last.
const WIDEST_STOP_PCT: f64 = -25.0;
const TIGHTEST_STOP_PCT: f64 = -2.0;

// Breadth adjustment: weak breadth tightens, strong breadth loosens.
const WEAK_BREADTH: f64 = 20.0;
const STRONG_BREADTH: f64 = 60.0;
const WEAK_BREADTH_FACTOR: f64 = 0.8;
const STRONG_BREADTH_FACTOR: f64 = 1.2;

/// A computed stop and how it was arrived at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopDecision {
    pub stop_level: f64,
    /// Final stop distance in percent, always within [-25, -2].
    pub stop_pct: f64,
    /// The percentage-rule candidate.
    pub base_pct: f64,
    /// The True-Range-rule candidate.
    pub tr_pct: f64,
    /// Current True Range relative to its rolling mean.
    pub volatility_factor: f64,
    pub method: LevelMethod,
}

/// Computes stop levels, tracking a rolling True-Range window per symbol.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveStopEngine {
    ranges: HashMap<String, RollingTrueRange>,
}

impl AdaptiveStopEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the stop for a position entered at `entry_price`.
    ///
    /// The percentage stop and the volatility-normalized True-Range stop are
    /// both computed; the more conservative (more negative) wins. Breadth
    /// then scales the distance, and the hard [-25%, -2%] bounds are applied
    /// last, regardless of any upstream multiplier.
    pub fn compute(
        &mut self,
        symbol: &str,
        entry_price: f64,
        current_true_range: f64,
        config: &RegimeConfig,
        t2108: Option<f64>,
    ) -> Result<StopDecision, RiskError> {
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

        let volatility_factor = self
            .ranges
            .entry(symbol.to_string())
            .or_default()
            .observe(current_true_range);

        let base_pct = config.stop_loss_pct;
        let tr_pct = -(current_true_range * config.tr_stop_multiplier * volatility_factor
            / entry_price)
            * 100.0;

        let mut final_pct = base_pct.min(tr_pct);
        let method = if tr_pct < base_pct {
            LevelMethod::TrBased
        } else {
            LevelMethod::PctBased
        };

        if let Some(t2108) = t2108 {
            if t2108 < WEAK_BREADTH {
                final_pct *= WEAK_BREADTH_FACTOR;
            } else if t2108 > STRONG_BREADTH {
                final_pct *= STRONG_BREADTH_FACTOR;
            }
        }

        final_pct = final_pct.max(WIDEST_STOP_PCT).min(TIGHTEST_STOP_PCT);

        Ok(StopDecision {
            stop_level: entry_price * (1.0 + final_pct / 100.0),
            stop_pct: final_pct,
            base_pct,
            tr_pct,
            volatility_factor,
            method,
        })
    }
}
