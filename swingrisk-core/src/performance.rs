//! Portfolio performance — pure functions over closed-trade returns.
//!
//! Every metric is a pure function: ordered realized returns in, scalar out.
//! Annualization assumes the system's typical ~5-day hold, so one year holds
//! 252/5 trade slots.

use serde::{Deserialize, Serialize};

/// Trades per year implied by ~5-day holds.
const TRADES_PER_YEAR: f64 = 252.0 / 5.0;

/// Aggregate statistics for a set of closed trades.
///
/// All returns are fractions (0.08 = +8%). Every field is zero for an empty
/// trade list — an empty portfolio is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_trades: usize,
    pub total_return: f64,
    pub avg_return_per_trade: f64,
    pub win_rate: f64,
    pub max_win: f64,
    pub max_loss: f64,
    pub sharpe_ratio: f64,
    /// Drawdown of the latest equity point from its running peak (≤ 0).
    pub current_drawdown: f64,
    /// Deepest drawdown anywhere on the equity curve (≤ 0).
    pub max_drawdown: f64,
    pub annualized_roi: f64,
}

impl PortfolioSummary {
    pub fn compute(returns: &[f64]) -> Self {
        if returns.is_empty() {
            return Self::empty();
        }

        let n = returns.len();
        let total: f64 = returns.iter().sum();
        let avg = total / n as f64;
        let winners = returns.iter().filter(|&&r| r > 0.0).count();
        let max_win = returns.iter().cloned().fold(f64::MIN, f64::max);
        let max_loss = returns.iter().cloned().fold(f64::MAX, f64::min);

        let curve = equity_curve(returns);

        Self {
            total_trades: n,
            total_return: total,
            avg_return_per_trade: avg,
            win_rate: winners as f64 / n as f64,
            max_win,
            max_loss,
            sharpe_ratio: sharpe_ratio(returns),
            current_drawdown: current_drawdown(&curve),
            max_drawdown: max_drawdown(&curve),
            annualized_roi: avg * TRADES_PER_YEAR,
        }
    }

    pub fn empty() -> Self {
        Self {
            total_trades: 0,
            total_return: 0.0,
            avg_return_per_trade: 0.0,
            win_rate: 0.0,
            max_win: 0.0,
            max_loss: 0.0,
            sharpe_ratio: 0.0,
            current_drawdown: 0.0,
            max_drawdown: 0.0,
            annualized_roi: 0.0,
        }
    }
}

/// Cumulative-product equity curve from per-trade returns, starting at 1.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len());
    let mut equity = 1.0;
    for r in returns {
        equity *= 1.0 + r;
        curve.push(equity);
    }
    curve
}

/// Per-trade Sharpe-like ratio: `mean / stdev × sqrt(252/5)`.
///
/// Uses the population standard deviation; 0.0 when the returns are constant
/// or fewer than two.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    let std = variance.sqrt();
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * TRADES_PER_YEAR.sqrt()
}

/// Drawdown of the final equity point from the running peak (≤ 0).
pub fn current_drawdown(curve: &[f64]) -> f64 {
    let Some(&last) = curve.last() else {
        return 0.0;
    };
    let peak = curve.iter().cloned().fold(f64::MIN, f64::max);
    if peak <= 0.0 {
        return 0.0;
    }
    (last - peak) / peak
}

/// Deepest peak-to-trough drawdown on the curve (≤ 0).
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0_f64;
    for &equity in curve {
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            let dd = (equity - peak) / peak;
            if dd < worst {
                worst = dd;
            }
        }
    }
    worst
}
