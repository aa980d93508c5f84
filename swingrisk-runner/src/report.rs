//! Report rendering: comparison table, key insights, JSON export.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;

use crate::layers::RuleLayer;
use crate::runner::BacktestReport;

/// Render the layer comparison as a plain-text report.
pub fn render_text(report: &BacktestReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "MULTI-LAYER BACKTEST — {} trades", report.trade_count);
    let _ = writeln!(out, "run id: {}", &report.run_id[..16.min(report.run_id.len())]);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<14} {:>9} {:>7} {:>8} {:>8} {:>10} {:>10}",
        "layer", "tot.ret", "win%", "sharpe", "max.dd", "avg/trade", "score"
    );
    let _ = writeln!(out, "{}", "-".repeat(72));

    for layer in &report.layers {
        let s = &layer.summary;
        let _ = writeln!(
            out,
            "{:<14} {:>8.1}% {:>6.1}% {:>8.2} {:>7.1}% {:>9.2}% {:>10.2}",
            layer.layer.label(),
            s.total_return * 100.0,
            s.win_rate * 100.0,
            s.sharpe_ratio,
            s.max_drawdown * 100.0,
            s.avg_return_per_trade * 100.0,
            layer.composite_score,
        );
    }

    let _ = writeln!(out);
    let baseline = report.layer(RuleLayer::Baseline);
    let combined = report.layer(RuleLayer::Combined);
    let stop_only = report.layer(RuleLayer::StopOnly);
    let profit_only = report.layer(RuleLayer::ProfitOnly);

    let _ = writeln!(out, "best layer: {}", report.best_layer.label());
    let _ = writeln!(
        out,
        "combined vs baseline: {:+.1}% total return",
        (combined.summary.total_return - baseline.summary.total_return) * 100.0
    );
    let _ = writeln!(
        out,
        "stop trigger rate: {:.1}%",
        stop_only.stop_triggers as f64 / report.trade_count.max(1) as f64 * 100.0
    );
    let _ = writeln!(
        out,
        "avg profit levels hit: {:.2}",
        profit_only.profit_triggers as f64 / report.trade_count.max(1) as f64
    );

    out
}

/// Export the full report as pretty-printed JSON.
pub fn export_json(report: &BacktestReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("serializing backtest report")?;
    std::fs::write(path, json)
        .with_context(|| format!("writing report to {}", path.display()))?;
    Ok(())
}
