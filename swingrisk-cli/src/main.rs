//! SwingRisk CLI — demo, backtest, and sweep commands.
//!
//! Commands:
//! - `demo` — walk two recorded trades through the full lifecycle, printing
//!   levels and executed actions day by day
//! - `backtest` — run the four isolation layers over a synthetic trade set
//!   and print the comparison report (optionally exporting JSON)
//! - `sweep` — grid-search VIX bands and rule scalars, printing the winner

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use swingrisk_core::{
    MarketSnapshot, PositionAction, PositionBook, PositionStatus, RegimeRuleSet,
};
use swingrisk_runner::{
    export_json, render_text, run_multilayer, sweep, BacktestConfig, SampleTradeSet, SweepGrid,
};

#[derive(Parser)]
#[command(
    name = "swingrisk",
    about = "SwingRisk CLI — regime-aware position risk engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk two recorded trades through the lifecycle, day by day.
    Demo {
        /// Path to a TOML regime rule file (defaults to the built-in table).
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Run the multi-layer backtest over a synthetic trade set.
    Backtest {
        /// Number of synthetic trades.
        #[arg(long, default_value_t = 100)]
        trades: usize,

        /// RNG seed for the trade generator.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Baseline exit horizon in days.
        #[arg(long, default_value_t = 2)]
        horizon: usize,

        /// Write the full report as JSON to this path.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Grid-search VIX bands and stop/profit scalars.
    Sweep {
        /// Number of synthetic trades.
        #[arg(long, default_value_t = 60)]
        trades: usize,

        /// RNG seed for the trade generator.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Demo { rules } => run_demo(rules),
        Commands::Backtest {
            trades,
            seed,
            horizon,
            export,
        } => run_backtest(trades, seed, horizon, export),
        Commands::Sweep { trades, seed } => run_sweep(trades, seed),
    }
}

fn load_rules(path: Option<PathBuf>) -> Result<RegimeRuleSet> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading rule file {}", path.display()))?;
            RegimeRuleSet::from_toml_str(&text)
                .with_context(|| format!("parsing rule file {}", path.display()))
        }
        None => Ok(RegimeRuleSet::default()),
    }
}

/// Two real trades from the system's calibration data: EDN and ZIM, both
/// entered in a calm bull tape that rolled over.
fn run_demo(rules: Option<PathBuf>) -> Result<()> {
    let rules = load_rules(rules)?;
    let demo_trades = [
        (
            "EDN",
            45.66,
            1.35,
            [
                (44.65, 43.30, 44.65),
                (46.01, 43.33, 43.57),
                (44.28, 41.70, 42.62),
                (41.53, 36.76, 37.45),
                (38.55, 36.00, 36.95),
            ],
        ),
        (
            "ZIM",
            22.92,
            0.67,
            [
                (22.49, 22.32, 22.49),
                (23.00, 21.36, 21.45),
                (21.56, 20.36, 21.51),
                (21.12, 20.45, 20.72),
                (19.33, 18.54, 19.09),
            ],
        ),
    ];

    for (symbol, entry, true_range, days) in demo_trades {
        let mut book = PositionBook::new(rules.clone());
        let snapshot = MarketSnapshot::new(15.43, 0).with_t2108(45.0).with_momentum(1.2);

        println!("== {symbol} @ {entry:.2} ==");
        let receipt = book.open(symbol, entry, &snapshot, 100.0, Some(true_range))?;
        println!(
            "regime {:?}, stop {:.2} ({:+.1}%), hold limit {} days",
            receipt.regime,
            receipt.stop_level,
            receipt.stop_distance_pct,
            receipt.expected_hold_days
        );
        for target in &receipt.profit_targets {
            println!(
                "  target {}: {:.2} (+{:.1}%, closes {:.0}%)",
                target.level, target.price, target.pct, target.position_to_close
            );
        }

        for (i, (high, low, close)) in days.iter().enumerate() {
            let day_snapshot = MarketSnapshot::new(15.43, i as u32 + 1)
                .with_t2108(45.0)
                .with_momentum(1.2);
            let outcome = book.update(symbol, *high, *low, *close, &day_snapshot)?;

            print!("day {}: ", i + 1);
            if outcome.actions.is_empty() {
                println!(
                    "holding, mark {:+.1}%, remaining {:.0}%",
                    outcome.current_pnl.unwrap_or(0.0) * 100.0,
                    outcome.remaining_pct
                );
            }
            for action in &outcome.actions {
                match action {
                    PositionAction::StopLoss { price, pnl, .. } => {
                        println!("STOP at {:.2} ({:+.1}%)", price, pnl * 100.0)
                    }
                    PositionAction::ProfitTaken {
                        level, price, pnl, ..
                    } => println!("profit level {level} at {:.2} ({:+.1}%)", price, pnl * 100.0),
                    PositionAction::RegimeAdjusted {
                        old_stop, new_stop, reason, ..
                    } => println!("regime shift: stop {:.2} -> {:.2} ({reason})", old_stop, new_stop),
                    PositionAction::TimeExit { price, pnl, .. } => {
                        println!("time exit at {:.2} ({:+.1}%)", price, pnl * 100.0)
                    }
                    PositionAction::HorizonExit { price, pnl, .. } => {
                        println!("horizon exit at {:.2} ({:+.1}%)", price, pnl * 100.0)
                    }
                }
            }

            if outcome.status == PositionStatus::Closed {
                println!("closed after {} days, total {:+.1}%", outcome.days_held, outcome.realized_pnl * 100.0);
                break;
            }
        }

        let summary = book.portfolio_performance();
        println!(
            "trades {}, total return {:+.1}%\n",
            summary.total_trades,
            summary.total_return * 100.0
        );
    }

    Ok(())
}

fn run_backtest(
    trades: usize,
    seed: u64,
    horizon: usize,
    export: Option<PathBuf>,
) -> Result<()> {
    let trade_set = SampleTradeSet::new(trades, seed).generate();
    let config = BacktestConfig {
        baseline_horizon_days: horizon,
        ..BacktestConfig::default()
    };

    let report = run_multilayer(&trade_set, &config);
    print!("{}", render_text(&report));

    if let Some(path) = export {
        export_json(&report, &path)?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

fn run_sweep(trades: usize, seed: u64) -> Result<()> {
    let trade_set = SampleTradeSet::new(trades, seed).generate();
    let grid = SweepGrid::default_grid();
    println!("evaluating {} candidates over {} trades...", grid.size(), trades);

    let outcome = sweep(&trade_set, &grid, &BacktestConfig::default())
        .context("sweep needs a non-empty trade set")?;

    let best = &outcome.best;
    println!(
        "best: bands {:.0}/{:.0}/{:.0}, stop x{:.1}, profit x{:.1} -> score {:.2}",
        best.bands.low_to_bull,
        best.bands.bull_to_stress,
        best.bands.stress_to_crisis,
        best.stop_scalar,
        best.profit_scalar,
        best.composite_score
    );
    println!(
        "combined: total {:+.1}%, win rate {:.0}%, sharpe {:.2}, max dd {:.1}%",
        best.combined.summary.total_return * 100.0,
        best.combined.summary.win_rate * 100.0,
        best.combined.summary.sharpe_ratio,
        best.combined.summary.max_drawdown * 100.0
    );
    Ok(())
}
