//! Parameter sweep over VIX bands and rule scalars.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use swingrisk_core::RegimeBands;

use crate::config::{BacktestConfig, RunId};
use crate::layers::{run_layer, LayerReport, RuleLayer};
use crate::trades::HistoricalTrade;

/// Grid of candidate parameters.
///
/// Each candidate is a (band set × stop scalar × profit scalar) combination;
/// the combined layer is re-run per candidate and ranked by composite score.
#[derive(Debug, Clone)]
pub struct SweepGrid {
    pub band_sets: Vec<RegimeBands>,
    pub stop_scalars: Vec<f64>,
    pub profit_scalars: Vec<f64>,
}

impl SweepGrid {
    /// A small default grid around the calibrated parameters.
    pub fn default_grid() -> Self {
        Self {
            band_sets: vec![
                RegimeBands::default(),
                RegimeBands::new(12.0, 25.0, 45.0),
                RegimeBands::new(18.0, 35.0, 55.0),
            ],
            stop_scalars: vec![0.8, 1.0, 1.2],
            profit_scalars: vec![0.9, 1.0, 1.1],
        }
    }

    pub fn size(&self) -> usize {
        self.band_sets.len() * self.stop_scalars.len() * self.profit_scalars.len()
    }

    /// All candidate configs, derived from `base`.
    pub fn candidates(&self, base: &BacktestConfig) -> Vec<BacktestConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &bands in &self.band_sets {
            for &stop_scalar in &self.stop_scalars {
                for &profit_scalar in &self.profit_scalars {
                    configs.push(BacktestConfig {
                        bands,
                        stop_scalar,
                        profit_scalar,
                        ..base.clone()
                    });
                }
            }
        }
        configs
    }
}

/// One evaluated sweep candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateOutcome {
    pub run_id: RunId,
    pub bands: RegimeBands,
    pub stop_scalar: f64,
    pub profit_scalar: f64,
    pub composite_score: f64,
    pub combined: LayerReport,
}

/// Sweep result: every candidate, plus the winner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub best: CandidateOutcome,
    pub evaluated: Vec<CandidateOutcome>,
}

/// Evaluate the grid, re-running the combined layer per candidate.
///
/// Candidates are independent and run in parallel. Returns `None` for an
/// empty grid or trade set.
pub fn sweep(
    trades: &[HistoricalTrade],
    grid: &SweepGrid,
    base: &BacktestConfig,
) -> Option<SweepOutcome> {
    if trades.is_empty() {
        return None;
    }

    let evaluated: Vec<CandidateOutcome> = grid
        .candidates(base)
        .par_iter()
        .map(|config| {
            let combined = run_layer(RuleLayer::Combined, trades, config);
            CandidateOutcome {
                run_id: config.run_id(),
                bands: config.bands,
                stop_scalar: config.stop_scalar,
                profit_scalar: config.profit_scalar,
                composite_score: combined.composite_score,
                combined,
            }
        })
        .collect();

    let best = evaluated
        .iter()
        .max_by(|a, b| {
            a.composite_score
                .partial_cmp(&b.composite_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })?
        .clone();

    Some(SweepOutcome { best, evaluated })
}
