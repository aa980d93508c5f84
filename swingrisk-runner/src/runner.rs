//! Multi-layer backtest orchestration.

use serde::{Deserialize, Serialize};

use crate::config::{BacktestConfig, RunId};
use crate::layers::{run_layer, LayerReport, RuleLayer};
use crate::trades::HistoricalTrade;

/// Full comparative result: one report per isolation layer, ranked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub run_id: RunId,
    pub trade_count: usize,
    /// Reports in canonical layer order (baseline → combined).
    pub layers: Vec<LayerReport>,
    /// The layer with the best composite score.
    pub best_layer: RuleLayer,
}

impl BacktestReport {
    pub fn layer(&self, layer: RuleLayer) -> &LayerReport {
        self.layers
            .iter()
            .find(|r| r.layer == layer)
            .expect("all four layers are always present")
    }

    /// Layers sorted best-first by composite score.
    pub fn ranked(&self) -> Vec<&LayerReport> {
        let mut ranked: Vec<&LayerReport> = self.layers.iter().collect();
        ranked.sort_by(|a, b| {
            b.composite_score
                .partial_cmp(&a.composite_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

/// Replay the trade set through all four isolation layers.
pub fn run_multilayer(trades: &[HistoricalTrade], config: &BacktestConfig) -> BacktestReport {
    let layers: Vec<LayerReport> = RuleLayer::ALL
        .iter()
        .map(|&layer| run_layer(layer, trades, config))
        .collect();

    let best_layer = layers
        .iter()
        .max_by(|a, b| {
            a.composite_score
                .partial_cmp(&b.composite_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|r| r.layer)
        .unwrap_or(RuleLayer::Baseline);

    BacktestReport {
        run_id: config.run_id(),
        trade_count: trades.len(),
        layers,
        best_layer,
    }
}
