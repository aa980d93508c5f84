//! Serializable backtest configuration with content-addressed run IDs.

use serde::{Deserialize, Serialize};

use swingrisk_core::{RegimeBands, RegimeRuleSet};

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Everything needed to reproduce a multi-layer backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Uniform scalar applied to stop rules (percentage stop and TR stop
    /// multiplier) across all regimes.
    pub stop_scalar: f64,
    /// Uniform scalar applied to profit rules across all regimes.
    pub profit_scalar: f64,
    /// Baseline exit horizon in days (1-based; day 2 is the strategy's
    /// historical default exit).
    pub baseline_horizon_days: usize,
    /// VIX band boundaries for classification.
    pub bands: RegimeBands,
    /// Regime rule bundles (before scalar adjustment).
    pub rules: RegimeRuleSet,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            stop_scalar: 1.0,
            profit_scalar: 1.0,
            baseline_horizon_days: 2,
            bands: RegimeBands::default(),
            rules: RegimeRuleSet::default(),
        }
    }
}

impl BacktestConfig {
    /// Deterministic hash ID for this configuration. Two identical configs
    /// share a RunId, so sweep results are identifiable and cacheable.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Rule set with the stop/profit scalars folded in.
    pub fn scaled_rules(&self) -> RegimeRuleSet {
        let mut rules = self.rules.clone();
        for regime in swingrisk_core::RegimeType::ALL {
            let config = rules.get_mut(regime);
            config.stop_loss_pct *= self.stop_scalar;
            config.tr_stop_multiplier *= self.stop_scalar;
            for level in config.profit_levels_pct.iter_mut() {
                *level *= self.profit_scalar;
            }
            for mult in config.tr_profit_multipliers.iter_mut() {
                *mult *= self.profit_scalar;
            }
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_is_stable_and_content_addressed() {
        let a = BacktestConfig::default();
        let b = BacktestConfig::default();
        assert_eq!(a.run_id(), b.run_id());

        let c = BacktestConfig {
            stop_scalar: 1.2,
            ..BacktestConfig::default()
        };
        assert_ne!(a.run_id(), c.run_id());
    }

    #[test]
    fn scaled_rules_fold_in_both_scalars() {
        let config = BacktestConfig {
            stop_scalar: 0.8,
            profit_scalar: 1.1,
            ..BacktestConfig::default()
        };
        let scaled = config.scaled_rules();
        let base = RegimeRuleSet::default();

        let b = base.get(swingrisk_core::RegimeType::BullNormal);
        let s = scaled.get(swingrisk_core::RegimeType::BullNormal);
        assert!((s.stop_loss_pct - b.stop_loss_pct * 0.8).abs() < 1e-12);
        assert!((s.tr_stop_multiplier - b.tr_stop_multiplier * 0.8).abs() < 1e-12);
        assert!((s.profit_levels_pct[1] - b.profit_levels_pct[1] * 1.1).abs() < 1e-12);
        assert!((s.tr_profit_multipliers[2] - b.tr_profit_multipliers[2] * 1.1).abs() < 1e-12);
        // Scaling slices and hold time are untouched by the scalars.
        assert_eq!(s.position_scaling_pct, b.position_scaling_pct);
        assert_eq!(s.max_hold_days, b.max_hold_days);
    }

    #[test]
    fn scaled_rules_stay_valid_for_moderate_scalars() {
        for stop in [0.7, 1.0, 1.3] {
            for profit in [0.8, 1.0, 1.2] {
                let config = BacktestConfig {
                    stop_scalar: stop,
                    profit_scalar: profit,
                    ..BacktestConfig::default()
                };
                config.scaled_rules().validate().unwrap();
            }
        }
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = BacktestConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: BacktestConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
