//! Per-regime rule bundles, validated once at load time.
//!
//! Each regime carries a fixed struct of constants — percentage stop, the
//! three-level profit ladder, position scaling, True-Range multipliers, and
//! a hold-time limit. The defaults are the calibrated production table; a
//! rule set can also be loaded from TOML and is rejected up front if any
//! bundle is malformed. Runtime code may assume a validated rule set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RegimeType;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{regime}: stop_loss_pct must be negative, got {value}")]
    StopNotNegative { regime: &'static str, value: f64 },

    #[error("{regime}: profit_levels_pct must be positive and ascending, got {values:?}")]
    ProfitLevelsInvalid {
        regime: &'static str,
        values: [f64; 3],
    },

    #[error(
        "{regime}: position_scaling_pct must be strictly ascending and end at 100, got {values:?}"
    )]
    ScalingInvalid {
        regime: &'static str,
        values: [f64; 3],
    },

    #[error("{regime}: True-Range multipliers must be positive and ascending")]
    TrMultipliersInvalid { regime: &'static str },

    #[error("{regime}: max_hold_days must be at least 1")]
    MaxHoldZero { regime: &'static str },

    #[error("failed to parse rule set: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Constant rule bundle for one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeConfig {
    /// Base percentage stop, negative (e.g. -8.0 = stop 8% below entry).
    pub stop_loss_pct: f64,
    /// Ascending profit-target percentages above entry.
    pub profit_levels_pct: [f64; 3],
    /// Cumulative percent of the position closed at each level; last = 100.
    pub position_scaling_pct: [f64; 3],
    /// True-Range multiple for the volatility stop.
    pub tr_stop_multiplier: f64,
    /// True-Range multiples for the three profit targets.
    pub tr_profit_multipliers: [f64; 3],
    /// Hold-time limit in days.
    pub max_hold_days: u32,
}

impl RegimeConfig {
    fn validate(&self, regime: RegimeType) -> Result<(), ConfigError> {
        let name = regime.label();

        if self.stop_loss_pct >= 0.0 {
            return Err(ConfigError::StopNotNegative {
                regime: name,
                value: self.stop_loss_pct,
            });
        }

        let p = &self.profit_levels_pct;
        if p[0] <= 0.0 || p[1] <= p[0] || p[2] <= p[1] {
            return Err(ConfigError::ProfitLevelsInvalid {
                regime: name,
                values: *p,
            });
        }

        let s = &self.position_scaling_pct;
        if s[0] <= 0.0 || s[1] <= s[0] || s[2] <= s[1] || s[2] != 100.0 {
            return Err(ConfigError::ScalingInvalid {
                regime: name,
                values: *s,
            });
        }

        let t = &self.tr_profit_multipliers;
        if self.tr_stop_multiplier <= 0.0 || t[0] <= 0.0 || t[1] <= t[0] || t[2] <= t[1] {
            return Err(ConfigError::TrMultipliersInvalid { regime: name });
        }

        if self.max_hold_days == 0 {
            return Err(ConfigError::MaxHoldZero { regime: name });
        }

        Ok(())
    }
}

/// One validated `RegimeConfig` per regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeRuleSet {
    pub crisis_opportunity: RegimeConfig,
    pub high_vol_stress: RegimeConfig,
    pub bull_normal: RegimeConfig,
    pub low_vol_complacency: RegimeConfig,
}

impl Default for RegimeRuleSet {
    /// The calibrated production table: wider stops and more ambitious
    /// targets as volatility rises, tight early profit-taking in calm tape.
    fn default() -> Self {
        Self {
            crisis_opportunity: RegimeConfig {
                stop_loss_pct: -15.0,
                profit_levels_pct: [20.0, 35.0, 50.0],
                position_scaling_pct: [25.0, 50.0, 100.0],
                tr_stop_multiplier: 2.5,
                tr_profit_multipliers: [3.0, 5.0, 7.0],
                max_hold_days: 4,
            },
            high_vol_stress: RegimeConfig {
                stop_loss_pct: -12.0,
                profit_levels_pct: [15.0, 28.0, 45.0],
                position_scaling_pct: [25.0, 50.0, 100.0],
                tr_stop_multiplier: 2.0,
                tr_profit_multipliers: [2.5, 4.0, 6.0],
                max_hold_days: 3,
            },
            bull_normal: RegimeConfig {
                stop_loss_pct: -8.0,
                profit_levels_pct: [12.0, 25.0, 40.0],
                position_scaling_pct: [25.0, 50.0, 100.0],
                tr_stop_multiplier: 1.8,
                tr_profit_multipliers: [2.0, 3.5, 5.5],
                max_hold_days: 3,
            },
            low_vol_complacency: RegimeConfig {
                stop_loss_pct: -5.0,
                profit_levels_pct: [8.0, 15.0, 25.0],
                position_scaling_pct: [30.0, 60.0, 100.0],
                tr_stop_multiplier: 1.2,
                tr_profit_multipliers: [1.8, 3.0, 4.5],
                max_hold_days: 2,
            },
        }
    }
}

impl RegimeRuleSet {
    pub fn get(&self, regime: RegimeType) -> &RegimeConfig {
        match regime {
            RegimeType::CrisisOpportunity => &self.crisis_opportunity,
            RegimeType::HighVolStress => &self.high_vol_stress,
            RegimeType::BullNormal => &self.bull_normal,
            RegimeType::LowVolComplacency => &self.low_vol_complacency,
        }
    }

    pub fn get_mut(&mut self, regime: RegimeType) -> &mut RegimeConfig {
        match regime {
            RegimeType::CrisisOpportunity => &mut self.crisis_opportunity,
            RegimeType::HighVolStress => &mut self.high_vol_stress,
            RegimeType::BullNormal => &mut self.bull_normal,
            RegimeType::LowVolComplacency => &mut self.low_vol_complacency,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for regime in RegimeType::ALL {
            self.get(regime).validate(regime)?;
        }
        Ok(())
    }

    /// Parse and validate a rule set from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let rules: Self = toml::from_str(text)?;
        rules.validate()?;
        Ok(rules)
    }
}
