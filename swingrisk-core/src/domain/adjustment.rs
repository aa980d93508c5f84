//! Rule adjustment — the multiplicative output of transition detection.

use serde::{Deserialize, Serialize};

use crate::config::RegimeConfig;

/// Multiplicative rescaling of a regime's rule bundle.
///
/// `stop_multiplier` and `profit_multiplier` compose by product across
/// causes; `urgency_factor` composes by max. `reason` accumulates a
/// human-readable trace of every rule that fired. Ephemeral: recomputed on
/// every transition check and never stored apart from the position it was
/// applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAdjustment {
    pub stop_multiplier: f64,
    pub profit_multiplier: f64,
    pub urgency_factor: f64,
    pub reason: String,
}

impl Default for RuleAdjustment {
    fn default() -> Self {
        Self {
            stop_multiplier: 1.0,
            profit_multiplier: 1.0,
            urgency_factor: 1.0,
            reason: String::new(),
        }
    }
}

impl RuleAdjustment {
    /// True when no rule fired: all multipliers at identity.
    pub fn is_neutral(&self) -> bool {
        self.stop_multiplier == 1.0
            && self.profit_multiplier == 1.0
            && self.urgency_factor == 1.0
    }

    pub fn push_reason(&mut self, reason: impl AsRef<str>) {
        self.reason.push_str(reason.as_ref());
        self.reason.push_str("; ");
    }

    /// Rescale a regime config by this adjustment.
    ///
    /// Stops and TR stop multiplier scale by `stop_multiplier`; profit levels
    /// and TR profit multipliers by `profit_multiplier`. Hold time shrinks by
    /// `urgency_factor` (floored, never below one day) only when urgency is
    /// elevated.
    pub fn apply_to(&self, config: &RegimeConfig) -> RegimeConfig {
        let mut adjusted = config.clone();

        adjusted.stop_loss_pct *= self.stop_multiplier;
        adjusted.tr_stop_multiplier *= self.stop_multiplier;

        for level in adjusted.profit_levels_pct.iter_mut() {
            *level *= self.profit_multiplier;
        }
        for mult in adjusted.tr_profit_multipliers.iter_mut() {
            *mult *= self.profit_multiplier;
        }

        if self.urgency_factor > 1.0 {
            let shortened = (f64::from(config.max_hold_days) / self.urgency_factor).floor();
            adjusted.max_hold_days = (shortened as u32).max(1);
        }

        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegimeRuleSet;
    use crate::domain::RegimeType;

    #[test]
    fn default_is_neutral() {
        let adj = RuleAdjustment::default();
        assert!(adj.is_neutral());
        assert!(adj.reason.is_empty());
    }

    #[test]
    fn neutral_apply_is_identity() {
        let rules = RegimeRuleSet::default();
        let base = rules.get(RegimeType::BullNormal);
        let adjusted = RuleAdjustment::default().apply_to(base);
        assert_eq!(&adjusted, base);
    }

    #[test]
    fn multipliers_rescale_levels() {
        let rules = RegimeRuleSet::default();
        let base = rules.get(RegimeType::BullNormal);
        let adj = RuleAdjustment {
            stop_multiplier: 1.5,
            profit_multiplier: 1.2,
            urgency_factor: 1.0,
            reason: "VIX spike +20.0; ".into(),
        };
        let adjusted = adj.apply_to(base);

        assert!((adjusted.stop_loss_pct - base.stop_loss_pct * 1.5).abs() < 1e-12);
        assert!((adjusted.tr_stop_multiplier - base.tr_stop_multiplier * 1.5).abs() < 1e-12);
        for i in 0..3 {
            assert!(
                (adjusted.profit_levels_pct[i] - base.profit_levels_pct[i] * 1.2).abs() < 1e-12
            );
            assert!(
                (adjusted.tr_profit_multipliers[i] - base.tr_profit_multipliers[i] * 1.2).abs()
                    < 1e-12
            );
        }
        // Urgency at identity leaves hold time alone.
        assert_eq!(adjusted.max_hold_days, base.max_hold_days);
    }

    #[test]
    fn urgency_shortens_hold_time_with_floor() {
        let rules = RegimeRuleSet::default();
        let base = rules.get(RegimeType::BullNormal); // max_hold_days = 3
        let adj = RuleAdjustment {
            urgency_factor: 2.0,
            ..RuleAdjustment::default()
        };
        assert_eq!(adj.apply_to(base).max_hold_days, 1);

        let extreme = RuleAdjustment {
            urgency_factor: 10.0,
            ..RuleAdjustment::default()
        };
        assert_eq!(extreme.apply_to(base).max_hold_days, 1);
    }

    #[test]
    fn low_urgency_never_extends_hold_time() {
        let rules = RegimeRuleSet::default();
        let base = rules.get(RegimeType::CrisisOpportunity); // max_hold_days = 4
        let adj = RuleAdjustment {
            urgency_factor: 0.7,
            ..RuleAdjustment::default()
        };
        assert_eq!(adj.apply_to(base).max_hold_days, 4);
    }

    #[test]
    fn push_reason_accumulates() {
        let mut adj = RuleAdjustment::default();
        adj.push_reason("VIX spike +20.0");
        adj.push_reason("Breadth surge +25.0");
        assert_eq!(adj.reason, "VIX spike +20.0; Breadth surge +25.0; ");
    }
}
