//! Regime transition detection and rule adjustment.
//!
//! Compares two consecutive market snapshots, classifies both, and derives a
//! multiplicative [`RuleAdjustment`] from the raw deltas. Extreme single-step
//! moves trip an emergency protocol that replaces the delta-based adjustment
//! outright. Detected transitions are appended to an owned, append-only
//! record log — the manager is an explicit object, never process-global
//! state.

use serde::{Deserialize, Serialize};

use crate::domain::{MarketSnapshot, RegimeType, RuleAdjustment};
use crate::regime::classifier::RegimeClassifier;

// Delta thresholds for the base adjustment.
const VIX_MAJOR_CHANGE: f64 = 15.0;
const T2108_COLLAPSE: f64 = -25.0;
const T2108_SURGE: f64 = 20.0;
const MOMENTUM_COLLAPSE_RATIO: f64 = 0.5;
const MOMENTUM_SURGE_RATIO: f64 = 2.0;

// Emergency protocol triggers.
const EMERGENCY_BREADTH_DROP: f64 = -30.0;
const EMERGENCY_VIX_LEVEL: f64 = 60.0;
const EMERGENCY_VIX_JUMP: f64 = 20.0;
const EMERGENCY_MOMENTUM_FLOOR: f64 = 0.1;
const EMERGENCY_MOMENTUM_PRIOR: f64 = 1.0;

/// Result of one transition check.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// True when the classified regime differs from the previous snapshot's.
    pub transition_detected: bool,
    /// Regime classified from the current snapshot.
    pub regime: RegimeType,
    pub adjustment: RuleAdjustment,
}

/// One entry in the transition history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub day: u32,
    pub old_regime: RegimeType,
    pub new_regime: RegimeType,
    pub vix: f64,
    pub t2108: Option<f64>,
    pub momentum_ratio: Option<f64>,
    pub stop_multiplier: f64,
    pub profit_multiplier: f64,
    pub urgency_factor: f64,
    pub reason: String,
}

/// Detects regime changes between consecutive snapshots.
#[derive(Debug, Clone, Default)]
pub struct RegimeTransitionManager {
    classifier: RegimeClassifier,
    history: Vec<TransitionRecord>,
}

impl RegimeTransitionManager {
    pub fn new(classifier: RegimeClassifier) -> Self {
        Self {
            classifier,
            history: Vec::new(),
        }
    }

    /// Append-only log of detected transitions.
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Classify the current snapshot and compute the rule adjustment implied
    /// by the move from `previous`.
    ///
    /// Without a previous snapshot there is nothing to compare: no
    /// transition, default adjustment. An emergency protocol, when tripped,
    /// replaces the delta-based adjustment rather than composing with it.
    pub fn detect(
        &mut self,
        current: &MarketSnapshot,
        previous: Option<&MarketSnapshot>,
    ) -> TransitionOutcome {
        let regime = self.classifier.classify(current);

        let Some(previous) = previous else {
            return TransitionOutcome {
                transition_detected: false,
                regime,
                adjustment: RuleAdjustment::default(),
            };
        };

        let previous_regime = self.classifier.classify(previous);
        let transition_detected = regime != previous_regime;

        let mut adjustment = base_adjustment(current, previous);
        if let Some(emergency) = emergency_adjustment(current, previous) {
            adjustment = emergency;
        }

        if transition_detected {
            self.history.push(TransitionRecord {
                day: current.day,
                old_regime: previous_regime,
                new_regime: regime,
                vix: current.vix,
                t2108: current.t2108,
                momentum_ratio: current.momentum_ratio,
                stop_multiplier: adjustment.stop_multiplier,
                profit_multiplier: adjustment.profit_multiplier,
                urgency_factor: adjustment.urgency_factor,
                reason: adjustment.reason.clone(),
            });
        }

        TransitionOutcome {
            transition_detected,
            regime,
            adjustment,
        }
    }
}

/// Delta-driven adjustment, independent of whether the regime enum changed.
fn base_adjustment(current: &MarketSnapshot, previous: &MarketSnapshot) -> RuleAdjustment {
    let mut adj = RuleAdjustment::default();

    let vix_change = current.vix - previous.vix;
    if vix_change.abs() > VIX_MAJOR_CHANGE {
        if vix_change > 0.0 {
            // Rising stress: widen stops, extend profits slightly.
            adj.stop_multiplier *= 1.2 + vix_change / 50.0;
            adj.profit_multiplier *= 1.1 + vix_change / 100.0;
            adj.push_reason(format!("VIX spike +{vix_change:.1}"));
        } else {
            adj.stop_multiplier *= 0.9 + vix_change / 100.0;
            adj.profit_multiplier *= 0.95 + vix_change / 200.0;
            adj.push_reason(format!("VIX decline {vix_change:.1}"));
        }
    }

    if let (Some(t_now), Some(t_prev)) = (current.t2108, previous.t2108) {
        let t_change = t_now - t_prev;
        if t_change < T2108_COLLAPSE {
            adj.stop_multiplier *= 0.7;
            adj.profit_multiplier *= 0.8;
            adj.urgency_factor = adj.urgency_factor.max(2.0);
            adj.push_reason(format!("Breadth collapse {t_change:.1}"));
        } else if t_change > T2108_SURGE {
            adj.profit_multiplier *= 1.3;
            adj.push_reason(format!("Breadth surge +{t_change:.1}"));
        }
    }

    if let (Some(m_now), Some(m_prev)) = (current.momentum_ratio, previous.momentum_ratio) {
        let m_change = m_now / m_prev;
        if m_change < MOMENTUM_COLLAPSE_RATIO {
            adj.stop_multiplier *= 0.8;
            adj.urgency_factor = adj.urgency_factor.max(1.5);
            adj.push_reason(format!("Momentum collapse {m_change:.2}x"));
        } else if m_change > MOMENTUM_SURGE_RATIO {
            adj.profit_multiplier *= 1.2;
            adj.push_reason(format!("Momentum surge {m_change:.2}x"));
        }
    }

    adj
}

/// Emergency protocols for extreme single-step moves. The first protocol
/// that triggers wins; its adjustment replaces the base adjustment.
fn emergency_adjustment(
    current: &MarketSnapshot,
    previous: &MarketSnapshot,
) -> Option<RuleAdjustment> {
    if let (Some(t_now), Some(t_prev)) = (current.t2108, previous.t2108) {
        if t_now - t_prev < EMERGENCY_BREADTH_DROP {
            return Some(RuleAdjustment {
                stop_multiplier: 0.6,
                profit_multiplier: 0.7,
                urgency_factor: 2.0,
                reason: "EMERGENCY: breadth collapse protocol".into(),
            });
        }
    }

    if current.vix > EMERGENCY_VIX_LEVEL && current.vix - previous.vix > EMERGENCY_VIX_JUMP {
        return Some(RuleAdjustment {
            stop_multiplier: 1.5,
            profit_multiplier: 1.4,
            urgency_factor: 0.7,
            reason: "EMERGENCY: volatility explosion protocol".into(),
        });
    }

    if let (Some(m_now), Some(m_prev)) = (current.momentum_ratio, previous.momentum_ratio) {
        if m_now < EMERGENCY_MOMENTUM_FLOOR && m_prev > EMERGENCY_MOMENTUM_PRIOR {
            return Some(RuleAdjustment {
                stop_multiplier: 0.5,
                profit_multiplier: 0.6,
                urgency_factor: 3.0,
                reason: "EMERGENCY: momentum collapse protocol".into(),
            });
        }
    }

    None
}
