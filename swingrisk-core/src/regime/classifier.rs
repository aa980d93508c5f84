//! Regime classifier — VIX bands first, breadth/momentum second.

use crate::domain::{MarketSnapshot, RegimeBands, RegimeType};

/// Maps a market snapshot to a regime.
///
/// Classification is VIX-band primary. When both breadth and momentum are
/// present they can shift the result by at most one severity step: weak
/// breadth plus weak momentum escalates, strong breadth plus strong momentum
/// de-escalates. Missing secondary inputs leave the primary classification
/// unchanged. There are no error conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegimeClassifier {
    bands: RegimeBands,
}

// Secondary-factor thresholds.
const WEAK_BREADTH: f64 = 20.0;
const STRONG_BREADTH: f64 = 60.0;
const WEAK_MOMENTUM: f64 = 0.8;
const STRONG_MOMENTUM: f64 = 2.0;
/// Bull-to-complacency de-escalation needs VIX below this.
const COMPLACENCY_VIX_CEILING: f64 = 20.0;

impl RegimeClassifier {
    pub fn new(bands: RegimeBands) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &RegimeBands {
        &self.bands
    }

    pub fn classify(&self, snapshot: &MarketSnapshot) -> RegimeType {
        let primary = self.bands.classify_vix(snapshot.vix);

        let (Some(t2108), Some(momentum)) = (snapshot.t2108, snapshot.momentum_ratio) else {
            return primary;
        };

        if t2108 < WEAK_BREADTH && momentum < WEAK_MOMENTUM {
            // Weak breadth and momentum: one step more severe. Crisis and
            // high-vol readings already price the stress in.
            match primary {
                RegimeType::BullNormal => RegimeType::HighVolStress,
                RegimeType::LowVolComplacency => RegimeType::BullNormal,
                other => other,
            }
        } else if t2108 > STRONG_BREADTH && momentum > STRONG_MOMENTUM {
            match primary {
                RegimeType::HighVolStress => RegimeType::BullNormal,
                RegimeType::BullNormal if snapshot.vix < COMPLACENCY_VIX_CEILING => {
                    RegimeType::LowVolComplacency
                }
                other => other,
            }
        } else {
            primary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(vix: f64) -> MarketSnapshot {
        MarketSnapshot::new(vix, 0)
    }

    #[test]
    fn primary_bands() {
        let c = RegimeClassifier::default();
        assert_eq!(c.classify(&snap(10.0)), RegimeType::LowVolComplacency);
        assert_eq!(c.classify(&snap(15.0)), RegimeType::BullNormal);
        assert_eq!(c.classify(&snap(30.0)), RegimeType::HighVolStress);
        assert_eq!(c.classify(&snap(50.0)), RegimeType::CrisisOpportunity);
    }

    #[test]
    fn weak_factors_escalate_one_step() {
        let c = RegimeClassifier::default();
        let bull = snap(20.0).with_t2108(10.0).with_momentum(0.5);
        assert_eq!(c.classify(&bull), RegimeType::HighVolStress);

        let calm = snap(10.0).with_t2108(10.0).with_momentum(0.5);
        assert_eq!(c.classify(&calm), RegimeType::BullNormal);
    }

    #[test]
    fn stress_does_not_escalate_to_crisis() {
        let c = RegimeClassifier::default();
        let stressed = snap(40.0).with_t2108(10.0).with_momentum(0.5);
        assert_eq!(c.classify(&stressed), RegimeType::HighVolStress);
    }

    #[test]
    fn strong_factors_deescalate() {
        let c = RegimeClassifier::default();
        let stressed = snap(35.0).with_t2108(70.0).with_momentum(2.5);
        assert_eq!(c.classify(&stressed), RegimeType::BullNormal);
    }

    #[test]
    fn bull_deescalates_only_below_vix_twenty() {
        let c = RegimeClassifier::default();
        let calm_bull = snap(18.0).with_t2108(70.0).with_momentum(2.5);
        assert_eq!(c.classify(&calm_bull), RegimeType::LowVolComplacency);

        let firm_bull = snap(25.0).with_t2108(70.0).with_momentum(2.5);
        assert_eq!(c.classify(&firm_bull), RegimeType::BullNormal);
    }

    #[test]
    fn crisis_never_deescalates() {
        let c = RegimeClassifier::default();
        let crisis = snap(55.0).with_t2108(70.0).with_momentum(2.5);
        assert_eq!(c.classify(&crisis), RegimeType::CrisisOpportunity);
    }

    #[test]
    fn missing_secondary_inputs_leave_primary_unchanged() {
        let c = RegimeClassifier::default();
        let breadth_only = snap(20.0).with_t2108(10.0);
        assert_eq!(c.classify(&breadth_only), RegimeType::BullNormal);

        let momentum_only = snap(20.0).with_momentum(0.5);
        assert_eq!(c.classify(&momentum_only), RegimeType::BullNormal);
    }

    #[test]
    fn mixed_factors_do_not_adjust() {
        let c = RegimeClassifier::default();
        // Weak breadth but strong momentum: neither rule fires.
        let mixed = snap(20.0).with_t2108(10.0).with_momentum(2.5);
        assert_eq!(c.classify(&mixed), RegimeType::BullNormal);
    }

    #[test]
    fn custom_bands_shift_boundaries() {
        let c = RegimeClassifier::new(RegimeBands::new(12.0, 25.0, 45.0));
        assert_eq!(c.classify(&snap(13.0)), RegimeType::BullNormal);
        assert_eq!(c.classify(&snap(27.0)), RegimeType::HighVolStress);
        assert_eq!(c.classify(&snap(46.0)), RegimeType::CrisisOpportunity);
    }
}
