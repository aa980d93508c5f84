//! Market snapshot — one day's volatility/breadth/momentum observation.

use serde::{Deserialize, Serialize};

/// Immutable per-day market observation.
///
/// `vix` is required; breadth (`t2108`, a 0–100 percentile) and
/// `momentum_ratio` (positive, 1.0 = flat) are optional and simply absent
/// when the data source does not supply them. A new snapshot is created per
/// observation; the classified regime is derived, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub vix: f64,
    pub t2108: Option<f64>,
    pub momentum_ratio: Option<f64>,
    /// Sequence index of the observation day.
    pub day: u32,
}

impl MarketSnapshot {
    pub fn new(vix: f64, day: u32) -> Self {
        Self {
            vix,
            t2108: None,
            momentum_ratio: None,
            day,
        }
    }

    pub fn with_t2108(mut self, t2108: f64) -> Self {
        self.t2108 = Some(t2108);
        self
    }

    pub fn with_momentum(mut self, momentum_ratio: f64) -> Self {
        self.momentum_ratio = Some(momentum_ratio);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_optional_factors() {
        let snap = MarketSnapshot::new(18.5, 3).with_t2108(42.0).with_momentum(1.3);
        assert_eq!(snap.vix, 18.5);
        assert_eq!(snap.day, 3);
        assert_eq!(snap.t2108, Some(42.0));
        assert_eq!(snap.momentum_ratio, Some(1.3));
    }

    #[test]
    fn optional_factors_default_absent() {
        let snap = MarketSnapshot::new(22.0, 0);
        assert!(snap.t2108.is_none());
        assert!(snap.momentum_ratio.is_none());
    }
}
