//! Market regime taxonomy and VIX band boundaries.

use serde::{Deserialize, Serialize};

/// Discrete market-stress regime.
///
/// Variants are declared in ascending VIX-band order, and the derived `Ord`
/// follows that order: `LowVolComplacency < BullNormal < HighVolStress <
/// CrisisOpportunity`. "More severe" always means "greater".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RegimeType {
    /// VIX below the low/bull boundary (default [0, 15)).
    LowVolComplacency,
    /// Default [15, 30).
    BullNormal,
    /// Default [30, 50).
    HighVolStress,
    /// Default [50, ∞).
    CrisisOpportunity,
}

impl RegimeType {
    pub const ALL: [RegimeType; 4] = [
        RegimeType::LowVolComplacency,
        RegimeType::BullNormal,
        RegimeType::HighVolStress,
        RegimeType::CrisisOpportunity,
    ];

    /// Stable lowercase label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            RegimeType::LowVolComplacency => "low_vol_complacency",
            RegimeType::BullNormal => "bull_normal",
            RegimeType::HighVolStress => "high_vol_stress",
            RegimeType::CrisisOpportunity => "crisis_opportunity",
        }
    }
}

/// The three VIX boundaries separating the four regimes.
///
/// Bands are half-open on the left: a VIX exactly at a boundary belongs to
/// the band above it. The defaults (15/30/50) are the calibrated invariant;
/// parameter sweeps may construct alternative boundary sets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeBands {
    pub low_to_bull: f64,
    pub bull_to_stress: f64,
    pub stress_to_crisis: f64,
}

impl Default for RegimeBands {
    fn default() -> Self {
        Self {
            low_to_bull: 15.0,
            bull_to_stress: 30.0,
            stress_to_crisis: 50.0,
        }
    }
}

impl RegimeBands {
    pub fn new(low_to_bull: f64, bull_to_stress: f64, stress_to_crisis: f64) -> Self {
        assert!(
            low_to_bull > 0.0 && low_to_bull < bull_to_stress && bull_to_stress < stress_to_crisis,
            "regime bands must be positive and strictly ascending"
        );
        Self {
            low_to_bull,
            bull_to_stress,
            stress_to_crisis,
        }
    }

    /// Primary classification by VIX alone. Out-of-range values are accepted
    /// unclamped; validation is the caller's concern.
    pub fn classify_vix(&self, vix: f64) -> RegimeType {
        if vix >= self.stress_to_crisis {
            RegimeType::CrisisOpportunity
        } else if vix >= self.bull_to_stress {
            RegimeType::HighVolStress
        } else if vix >= self.low_to_bull {
            RegimeType::BullNormal
        } else {
            RegimeType::LowVolComplacency
        }
    }
}
