//! True Range — the volatility-normalization unit.

use std::collections::VecDeque;

/// Classic True Range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// Trailing window of True-Range observations for one symbol.
///
/// Each observation is pushed before the mean is taken, so a lone first
/// observation yields a volatility factor of exactly 1.0 and the factor
/// drifts away from 1.0 only as the current range diverges from its own
/// recent history.
#[derive(Debug, Clone)]
pub struct RollingTrueRange {
    window: VecDeque<f64>,
    capacity: usize,
}

impl RollingTrueRange {
    const DEFAULT_WINDOW: usize = 5;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_WINDOW)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 1, "window capacity must be >= 1");
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an observation and return the volatility factor
    /// `current / rolling_mean` (1.0 when the mean is degenerate).
    pub fn observe(&mut self, current: f64) -> f64 {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(current);

        let mean = self.window.iter().sum::<f64>() / self.window.len() as f64;
        if mean > 0.0 {
            current / mean
        } else {
            1.0
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

impl Default for RollingTrueRange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_range_picks_widest_measure() {
        // Plain range dominates.
        assert_eq!(true_range(105.0, 100.0, 102.0), 5.0);
        // Gap up: distance from previous close dominates.
        assert_eq!(true_range(110.0, 108.0, 100.0), 10.0);
        // Gap down.
        assert_eq!(true_range(95.0, 92.0, 100.0), 8.0);
    }

    #[test]
    fn first_observation_is_factor_one() {
        let mut rolling = RollingTrueRange::new();
        assert!((rolling.observe(2.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn factor_rises_on_expansion() {
        let mut rolling = RollingTrueRange::new();
        for _ in 0..5 {
            rolling.observe(1.0);
        }
        // Window becomes [1, 1, 1, 1, 2]: mean 1.2, factor 2/1.2.
        let factor = rolling.observe(2.0);
        assert!((factor - 2.0 / 1.2).abs() < 1e-12);
    }

    #[test]
    fn window_is_bounded() {
        let mut rolling = RollingTrueRange::new();
        for i in 0..10 {
            rolling.observe(i as f64 + 1.0);
        }
        assert_eq!(rolling.len(), 5);
        // Window is [6..=10]: mean 8, a matching observation slides it to
        // [7, 8, 9, 10, 8] with mean 8.4.
        let factor = rolling.observe(8.0);
        assert!((factor - 8.0 / 8.4).abs() < 1e-12);
    }

    #[test]
    fn degenerate_mean_defaults_to_one() {
        let mut rolling = RollingTrueRange::new();
        assert_eq!(rolling.observe(0.0), 1.0);
    }
}
