//! Historical trade inputs and synthetic trade-set generation.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use swingrisk_core::levels::true_range;

/// One day's price bar for a trade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailyBar {
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// One historical trade: an entry plus the daily bars that followed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalTrade {
    pub symbol: String,
    pub entry_price: f64,
    pub entry_date: Option<NaiveDate>,
    /// VIX at entry.
    pub vix: f64,
    pub t2108: Option<f64>,
    pub momentum_ratio: Option<f64>,
    pub days: Vec<DailyBar>,
}

impl HistoricalTrade {
    /// True Range over the first two days, falling back to the first day's
    /// plain range (or 2% of entry with no bars at all).
    pub fn entry_true_range(&self) -> f64 {
        match self.days.len() {
            0 => self.entry_price * 0.02,
            1 => (self.days[0].high - self.days[0].low).max(self.entry_price * 0.005),
            _ => true_range(self.days[1].high, self.days[1].low, self.days[0].close)
                .max(self.entry_price * 0.005),
        }
    }
}

/// Seeded synthetic trade-set generator.
///
/// Entries are drawn across a broad price range, VIX is exponential (mostly
/// calm, occasionally stressed), and each trade gets a five-day random walk
/// whose daily spread scales with the drawn VIX. Deterministic per seed.
#[derive(Debug, Clone)]
pub struct SampleTradeSet {
    pub count: usize,
    pub seed: u64,
    pub days_per_trade: usize,
}

impl SampleTradeSet {
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            days_per_trade: 5,
        }
    }

    pub fn generate(&self) -> Vec<HistoricalTrade> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        (0..self.count)
            .map(|i| {
                let entry_price = rng.gen_range(15.0..100.0);
                // Exponential-ish VIX via inverse transform, clamped to a
                // realistic tape.
                let u: f64 = rng.gen_range(0.0001..1.0);
                let vix = (-u.ln() * 20.0).clamp(9.0, 85.0);
                let volatility = 0.02 * (1.0 + vix / 50.0);

                let mut days = Vec::with_capacity(self.days_per_trade);
                let mut price = entry_price;
                for _ in 0..self.days_per_trade {
                    // Slight positive drift, VIX-scaled noise.
                    let ret = 0.005 + volatility * rng.gen_range(-2.0..2.0);
                    let close = price * (1.0 + ret);
                    let spread = ret.abs() * 1.2 + volatility * 0.5;
                    days.push(DailyBar {
                        high: price * (1.0 + spread),
                        low: price * (1.0 - spread),
                        close,
                    });
                    price = close;
                }

                HistoricalTrade {
                    symbol: format!("SIM{i:04}"),
                    entry_price,
                    entry_date: Some(base_date + chrono::Duration::days(i as i64)),
                    vix,
                    t2108: Some(rng.gen_range(10.0..70.0)),
                    momentum_ratio: Some(rng.gen_range(0.3..2.5)),
                    days,
                }
            })
            .collect()
    }
}
