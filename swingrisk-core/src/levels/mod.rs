//! Price-level computation: adaptive stops and the staged profit ladder.

pub mod profit;
pub mod stop;
pub mod true_range;

pub use profit::{profit_ladder, ProfitTarget};
pub use stop::{AdaptiveStopEngine, StopDecision};
pub use true_range::{true_range, RollingTrueRange};

use serde::{Deserialize, Serialize};

/// Which rule produced a level: the volatility-normalized True-Range rule or
/// the plain percentage rule. Carried for observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelMethod {
    TrBased,
    PctBased,
}
