//! Domain types: market snapshots, regimes, rule adjustments, positions, trades.

pub mod adjustment;
pub mod position;
pub mod regime;
pub mod snapshot;
pub mod trade;

pub use adjustment::RuleAdjustment;
pub use position::{PositionStatus, TradePosition};
pub use regime::{RegimeBands, RegimeType};
pub use snapshot::MarketSnapshot;
pub use trade::{ClosedTrade, ExitReason};
