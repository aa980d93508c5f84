//! SwingRisk Core — regime-aware risk rules for swing-trade positions.
//!
//! This crate contains the decision engine:
//! - Domain types (market snapshots, regimes, rule adjustments, positions, trades)
//! - Regime classification from volatility, breadth, and momentum
//! - Adaptive stop-loss and staged profit-ladder computation
//! - Regime-transition detection with emergency override protocols
//! - Position lifecycle state machine with strict rule priority
//! - Portfolio performance aggregation
//!
//! Everything is synchronous, in-memory, and deterministic: the engine
//! computes rule outputs from supplied inputs and performs no I/O.

pub mod config;
pub mod domain;
pub mod error;
pub mod levels;
pub mod lifecycle;
pub mod performance;
pub mod regime;

pub use config::{ConfigError, RegimeConfig, RegimeRuleSet};
pub use domain::{
    ClosedTrade, ExitReason, MarketSnapshot, PositionStatus, RegimeBands, RegimeType,
    RuleAdjustment, TradePosition,
};
pub use error::RiskError;
pub use lifecycle::{OpenReceipt, PositionAction, PositionBook, UpdateOutcome};
pub use performance::PortfolioSummary;
pub use regime::{RegimeClassifier, RegimeTransitionManager};
