//! Error taxonomy for the risk engine.
//!
//! Every error is raised synchronously before any state mutation: a rejected
//! open leaves the book untouched, a rejected update creates nothing. Level
//! clamps (stop bounds, band edges) are silent corrections, not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    /// Malformed caller input (non-positive price, bad position size).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An open was attempted for a symbol that is already active.
    #[error("position {0} already exists")]
    DuplicatePosition(String),

    /// An update or close referenced a symbol with no active position.
    #[error("position {0} not found")]
    PositionNotFound(String),
}
