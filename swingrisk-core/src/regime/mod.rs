//! Regime classification and transition detection.

pub mod classifier;
pub mod transition;

pub use classifier::RegimeClassifier;
pub use transition::{RegimeTransitionManager, TransitionOutcome, TransitionRecord};
