//! Pairwise Elo rating for multiplayer rounds
//!
//! This module provides the rating model, the sequential engine that feeds
//! rounds through it, and the standings derived from the final state.

pub mod calculator;
pub mod elo;
pub mod engine;
pub mod standings;

// Re-export commonly used types
pub use calculator::RatingCalculator;
pub use elo::EloRatingCalculator;
pub use engine::{RatingEngine, RatingRun, RoundOutcome};
pub use standings::{rank, standings, win_percentage, Standing};
