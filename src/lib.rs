//! Disc Golf Ratings - pairwise Elo ratings for a disc golf group
//!
//! This crate reads a log of multiplayer rounds, rates every player by
//! comparing them pairwise within each round, and renders a static report
//! with standings, recent rounds and a rating history chart.

pub mod config;
pub mod error;
pub mod ingest;
pub mod rating;
pub mod report;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{RatingCalculator, RatingEngine, RatingRun};
pub use service::ReportService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
