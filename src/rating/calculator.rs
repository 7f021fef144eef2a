//! Rating calculator trait
//!
//! The engine only needs two things from a rating model: how likely one
//! player is to beat another, and how far a single comparison moves a rating.

use crate::types::Outcome;

/// Trait for pairwise rating models
pub trait RatingCalculator {
    /// Probability that a player rated `rating` outperforms one rated `opponent`
    fn expected_score(&self, rating: f64, opponent: f64) -> f64;

    /// Rating change for the player rated `rating` after `outcome` against `opponent`
    ///
    /// # Arguments
    /// * `rating` - Rating of the player being updated
    /// * `opponent` - Rating of the other player in the pair
    /// * `outcome` - Result from the updated player's point of view
    fn rating_change(&self, rating: f64, opponent: f64, outcome: Outcome) -> f64;

    /// Rating assigned to every player before the first round
    fn initial_rating(&self) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;
}
