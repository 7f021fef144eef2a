//! Logistic Elo rating model
//!
//! Expected score follows `1 / (1 + B^((opponent - rating) / SEP))` and a
//! comparison moves the rating by `K * (actual - expected)`.

use crate::config::RatingConfig;
use crate::rating::calculator::RatingCalculator;
use crate::types::Outcome;

/// Elo rating calculator implementation
#[derive(Debug, Clone, Default)]
pub struct EloRatingCalculator {
    config: RatingConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn rating_config(&self) -> &RatingConfig {
        &self.config
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn expected_score(&self, rating: f64, opponent: f64) -> f64 {
        let exponent = (opponent - rating) / self.config.separation;
        1.0 / (1.0 + self.config.base.powf(exponent))
    }

    fn rating_change(&self, rating: f64, opponent: f64, outcome: Outcome) -> f64 {
        self.config.k_factor * (outcome.score() - self.expected_score(rating, opponent))
    }

    fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }
}
