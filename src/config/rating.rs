//! Rating system configuration

use serde::{Deserialize, Serialize};

use crate::error::RatingError;
use crate::types::TiePolicy;

/// Constants of the pairwise Elo update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Base of the expected-score curve (B)
    pub base: f64,
    /// Rating difference that shifts the odds by a factor of `base` (SEP)
    pub separation: f64,
    /// Maximum rating change per comparison (K)
    pub k_factor: f64,
    /// Rating every player starts with (START)
    pub initial_rating: f64,
    pub tie_policy: TiePolicy,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            base: 10.0,
            separation: 100.0,
            k_factor: 4.0,
            initial_rating: 100.0,
            tie_policy: TiePolicy::SingleSided,
        }
    }
}

impl RatingConfig {
    /// Wider separation, ratings drift apart more slowly
    pub fn stable() -> Self {
        Self {
            separation: 150.0,
            ..Self::default()
        }
    }

    /// Larger K, ratings react faster to recent rounds
    pub fn volatile() -> Self {
        Self {
            k_factor: 6.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        let fields = [
            ("base", self.base),
            ("separation", self.separation),
            ("k_factor", self.k_factor),
            ("initial_rating", self.initial_rating),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(RatingError::ConfigurationError {
                    message: format!("{} must be a finite number", name),
                }
                .into());
            }
        }

        if self.base <= 1.0 {
            return Err(RatingError::ConfigurationError {
                message: "Base must be greater than 1".to_string(),
            }
            .into());
        }

        if self.separation <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Separation must be positive".to_string(),
            }
            .into());
        }

        if self.k_factor <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "K factor must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
