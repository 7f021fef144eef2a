//! Common types used throughout the rating engine and report

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RatingError;

/// Unique identifier for players (their display name)
pub type PlayerId = String;

/// Result of one pairwise comparison from the perspective of one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    /// Actual score used by the Elo update
    pub fn score(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
            Outcome::Tie => 0.5,
        }
    }
}

impl TryFrom<f64> for Outcome {
    type Error = RatingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value == 1.0 {
            Ok(Outcome::Win)
        } else if value == 0.0 {
            Ok(Outcome::Loss)
        } else if value == 0.5 {
            Ok(Outcome::Tie)
        } else {
            Err(RatingError::InvalidOutcome { value })
        }
    }
}

/// How a tied pair is booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Only the first player of the pair (in roster order) receives the tie
    /// adjustment and the tie count
    #[default]
    SingleSided,
    /// Both players of the pair receive their adjustment and a tie count
    Symmetric,
}

impl std::fmt::Display for TiePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TiePolicy::SingleSided => write!(f, "single_sided"),
            TiePolicy::Symmetric => write!(f, "symmetric"),
        }
    }
}

impl std::str::FromStr for TiePolicy {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "single_sided" | "single" => Ok(TiePolicy::SingleSided),
            "symmetric" => Ok(TiePolicy::Symmetric),
            other => Err(RatingError::ConfigurationError {
                message: format!("Unknown tie policy: {}", other),
            }),
        }
    }
}

/// Cumulative wins, losses and ties for a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Record {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
    }
}

/// Context recorded alongside a round; only the report reads it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundMetadata {
    pub date: Option<NaiveDate>,
    pub course: Option<String>,
    pub temperature: Option<String>,
    pub wind: Option<String>,
}

/// One round of group play
///
/// `scores` only lists players who played; anyone missing sat the round out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based position in the log
    pub number: usize,
    pub metadata: RoundMetadata,
    pub scores: Vec<(PlayerId, f64)>,
}

impl Round {
    pub fn new(number: usize, scores: Vec<(PlayerId, f64)>) -> Self {
        Self {
            number,
            metadata: RoundMetadata::default(),
            scores,
        }
    }

    pub fn with_metadata(mut self, metadata: RoundMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Score for a player, `None` if they did not play
    pub fn score_of(&self, player: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(id, _)| id == player)
            .map(|(_, score)| *score)
    }

    pub fn participant_count(&self) -> usize {
        self.scores.len()
    }
}
