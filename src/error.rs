//! Error types for the rating engine and report builder
//!
//! Domain failures are modelled as `RatingError` variants; everything is
//! propagated through `anyhow` so callers can attach file or round context.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid score in round {round} for player {player}: {value:?}")]
    InvalidScore {
        round: usize,
        player: String,
        value: String,
    },

    #[error("Unknown player in round {round}: {player}")]
    UnknownPlayer { round: usize, player: String },

    #[error("Player {player} appears more than once in round {round}")]
    DuplicatePlayer { round: usize, player: String },

    #[error("Invalid metadata in round {round}: {reason}")]
    InvalidMetadata { round: usize, reason: String },

    #[error("Round log column {column} appears more than once")]
    DuplicateColumn { column: String },

    #[error("Invalid comparison outcome: {value}")]
    InvalidOutcome { value: f64 },

    #[error("Empty roster: at least one player is required")]
    EmptyRoster,

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
