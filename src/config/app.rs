//! Main application configuration
//!
//! This module defines the configuration for a report build: service-level
//! settings, the rating constants, report options and the player roster.
//! Values come from defaults, an optional TOML file and environment variables.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use super::rating::RatingConfig;
use crate::types::PlayerId;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub report: ReportSettings,
    /// Fixed roster; when empty the player columns of the round log are used
    pub players: Vec<PlayerId>,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Report rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Page heading
    pub title: String,
    /// How many of the latest rounds get their own section
    pub recent_rounds: usize,
    /// Directory the report files are written to
    pub output_dir: PathBuf,
    /// File name of the rating history chart inside `output_dir`
    pub chart_file: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "disc-golf-ratings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "Disc Golf Ratings".to_string(),
            recent_rounds: 3,
            output_dir: PathBuf::from("site"),
            chart_file: "rating_change.svg".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse a TOML config file as written, without environment overrides
    pub fn read_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(base) = env::var("RATING_BASE") {
            self.rating.base = base
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_BASE value: {}", base))?;
        }
        if let Ok(separation) = env::var("RATING_SEPARATION") {
            self.rating.separation = separation
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_SEPARATION value: {}", separation))?;
        }
        if let Ok(k_factor) = env::var("RATING_K_FACTOR") {
            self.rating.k_factor = k_factor
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_K_FACTOR value: {}", k_factor))?;
        }
        if let Ok(initial) = env::var("RATING_INITIAL") {
            self.rating.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_INITIAL value: {}", initial))?;
        }
        if let Ok(policy) = env::var("RATING_TIE_POLICY") {
            self.rating.tie_policy = policy.parse()?;
        }

        // Report settings
        if let Ok(title) = env::var("REPORT_TITLE") {
            self.report.title = title;
        }
        if let Ok(recent) = env::var("REPORT_RECENT_ROUNDS") {
            self.report.recent_rounds = recent
                .parse()
                .map_err(|_| anyhow!("Invalid REPORT_RECENT_ROUNDS value: {}", recent))?;
        }
        if let Ok(dir) = env::var("REPORT_OUTPUT_DIR") {
            self.report.output_dir = PathBuf::from(dir);
        }

        // Roster
        if let Ok(players) = env::var("PLAYERS") {
            self.players = parse_roster(&players);
        }

        Ok(())
    }
}

/// Split a comma separated list of player names
pub fn parse_roster(value: &str) -> Vec<PlayerId> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    config.rating.validate()?;

    if config.report.chart_file.is_empty() {
        return Err(anyhow!("Chart file name cannot be empty"));
    }

    let mut seen = std::collections::HashSet::new();
    for player in &config.players {
        if !seen.insert(player) {
            return Err(anyhow!("Player listed twice in roster: {}", player));
        }
    }

    Ok(())
}
