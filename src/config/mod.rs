//! Configuration management for disc-golf-ratings
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values for the rating constants.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{parse_roster, validate_config, AppConfig, ReportSettings, ServiceSettings};
pub use rating::RatingConfig;
