//! Service layer for disc-golf-ratings
//!
//! This module ties ingestion, rating and report rendering together into a
//! single report build.

pub mod app;

pub use app::{BuildOutcome, ReportService};
