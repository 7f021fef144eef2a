//! Round log ingestion
//!
//! Loads the tabular round log into validated `Round` records.

pub mod csv_log;

pub use csv_log::{parse_round_log, read_round_log, RoundLog};
