//! Report build coordination
//!
//! Runs one build end to end: read the round log, rate every round in
//! order, then render and write the report.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::ingest::{read_round_log, RoundLog};
use crate::rating::{RatingEngine, RatingRun};
use crate::report::{Report, ReportFiles, ReportWriter};

/// What a completed build produced
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub log: RoundLog,
    pub run: RatingRun,
    pub report: Report,
    /// `None` for dry runs
    pub files: Option<ReportFiles>,
}

/// One-shot report builder
#[derive(Debug, Clone)]
pub struct ReportService {
    config: AppConfig,
}

impl ReportService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Rate the log without rendering anything
    pub fn rate(&self, log: &RoundLog) -> Result<RatingRun> {
        let engine = RatingEngine::new(log.players.clone(), self.config.rating.clone())?;
        engine.run(&log.rounds)
    }

    /// Read, rate and render; write the files unless `dry_run` is set
    pub fn build(&self, log_path: &Path, dry_run: bool) -> Result<BuildOutcome> {
        let start_time = Instant::now();

        let log = read_round_log(log_path, &self.config.players)?;
        if log.rounds.is_empty() {
            warn!("Round log {} has no rounds", log_path.display());
        }

        let run = self.rate(&log)?;
        let report = Report::build(&self.config.report, &log.rounds, &run)?;

        let files = if dry_run {
            info!("Dry run: skipping report output");
            None
        } else {
            let writer = ReportWriter::new(self.output_dir());
            Some(writer.write(&self.config.report, &report)?)
        };

        info!(
            "Report build finished in {:.2}ms",
            start_time.elapsed().as_secs_f64() * 1000.0
        );

        Ok(BuildOutcome {
            log,
            run,
            report,
            files,
        })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.report.output_dir.clone()
    }
}
