//! Static report generation
//!
//! Turns a finished rating run into an HTML page, a rating history chart and
//! a JSON export of the standings, and writes them to the output directory.

pub mod chart;
pub mod html;
pub mod summary;

pub use chart::render_chart_svg;
pub use html::render_html;
pub use summary::{summarize_recent, RoundEntry, RoundSummary};

use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ReportSettings;
use crate::error::Result;
use crate::rating::{standings, RatingRun, Standing};
use crate::types::Round;

pub const INDEX_FILE: &str = "index.html";
pub const EXPORT_FILE: &str = "standings.json";
const CHART_TITLE: &str = "Rating Change";

/// Everything the report renders, computed once
#[derive(Debug, Clone)]
pub struct Report {
    pub standings: Vec<Standing>,
    pub summaries: Vec<RoundSummary>,
    pub html: String,
    pub chart_svg: String,
    pub export_json: String,
}

#[derive(Serialize)]
struct Export<'a> {
    rounds_processed: usize,
    standings: &'a [Standing],
    histories: BTreeMap<&'a str, &'a [f64]>,
}

impl Report {
    pub fn build(settings: &ReportSettings, rounds: &[Round], run: &RatingRun) -> Result<Self> {
        let standings = standings(run);
        let summaries = summarize_recent(rounds, run, settings.recent_rounds)?;
        let html = render_html(settings, &standings, &summaries);
        let chart_svg = render_chart_svg(run, CHART_TITLE);

        let export = Export {
            rounds_processed: run.rounds_processed(),
            standings: &standings,
            histories: run
                .histories()
                .map(|(player, history)| (player.as_str(), history))
                .collect(),
        };
        let export_json =
            serde_json::to_string_pretty(&export).context("Failed to serialize standings")?;

        Ok(Self {
            standings,
            summaries,
            html,
            chart_svg,
            export_json,
        })
    }
}

/// Paths of the files a report build produced
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFiles {
    pub index: PathBuf,
    pub chart: PathBuf,
    pub export: PathBuf,
}

/// Writes report files into a directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn write(&self, settings: &ReportSettings, report: &Report) -> Result<ReportFiles> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;

        let files = ReportFiles {
            index: self.output_dir.join(INDEX_FILE),
            chart: self.output_dir.join(&settings.chart_file),
            export: self.output_dir.join(EXPORT_FILE),
        };

        write_file(&files.index, &report.html)?;
        write_file(&files.chart, &report.chart_svg)?;
        write_file(&files.export, &report.export_json)?;

        info!("Report written to {}", self.output_dir.display());
        Ok(files)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
