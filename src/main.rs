//! Main entry point for the disc golf ratings report builder
//!
//! Loads configuration, rates the round log and writes the static report.

use anyhow::Result;
use clap::Parser;
use disc_golf_ratings::config::{parse_roster, validate_config, AppConfig};
use disc_golf_ratings::rating::win_percentage;
use disc_golf_ratings::service::ReportService;
use disc_golf_ratings::TiePolicy;
use std::path::PathBuf;
use tracing::{error, info};

/// Disc Golf Ratings - pairwise Elo ratings from a round log
#[derive(Parser)]
#[command(
    name = "disc-golf-ratings",
    version,
    about = "Rate a disc golf group from its round log and build a static report",
    long_about = "Reads a CSV round log (one row per round, one column per player), \
                 compares every pair of players within each round, updates an Elo-style \
                 rating per player and writes an HTML report with standings, the most \
                 recent rounds and a rating history chart."
)]
struct Args {
    /// Round log CSV file
    #[arg(value_name = "LOG", help = "Path to the round log (CSV export)")]
    log: PathBuf,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Output directory override
    #[arg(short, long, value_name = "DIR", help = "Directory to write the report to")]
    output_dir: Option<PathBuf>,

    /// Roster override
    #[arg(
        short,
        long,
        value_name = "NAMES",
        help = "Comma separated player roster (defaults to the log's player columns)"
    )]
    players: Option<String>,

    /// Number of recent rounds to show
    #[arg(long, value_name = "N", help = "How many recent rounds get their own section")]
    recent_rounds: Option<usize>,

    /// K factor override
    #[arg(long, value_name = "K", help = "Override the rating K factor")]
    k_factor: Option<f64>,

    /// Separation override
    #[arg(long, value_name = "SEP", help = "Override the rating separation")]
    separation: Option<f64>,

    /// Tie policy override
    #[arg(
        long,
        value_name = "POLICY",
        help = "How ties are booked: single_sided or symmetric"
    )]
    tie_policy: Option<TiePolicy>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (rate and render, write nothing)
    #[arg(long, help = "Compute ratings and print standings without writing files")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration and apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(output_dir) = &args.output_dir {
        config.report.output_dir = output_dir.clone();
    }

    if let Some(players) = &args.players {
        config.players = parse_roster(players);
    }

    if let Some(recent_rounds) = args.recent_rounds {
        config.report.recent_rounds = recent_rounds;
    }

    if let Some(k_factor) = args.k_factor {
        config.rating.k_factor = k_factor;
    }

    if let Some(separation) = args.separation {
        config.rating.separation = separation;
    }

    if let Some(tie_policy) = args.tie_policy {
        config.rating.tie_policy = tie_policy;
    }

    validate_config(&config)?;
    Ok(config)
}

fn display_startup_banner(config: &AppConfig) {
    info!("🥏 {}", config.service.name);
    info!(
        "   Rating: B={} SEP={} K={} start={}",
        config.rating.base,
        config.rating.separation,
        config.rating.k_factor,
        config.rating.initial_rating
    );
    info!("   Tie policy: {}", config.rating.tie_policy);
    info!("   Recent rounds: {}", config.report.recent_rounds);
    info!("   Output: {}", config.report.output_dir.display());
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    let service = ReportService::new(config);
    let outcome = match service.build(&args.log, args.dry_run) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Report build failed: {:#}", e);
            std::process::exit(1);
        }
    };

    if args.dry_run {
        for standing in &outcome.report.standings {
            println!(
                "{:>2}. {:<12} {:>7.1}  {:<9} {:.3}",
                standing.rank,
                standing.player,
                standing.rating,
                standing.record.to_string(),
                win_percentage(&standing.record)
            );
        }
    } else if let Some(files) = &outcome.files {
        info!("✅ Wrote {}", files.index.display());
    }

    Ok(())
}
