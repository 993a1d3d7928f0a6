//! TrendScreen CLI — run equity screens and inspect configuration.
//!
//! Commands:
//! - `screen` — screen a directory of CSV bar files or a synthetic universe
//! - `config` — print the default screen config as TOML
//!
//! Reports go to stdout; logs go to stderr (`RUST_LOG`, default `info`).

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trendscreen_core::config::ScreenConfig;
use trendscreen_runner::{
    default_config_toml, export_json, export_ranked_csv, load_bars_dir, load_config,
    render_table, synthetic_universe, Pipeline,
};

#[derive(Parser)]
#[command(
    name = "trendscreen",
    about = "TrendScreen CLI — trend and signal equity screener"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a screen and print the report.
    Screen {
        /// Directory of <TICKER>.csv files (optional weekly/<TICKER>.csv).
        #[arg(long, conflicts_with = "synthetic")]
        bars_dir: Option<PathBuf>,

        /// Screen this many synthetic tickers instead of files.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Bars per synthetic ticker.
        #[arg(long, default_value_t = 300)]
        bars: usize,

        /// Seed for the synthetic universe.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Path to a TOML screen config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the number of ranked results.
        #[arg(long)]
        top: Option<usize>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Screen date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Print the default screen config as TOML.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Screen {
            bars_dir,
            synthetic,
            bars,
            seed,
            config,
            top,
            format,
            as_of,
        } => run_screen(bars_dir, synthetic, bars, seed, config, top, format, as_of),
        Commands::Config => {
            print!("{}", default_config_toml()?);
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_screen(
    bars_dir: Option<PathBuf>,
    synthetic: Option<usize>,
    bars: usize,
    seed: u64,
    config_path: Option<PathBuf>,
    top: Option<usize>,
    format: OutputFormat,
    as_of: Option<String>,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => load_config(path)?,
        None => ScreenConfig::default(),
    };
    if let Some(n) = top {
        if n == 0 {
            bail!("--top must be at least 1");
        }
        config.scoring.output_count = n;
    }

    let as_of = parse_as_of(as_of.as_deref())?;
    let pipeline = Pipeline::new(config)?;

    let report = match (bars_dir, synthetic) {
        (Some(dir), None) => {
            let loaded = load_bars_dir(&dir)
                .with_context(|| format!("failed to load bars from {}", dir.display()))?;
            pipeline.run(loaded, as_of)
        }
        (None, Some(n)) => {
            info!(tickers = n, bars, seed, "generating synthetic universe");
            pipeline.run_daily(synthetic_universe(n, bars, as_of.date_naive(), seed), as_of)
        }
        _ => bail!("one of --bars-dir or --synthetic is required"),
    };

    let out = match format {
        OutputFormat::Json => export_json(&report)?,
        OutputFormat::Csv => export_ranked_csv(&report.ranked)?,
        OutputFormat::Table => render_table(&report),
    };
    print!("{out}");
    if !out.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn parse_as_of(value: Option<&str>) -> Result<DateTime<Utc>> {
    match value {
        Some(s) => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("invalid --as-of date '{s}' (expected YYYY-MM-DD)"))?;
            Ok(date.and_time(NaiveTime::MIN).and_utc())
        }
        None => Ok(Utc::now()),
    }
}
