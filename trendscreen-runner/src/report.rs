//! Screen report and its export formats.
//!
//! - **JSON**: the full report, round-trippable, with schema versioning
//! - **CSV**: one row per ranked ticker for spreadsheets
//! - **Table**: fixed-width text for terminals, with the funnel summary
//!
//! Unknown schema versions are rejected on import.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trendscreen_core::components::filter::FilterStage;
use trendscreen_core::engine::RankedResult;

/// Current schema version for serialized reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything one screening run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub schema_version: u32,
    /// BLAKE3 of the screen config.
    pub config_hash: String,
    /// BLAKE3 of the input bars.
    pub dataset_hash: String,
    pub as_of: DateTime<Utc>,
    /// Tickers handed to the pipeline, including empty ones.
    pub universe_size: usize,
    /// Tickers that passed every hard filter.
    pub survivors: usize,
    /// One record per filter stage, in execution order.
    pub funnel: Vec<FilterStage>,
    /// Strategy name → events emitted.
    pub signal_counts: BTreeMap<String, usize>,
    pub ranked: Vec<RankedResult>,
}

impl ScreenReport {
    /// The stage that rejected `ticker` and its reason, if any did.
    pub fn rejection(&self, ticker: &str) -> Option<(&str, &str)> {
        self.funnel.iter().find_map(|stage| {
            stage
                .rejected
                .get(ticker)
                .map(|reason| (stage.name.as_str(), reason.as_str()))
        })
    }

    pub fn total_signals(&self) -> usize {
        self.signal_counts.values().sum()
    }
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a report to pretty JSON.
pub fn export_json(report: &ScreenReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScreenReport to JSON")
}

/// Deserialize a report from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScreenReport> {
    let report: ScreenReport =
        serde_json::from_str(json).context("failed to deserialize ScreenReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Ranked results as CSV.
///
/// Columns: rank, ticker, price, final_score, confidence, liquidity_score,
/// trend_score, signal_score, multi_strategy_score, signals
pub fn export_ranked_csv(ranked: &[RankedResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "rank",
        "ticker",
        "price",
        "final_score",
        "confidence",
        "liquidity_score",
        "trend_score",
        "signal_score",
        "multi_strategy_score",
        "signals",
    ])
    .context("failed to write CSV header")?;

    for r in ranked {
        wtr.write_record([
            r.final_score.rank.to_string(),
            r.ticker.clone(),
            format!("{:.2}", r.basic_info.price),
            format!("{:.2}", r.final_score.breakdown.total),
            r.final_score.confidence.as_str().to_string(),
            format!("{:.2}", r.liquidity_score),
            format!("{:.2}", r.trend_score.total),
            format!("{:.2}", r.signal_score),
            format!("{:.2}", r.multi_strategy_score),
            signal_labels(r).join(";"),
        ])
        .with_context(|| format!("failed to write CSV row for {}", r.ticker))?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

// ─── Table render ───────────────────────────────────────────────────

/// Terminal rendering: funnel summary, then the ranked table.
pub fn render_table(report: &ScreenReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Screen as of {} | config {} | {} tickers",
        report.as_of.format("%Y-%m-%d %H:%M UTC"),
        short_hash(&report.config_hash),
        report.universe_size
    );

    for stage in &report.funnel {
        let _ = writeln!(
            out,
            "  {:<14} {:>5} in {:>5} passed {:>5} rejected",
            stage.name,
            stage.input,
            stage.passed,
            stage.rejected.len()
        );
    }
    let counts: Vec<String> = report
        .signal_counts
        .iter()
        .map(|(name, n)| format!("{name}={n}"))
        .collect();
    let _ = writeln!(out, "  signals: {}", counts.join(" "));
    out.push('\n');

    if report.ranked.is_empty() {
        out.push_str("No tickers ranked.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>4}  {:<8} {:>10} {:>7} {:<6} {:>6} {:>6} {:>6} {:>6}  {}",
        "RANK", "TICKER", "PRICE", "FINAL", "CONF", "LIQ", "TREND", "SIG", "MULTI", "SIGNALS"
    );
    for r in &report.ranked {
        let _ = writeln!(
            out,
            "{:>4}  {:<8} {:>10.2} {:>7.2} {:<6} {:>6.1} {:>6.1} {:>6.1} {:>6.1}  {}",
            r.final_score.rank,
            r.ticker,
            r.basic_info.price,
            r.final_score.breakdown.total,
            r.final_score.confidence.as_str(),
            r.liquidity_score,
            r.trend_score.total,
            r.signal_score,
            r.multi_strategy_score,
            signal_labels(r).join(", ")
        );
    }
    out
}

fn signal_labels(result: &RankedResult) -> Vec<&str> {
    result.signals.iter().map(|e| e.signal.label()).collect()
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
