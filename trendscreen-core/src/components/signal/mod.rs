//! Strategy signal detectors — discrete events on the most recent bars.
//!
//! Detectors are independent of each other and of the scorers: each one reads
//! a ticker's augmented series and either emits one [`SignalEvent`] or nothing.
//! Events describe what happened on the latest bar; they carry no notion of
//! position or portfolio.

pub mod breakout;
pub mod ma_crossover;
pub mod rsi_reversal;
pub mod volume_surge;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::scorer::{round2, Details};
use crate::domain::{IndicatedSeries, Universe};

pub use breakout::Breakout;
pub use ma_crossover::MaCrossover;
pub use rsi_reversal::RsiReversal;
pub use volume_surge::VolumeSurge;

/// Label of a detected event. Known kinds carry a fixed bonus in the signal score.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignalKind {
    GoldenCross,
    VolumeSurge,
    PriceBreakout,
    RsiOversoldRebound,
    RsiOverboughtPullback,
    Other(String),
}

impl SignalKind {
    pub fn label(&self) -> &str {
        match self {
            SignalKind::GoldenCross => "golden_cross",
            SignalKind::VolumeSurge => "volume_surge",
            SignalKind::PriceBreakout => "price_breakout",
            SignalKind::RsiOversoldRebound => "rsi_oversold_rebound",
            SignalKind::RsiOverboughtPullback => "rsi_overbought_pullback",
            SignalKind::Other(label) => label,
        }
    }

    /// Points this kind adds to the signal score.
    pub fn bonus(&self) -> f64 {
        match self {
            SignalKind::PriceBreakout => 35.0,
            SignalKind::GoldenCross => 30.0,
            SignalKind::VolumeSurge => 25.0,
            SignalKind::RsiOversoldRebound => 20.0,
            SignalKind::RsiOverboughtPullback => 10.0,
            SignalKind::Other(_) => 15.0,
        }
    }
}

impl From<String> for SignalKind {
    fn from(label: String) -> Self {
        match label.as_str() {
            "golden_cross" => SignalKind::GoldenCross,
            "volume_surge" => SignalKind::VolumeSurge,
            "price_breakout" => SignalKind::PriceBreakout,
            "rsi_oversold_rebound" => SignalKind::RsiOversoldRebound,
            "rsi_overbought_pullback" => SignalKind::RsiOverboughtPullback,
            _ => SignalKind::Other(label),
        }
    }
}

impl From<SignalKind> for String {
    fn from(kind: SignalKind) -> Self {
        kind.label().to_string()
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One event emitted by a detector for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub ticker: String,
    /// Name of the detector that fired (e.g., "breakout").
    pub strategy: String,
    pub signal: SignalKind,
    /// Latest close, rounded to cents.
    pub price: f64,
    #[serde(default)]
    pub details: Details,
}

impl SignalEvent {
    pub fn new(
        ticker: &str,
        strategy: &str,
        signal: SignalKind,
        price: f64,
        details: Details,
    ) -> Self {
        Self {
            ticker: ticker.to_string(),
            strategy: strategy.to_string(),
            signal,
            price: round2(price),
            details,
        }
    }
}

/// Per-ticker fault inside a detector.
#[derive(Debug, Error, PartialEq)]
pub enum DetectorError {
    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("non-finite value for '{0}'")]
    NonFinite(String),
}

/// Trait for signal detectors.
///
/// # Contract
/// `detect` looks only at the given series. Undefined indicator values mean
/// "no signal", not an error; errors are reserved for series that cannot be
/// evaluated at all.
pub trait SignalDetector: Send + Sync {
    /// Strategy name (e.g., "ma_crossover").
    fn name(&self) -> &str;

    /// Columns that must exist before `detect` is attempted.
    fn required_columns(&self) -> Vec<String>;

    /// Minimum number of bars before `detect` is attempted.
    fn min_bars(&self) -> usize;

    fn detect(&self, ticker: &str, series: &IndicatedSeries)
        -> Result<Option<SignalEvent>, DetectorError>;

    /// Run the detector over a universe. A faulty ticker is logged and skipped.
    fn scan(&self, universe: &Universe) -> Vec<SignalEvent> {
        let mut events = Vec::new();

        for (ticker, series) in universe {
            if let Some(column) = self
                .required_columns()
                .into_iter()
                .find(|c| !series.has_column(c))
            {
                debug!(strategy = self.name(), %ticker, %column, "missing column, skipping");
                continue;
            }
            if series.len() < self.min_bars() {
                debug!(
                    strategy = self.name(),
                    %ticker,
                    bars = series.len(),
                    needed = self.min_bars(),
                    "not enough bars, skipping"
                );
                continue;
            }

            match self.detect(ticker, series) {
                Ok(Some(event)) => {
                    debug!(
                        strategy = self.name(),
                        %ticker,
                        signal = %event.signal,
                        price = event.price,
                        "signal"
                    );
                    events.push(event);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(strategy = self.name(), %ticker, error = %e, "detector error, skipping ticker");
                }
            }
        }

        info!(
            strategy = self.name(),
            scanned = universe.len(),
            signals = events.len(),
            "scan complete"
        );
        events
    }
}

/// (previous, latest) values of a column, `None` if either is undefined.
pub(crate) fn last_two(
    series: &IndicatedSeries,
    column: &str,
) -> Result<Option<(f64, f64)>, DetectorError> {
    if !series.has_column(column) {
        return Err(DetectorError::MissingColumn(column.to_string()));
    }
    Ok(series.back(column, 1).zip(series.latest(column)))
}

/// Latest close, which every detector reports as the event price.
pub(crate) fn latest_close(series: &IndicatedSeries) -> Result<f64, DetectorError> {
    series
        .latest("close")
        .ok_or_else(|| DetectorError::NonFinite("close".into()))
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::domain::{Bar, IndicatedSeries};
    use chrono::NaiveDate;

    /// Series from (high, close, volume) rows; open = close, low = close − 1.
    pub fn hcv(rows: &[(f64, f64, f64)]) -> IndicatedSeries {
        let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, &(h, c, v))| {
                Bar::new(base + chrono::Duration::days(i as i64), c, h, c - 1.0, c, v)
            })
            .collect();
        IndicatedSeries::from_bars(bars)
    }

    /// Flat series of `n` bars at `close`, with extra columns attached.
    pub fn with_columns(n: usize, close: f64, columns: &[(&str, Vec<f64>)]) -> IndicatedSeries {
        let mut s = hcv(&vec![(close + 1.0, close, 1_000.0); n]);
        for (name, values) in columns {
            s.insert_column(*name, values.clone()).unwrap();
        }
        s
    }
}
