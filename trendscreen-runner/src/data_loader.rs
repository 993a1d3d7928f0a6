//! Bar loading for the runner.
//!
//! Reads a directory of per-ticker CSV files:
//! - `<TICKER>.csv` with header `date,open,high,low,close,volume`
//! - optional `weekly/<TICKER>.csv` in the same format
//!
//! Rows are sorted by date and duplicate dates keep the last row. Empty
//! price or volume cells become `NaN` so the data quality filter can count
//! them instead of the loader guessing a value.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use trendscreen_core::domain::{Bar, BarsByTicker};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no <TICKER>.csv files found in {0}")]
    NoBarFiles(PathBuf),
}

/// Daily and weekly bars read from disk, with provenance.
#[derive(Debug, Clone, Default)]
pub struct LoadedBars {
    pub daily: BarsByTicker,
    /// Only tickers with a `weekly/<TICKER>.csv` file appear here.
    pub weekly: BarsByTicker,
    /// BLAKE3 over every loaded bar, in ticker order.
    pub dataset_hash: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl From<CsvRow> for Bar {
    fn from(row: CsvRow) -> Self {
        let nan = |v: Option<f64>| v.unwrap_or(f64::NAN);
        Bar::new(
            row.date,
            nan(row.open),
            nan(row.high),
            nan(row.low),
            nan(row.close),
            nan(row.volume),
        )
    }
}

/// Parse bars from any CSV reader. Output is sorted by date with unique dates.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut by_date: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    for row in rdr.deserialize::<CsvRow>() {
        let bar = Bar::from(row?);
        by_date.insert(bar.date, bar);
    }
    Ok(by_date.into_values().collect())
}

/// Load one CSV file.
pub fn read_bars_file(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let file = fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_bars(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every `<TICKER>.csv` in `dir`, plus `dir/weekly/<TICKER>.csv` when present.
///
/// The ticker is the file stem, as written. A directory with no CSV files is
/// an error; a file with a header and no rows loads as an empty series and is
/// rejected later by the data quality filter.
pub fn load_bars_dir(dir: &Path) -> Result<LoadedBars, LoadError> {
    let daily = load_csv_files(dir)?;
    if daily.is_empty() {
        return Err(LoadError::NoBarFiles(dir.to_path_buf()));
    }

    let weekly_dir = dir.join("weekly");
    let weekly = if weekly_dir.is_dir() {
        load_csv_files(&weekly_dir)?
    } else {
        BarsByTicker::new()
    };

    let dataset_hash = dataset_hash(&daily);
    info!(
        dir = %dir.display(),
        tickers = daily.len(),
        weekly = weekly.len(),
        "bars loaded"
    );
    Ok(LoadedBars {
        daily,
        weekly,
        dataset_hash,
    })
}

fn load_csv_files(dir: &Path) -> Result<BarsByTicker, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut out = BarsByTicker::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !path.is_file() || !is_csv {
            continue;
        }
        let Some(ticker) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let bars = read_bars_file(&path)?;
        debug!(ticker, bars = bars.len(), "loaded bar file");
        out.insert(ticker.to_string(), bars);
    }
    Ok(out)
}

/// Compute a deterministic BLAKE3 hash over all bar data.
///
/// Covers ticker names, dates and OHLCV bit patterns in ticker order, so the
/// same files always hash the same regardless of directory listing order.
pub fn dataset_hash(bars: &BarsByTicker) -> String {
    let mut hasher = blake3::Hasher::new();
    for (ticker, series) in bars {
        hasher.update(ticker.as_bytes());
        for bar in series {
            hasher.update(bar.date.to_string().as_bytes());
            for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
                hasher.update(&v.to_bits().to_le_bytes());
            }
        }
    }
    hasher.finalize().to_hex().to_string()
}
