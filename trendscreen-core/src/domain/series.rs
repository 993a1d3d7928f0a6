//! IndicatedSeries — a ticker's bars plus every derived indicator column.
//!
//! Raw OHLCV fields are exposed as columns too (`open`, `high`, `low`,
//! `close`, `volume`), so filters and detectors look values up by name
//! without caring whether a column came from the feed or the indicator engine.

use super::bar::Bar;
use crate::components::indicator::IndicatorValues;
use thiserror::Error;

/// Raw columns every series carries.
pub const BASE_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("column '{name}' has {actual} values, series has {expected} bars")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Time-ordered bars for one ticker with aligned named columns.
#[derive(Debug, Clone, Default)]
pub struct IndicatedSeries {
    bars: Vec<Bar>,
    columns: IndicatorValues,
}

impl IndicatedSeries {
    /// Wrap bars, populating the raw OHLCV columns.
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        let mut columns = IndicatorValues::new();
        for name in BASE_COLUMNS {
            let values = bars
                .iter()
                .map(|b| b.field(name).unwrap_or(f64::NAN))
                .collect();
            columns.insert(name, values);
        }
        Self { bars, columns }
    }

    /// Add a derived column. Rejects columns whose length differs from the bar count.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), SeriesError> {
        let name = name.into();
        if values.len() != self.bars.len() {
            return Err(SeriesError::LengthMismatch {
                name,
                expected: self.bars.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Column names in sorted order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.names()
    }

    /// Full column including NaN positions.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get_series(name)
    }

    /// Value at `index`; `None` if absent, out of range, or NaN.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.columns.get(name, index)
    }

    /// Value `offset` bars before the latest (0 = latest).
    pub fn back(&self, name: &str, offset: usize) -> Option<f64> {
        let last = self.bars.len().checked_sub(1)?;
        let index = last.checked_sub(offset)?;
        self.value(name, index)
    }

    /// Latest value of a column.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.back(name, 0)
    }

    /// Fraction of NaN values in a column. `None` if the column is absent
    /// or the series is empty.
    pub fn missing_ratio(&self, name: &str) -> Option<f64> {
        let column = self.column(name)?;
        if column.is_empty() {
            return None;
        }
        let missing = column.iter().filter(|v| v.is_nan()).count();
        Some(missing as f64 / column.len() as f64)
    }

    /// Last `n` values of a column (fewer if the series is shorter).
    pub fn tail(&self, name: &str, n: usize) -> Option<&[f64]> {
        let column = self.column(name)?;
        let start = column.len().saturating_sub(n);
        Some(&column[start..])
    }

    /// Mean of the trailing `period` volumes times mean of the trailing
    /// `period` closes. NaN entries are skipped. `None` when fewer than
    /// `period` bars exist or a window has no valid values.
    pub fn avg_dollar_volume(&self, period: usize) -> Option<f64> {
        if period == 0 || self.len() < period {
            return None;
        }
        let volume = nan_mean(self.tail("volume", period)?)?;
        let close = nan_mean(self.tail("close", period)?)?;
        Some(volume * close)
    }
}

/// Mean of the non-NaN values, `None` if there are none.
pub(crate) fn nan_mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Max of the non-NaN values, `None` if there are none.
pub(crate) fn nan_max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

/// Min of the non-NaN values, `None` if there are none.
pub(crate) fn nan_min(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
}
