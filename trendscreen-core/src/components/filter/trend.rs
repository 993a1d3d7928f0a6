//! Trend filter — keeps only tickers in a daily uptrend.
//!
//! Checks, in order:
//! 1. At least 50 bars of history
//! 2. 20-bar return (latest close vs. close 20 bars back) >= `min_20d_return`
//! 3. Latest close above `sma_50` (optional)
//! 4. `sma_20` rising: latest value above the value 5 bars back (optional)

use super::{format_dollars, FilterCheck, FilterError, HardFilter};
use crate::config::TrendFilterConfig;
use crate::domain::IndicatedSeries;

/// Minimum history the trend checks need.
pub const MIN_TREND_BARS: usize = 50;
const RETURN_LOOKBACK: usize = 20;
const SLOPE_LOOKBACK: usize = 5;

#[derive(Debug, Clone)]
pub struct TrendFilter {
    config: TrendFilterConfig,
}

impl TrendFilter {
    pub fn new(config: TrendFilterConfig) -> Self {
        Self { config }
    }
}

/// Relative change of a column between `bars_back` bars ago and the latest bar.
pub(crate) fn relative_change(
    series: &IndicatedSeries,
    column: &str,
    bars_back: usize,
) -> Result<f64, FilterError> {
    let now = series
        .latest(column)
        .ok_or_else(|| FilterError::MissingValue(column.to_string()))?;
    let then = series
        .back(column, bars_back)
        .ok_or_else(|| FilterError::MissingValue(format!("{column}[-{bars_back}]")))?;
    if then == 0.0 {
        return Err(FilterError::NonFinite(format!("{column} change")));
    }
    Ok((now - then) / then)
}

impl HardFilter for TrendFilter {
    fn name(&self) -> &str {
        "trend"
    }

    fn check(&self, _ticker: &str, series: &IndicatedSeries) -> Result<FilterCheck, FilterError> {
        if series.len() < MIN_TREND_BARS {
            return Ok(FilterCheck::reject(format!(
                "insufficient data: need at least {MIN_TREND_BARS} bars"
            )));
        }

        let ret = relative_change(series, "close", RETURN_LOOKBACK)?;
        if ret < self.config.min_20d_return {
            return Ok(FilterCheck::reject(format!(
                "20-day return too low {:.2}% < {:.2}%",
                ret * 100.0,
                self.config.min_20d_return * 100.0
            )));
        }

        if self.config.require_above_ma50 {
            if !series.has_column("sma_50") {
                return Ok(FilterCheck::reject("missing sma_50"));
            }
            let close = series
                .latest("close")
                .ok_or_else(|| FilterError::MissingValue("close".into()))?;
            let Some(ma50) = series.latest("sma_50") else {
                return Ok(FilterCheck::reject("sma_50 undefined at latest bar"));
            };
            if close <= ma50 {
                return Ok(FilterCheck::reject(format!(
                    "price below MA50 {} <= {}",
                    format_dollars(close),
                    format_dollars(ma50)
                )));
            }
        }

        if self.config.require_ma20_uptrend {
            if !series.has_column("sma_20") {
                return Ok(FilterCheck::reject("missing sma_20"));
            }
            let (Some(now), Some(then)) = (
                series.latest("sma_20"),
                series.back("sma_20", SLOPE_LOOKBACK),
            ) else {
                return Ok(FilterCheck::reject("MA20 data incomplete"));
            };
            if now <= then {
                return Ok(FilterCheck::reject(format!(
                    "MA20 not rising ({then:.2} -> {now:.2})"
                )));
            }
        }

        Ok(FilterCheck::Pass)
    }
}
