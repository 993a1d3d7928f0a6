//! Weekly trend filter — multi-timeframe confirmation.
//!
//! Compares the daily trend (slope of `sma_20` over 5 bars) with the weekly
//! trend (slope of a weekly close moving average over `slope_lookback_weeks`).
//! Only a direct conflict (up vs. down) rejects. Unknown data on either side,
//! a sideways reading, or an evaluation error lets the ticker through.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::{FaultPolicy, FilterCheck, FilterError, FilterVerdict, HardFilter};
use crate::config::WeeklyTrendConfig;
use crate::domain::{Bar, IndicatedSeries, Universe};
use crate::indicators::sma::rolling_mean;

const DAILY_MIN_BARS: usize = 25;
const DAILY_SLOPE_LOOKBACK: usize = 5;
/// Sideways band for the daily slope.
const DAILY_SIDEWAYS: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Sideways,
    Unknown,
}

impl TrendDirection {
    fn from_slope(slope: f64, band: f64) -> Self {
        if slope > band {
            TrendDirection::Up
        } else if slope < -band {
            TrendDirection::Down
        } else {
            TrendDirection::Sideways
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Sideways => "sideways",
            TrendDirection::Unknown => "unknown",
        }
    }
}

/// Per-ticker analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTrendState {
    pub ticker: String,
    pub weekly_ma: Option<f64>,
    pub weekly_ma_slope: Option<f64>,
    pub weekly_trend: TrendDirection,
    pub daily_trend: TrendDirection,
    pub is_aligned: bool,
    pub rejection_reason: Option<String>,
}

/// Alignment counts for one run of the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyTrendStats {
    /// Daily and weekly agree.
    pub aligned: usize,
    /// Direct conflict, rejected.
    pub conflict: usize,
    /// Passed with one side sideways or unknown daily.
    pub sideways: usize,
    /// Passed because weekly data was missing or too short.
    pub unknown: usize,
}

#[derive(Debug, Clone)]
pub struct WeeklyTrendFilter {
    config: WeeklyTrendConfig,
    weekly_bars: BTreeMap<String, Vec<Bar>>,
}

impl WeeklyTrendFilter {
    /// `weekly_bars` holds time-ordered weekly bars per ticker; tickers with
    /// no entry are treated as having unknown weekly trend.
    pub fn new(config: WeeklyTrendConfig, weekly_bars: BTreeMap<String, Vec<Bar>>) -> Self {
        Self {
            config,
            weekly_bars,
        }
    }

    /// Weekly MA value, its relative slope, and the resulting direction.
    fn weekly_trend(&self, weekly: &[Bar]) -> (Option<f64>, Option<f64>, TrendDirection) {
        let period = self.config.weekly_ma_period;
        let lookback = self.config.slope_lookback_weeks;
        if weekly.len() < period + lookback {
            return (None, None, TrendDirection::Unknown);
        }

        let closes: Vec<f64> = weekly.iter().map(|b| b.close).collect();
        let ma = rolling_mean(&closes, period);
        let recent = &ma[ma.len() - (lookback + 1)..];
        let latest = recent.last().copied().filter(|v| !v.is_nan());
        if recent.iter().any(|v| v.is_nan()) {
            return (latest, None, TrendDirection::Unknown);
        }

        let (before, now) = (recent[0], recent[lookback]);
        let slope = if before == 0.0 {
            0.0
        } else {
            (now - before) / before
        };
        (
            Some(now),
            Some(slope),
            TrendDirection::from_slope(slope, self.config.sideways_threshold),
        )
    }

    fn daily_trend(series: &IndicatedSeries) -> TrendDirection {
        if series.len() < DAILY_MIN_BARS || !series.has_column("sma_20") {
            return TrendDirection::Unknown;
        }
        let (Some(now), Some(before)) = (
            series.latest("sma_20"),
            series.back("sma_20", DAILY_SLOPE_LOOKBACK),
        ) else {
            return TrendDirection::Unknown;
        };
        let slope = if before == 0.0 {
            0.0
        } else {
            (now - before) / before
        };
        TrendDirection::from_slope(slope, DAILY_SIDEWAYS)
    }

    /// Analyze one ticker against its weekly bars.
    pub fn analyze(&self, ticker: &str, series: &IndicatedSeries) -> WeeklyTrendState {
        let daily_trend = Self::daily_trend(series);
        let (weekly_ma, weekly_ma_slope, weekly_trend) = match self.weekly_bars.get(ticker) {
            Some(weekly) if !weekly.is_empty() => self.weekly_trend(weekly),
            _ => (None, None, TrendDirection::Unknown),
        };

        let rejection_reason = match (daily_trend, weekly_trend) {
            (TrendDirection::Up, TrendDirection::Down) => {
                Some("daily/weekly trend conflict: daily up, weekly down".to_string())
            }
            (TrendDirection::Down, TrendDirection::Up) => {
                Some("daily/weekly trend conflict: daily down, weekly up".to_string())
            }
            _ => None,
        };

        WeeklyTrendState {
            ticker: ticker.to_string(),
            weekly_ma,
            weekly_ma_slope,
            weekly_trend,
            daily_trend,
            is_aligned: rejection_reason.is_none(),
            rejection_reason,
        }
    }

    /// Apply the filter and return the alignment counts alongside the verdict.
    pub fn apply_with_stats(&self, universe: Universe) -> (FilterVerdict, WeeklyTrendStats) {
        let total = universe.len();
        let mut verdict = FilterVerdict::default();
        let mut stats = WeeklyTrendStats::default();

        for (ticker, series) in universe {
            let state = self.analyze(&ticker, &series);
            if state.is_aligned {
                if state.weekly_trend == TrendDirection::Unknown {
                    stats.unknown += 1;
                } else if state.daily_trend == state.weekly_trend {
                    stats.aligned += 1;
                } else {
                    stats.sideways += 1;
                }
                verdict.passed.insert(ticker, series);
            } else {
                stats.conflict += 1;
                debug!(
                    %ticker,
                    daily = state.daily_trend.as_str(),
                    weekly = state.weekly_trend.as_str(),
                    slope = ?state.weekly_ma_slope,
                    "weekly trend conflict"
                );
                let reason = state
                    .rejection_reason
                    .unwrap_or_else(|| "daily/weekly trend conflict".to_string());
                verdict.rejected.insert(ticker, reason);
            }
        }

        info!(
            filter = self.name(),
            total,
            passed = verdict.passed_count(),
            rejected = verdict.rejected_count(),
            aligned = stats.aligned,
            conflict = stats.conflict,
            sideways = stats.sideways,
            unknown = stats.unknown,
            "filter stage complete"
        );
        (verdict, stats)
    }
}

impl HardFilter for WeeklyTrendFilter {
    fn name(&self) -> &str {
        "weekly_trend"
    }

    fn check(&self, ticker: &str, series: &IndicatedSeries) -> Result<FilterCheck, FilterError> {
        let state = self.analyze(ticker, series);
        Ok(match state.rejection_reason {
            Some(reason) => FilterCheck::Reject(reason),
            None => FilterCheck::Pass,
        })
    }

    fn fault_policy(&self) -> FaultPolicy {
        FaultPolicy::Pass
    }

    fn apply(&self, universe: Universe) -> FilterVerdict {
        if !self.config.enabled {
            info!(filter = self.name(), "filter disabled, passing universe through");
            return FilterVerdict {
                passed: universe,
                rejected: BTreeMap::new(),
            };
        }
        self.apply_with_stats(universe).0
    }
}
