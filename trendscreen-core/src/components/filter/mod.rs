//! Hard filters — pass/reject gates applied to a whole universe.
//!
//! Each filter inspects one ticker's augmented series and either passes it or
//! rejects it with a human-readable reason. Filters run in a fixed order
//! (see [`FilterChain`]) and each stage only sees the survivors of the last.
//!
//! A filter that fails to evaluate (a `FilterError`) is handled by its
//! [`FaultPolicy`]: most filters reject on error, the weekly trend filter
//! lets the ticker through.

pub mod chain;
pub mod data_quality;
pub mod liquidity;
pub mod trend;
pub mod weekly_trend;

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{IndicatedSeries, Universe};

pub use chain::{FilterChain, FilterStage};
pub use data_quality::DataQualityFilter;
pub use liquidity::LiquidityFilter;
pub use trend::TrendFilter;
pub use weekly_trend::{WeeklyTrendFilter, WeeklyTrendState, WeeklyTrendStats};

/// Outcome of checking one ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCheck {
    Pass,
    Reject(String),
}

impl FilterCheck {
    pub fn reject(reason: impl Into<String>) -> Self {
        FilterCheck::Reject(reason.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, FilterCheck::Pass)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("missing value for '{0}'")]
    MissingValue(String),

    #[error("non-finite value for '{0}'")]
    NonFinite(String),
}

/// What a filter does with a ticker it could not evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPolicy {
    Reject,
    Pass,
}

/// Survivors and rejections of one filter stage.
#[derive(Debug, Clone, Default)]
pub struct FilterVerdict {
    pub passed: Universe,
    /// Ticker → rejection reason.
    pub rejected: BTreeMap<String, String>,
}

impl FilterVerdict {
    pub fn passed_count(&self) -> usize {
        self.passed.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Trait for hard filters.
///
/// # Contract
/// `check` must be a pure function of the series: no state is carried between
/// tickers, and the order in which tickers are checked does not matter.
pub trait HardFilter: Send + Sync {
    /// Stage name used in logs and the funnel report (e.g., "liquidity").
    fn name(&self) -> &str;

    /// Decide whether one ticker passes.
    fn check(&self, ticker: &str, series: &IndicatedSeries) -> Result<FilterCheck, FilterError>;

    fn fault_policy(&self) -> FaultPolicy {
        FaultPolicy::Reject
    }

    /// Partition a universe into survivors and rejections.
    fn apply(&self, universe: Universe) -> FilterVerdict {
        let total = universe.len();
        let mut verdict = FilterVerdict::default();

        for (ticker, series) in universe {
            match self.check(&ticker, &series) {
                Ok(FilterCheck::Pass) => {
                    verdict.passed.insert(ticker, series);
                }
                Ok(FilterCheck::Reject(reason)) => {
                    verdict.rejected.insert(ticker, reason);
                }
                Err(e) => match self.fault_policy() {
                    FaultPolicy::Reject => {
                        warn!(filter = self.name(), %ticker, error = %e, "filter error, rejecting");
                        verdict.rejected.insert(ticker, format!("processing error: {e}"));
                    }
                    FaultPolicy::Pass => {
                        warn!(filter = self.name(), %ticker, error = %e, "filter error, passing through");
                        verdict.passed.insert(ticker, series);
                    }
                },
            }
        }

        info!(
            filter = self.name(),
            total,
            passed = verdict.passed_count(),
            rejected = verdict.rejected_count(),
            "filter stage complete"
        );
        verdict
    }
}

/// Format a dollar amount with thousands separators and two decimals
/// (e.g., `$1,234,567.89`).
pub fn format_dollars(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${amount}");
    }
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
