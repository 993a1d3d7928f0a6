//! Average True Range (ATR), column `atr`.
//!
//! The true range of a bar is the largest of its high-low span and the two
//! gaps against the previous close. Gap terms that cannot be formed (first
//! bar, missing previous close) drop out, so a bar with a valid high and low
//! always has a range. `atr` is the trailing mean of that range.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::sma::rolling_mean;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self { period }
    }
}

/// Per-bar true range. NaN only where high or low is missing.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let prev_closes = std::iter::once(f64::NAN).chain(bars.iter().map(|b| b.close));
    bars.iter()
        .zip(prev_closes)
        .map(|(bar, prev_close)| {
            let span = bar.high - bar.low;
            if span.is_nan() {
                return f64::NAN;
            }
            [(bar.high - prev_close).abs(), (bar.low - prev_close).abs()]
                .into_iter()
                .filter(|gap| !gap.is_nan())
                .fold(span, f64::max)
        })
        .collect()
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        "atr"
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_mean(&true_range(bars), self.period)
    }
}
