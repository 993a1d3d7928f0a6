//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: EMA[first] = the first valid close, so there is no warmup.
//! Lookback: 0.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
    }
}

/// EMA of an arbitrary series with span-style smoothing (alpha = 2 / (period + 1)).
/// Used by MACD for the signal line.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }
    exponential_smooth(values, 2.0 / (period as f64 + 1.0))
}

/// Wilder-style smoothing (alpha = 1 / period), seeded like [`ema_of_series`].
/// Used by ADX for the directional movement and true range averages.
pub fn wilder_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }
    exponential_smooth(values, 1.0 / period as f64)
}

/// Non-adjusted exponential smoothing seeded by the first valid value.
///
/// NaN inputs produce NaN at that position and leave the running state
/// untouched, so a single missing print does not poison the rest of the series.
pub fn exponential_smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    let mut prev: Option<f64> = None;

    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        let next = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        result[i] = next;
        prev = Some(next);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // Closes: 10, 12, 14, 16
        // alpha = 2/(3+1) = 0.5, seeded with the first close
        // EMA = 10, 11, 12.5, 14.25
        let bars = make_bars(&[10.0, 12.0, 14.0, 16.0]);
        let result = Ema::new(3).compute(&bars);

        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 11.0, DEFAULT_EPSILON);
        assert_approx(result[2], 12.5, DEFAULT_EPSILON);
        assert_approx(result[3], 14.25, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_has_no_warmup() {
        let bars = make_bars(&[10.0, 11.0]);
        let ema = Ema::new(50);
        assert_eq!(ema.lookback(), 0);
        assert!(ema.compute(&bars).iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn ema_nan_skips_without_poisoning() {
        let mut bars = make_bars(&[10.0, 12.0, 14.0, 16.0]);
        bars[1].close = f64::NAN;
        let result = Ema::new(3).compute(&bars);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert!(result[1].is_nan());
        // 0.5*14 + 0.5*10 = 12
        assert_approx(result[2], 12.0, DEFAULT_EPSILON);
        assert_approx(result[3], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn leading_nan_seeds_from_first_valid() {
        let result = ema_of_series(&[f64::NAN, f64::NAN, 4.0, 8.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 4.0, DEFAULT_EPSILON);
        assert_approx(result[3], 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_uses_one_over_period() {
        // alpha = 1/4: 8, 0.25*16 + 0.75*8 = 10
        let result = wilder_ema(&[8.0, 16.0], 4);
        assert_approx(result[0], 8.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_of_series_matches_indicator() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let indicator_result = Ema::new(3).compute(&bars);
        let series_result = ema_of_series(&closes, 3);
        for i in 0..6 {
            assert_approx(indicator_result[i], series_result[i], DEFAULT_EPSILON);
        }
    }
}
