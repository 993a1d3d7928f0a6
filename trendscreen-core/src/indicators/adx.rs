//! ADX — Average Directional Index, with the +DI and -DI lines.
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars (both 0 on the first bar)
//! 2. Smooth +DM, -DM, and TR with Wilder smoothing (alpha = 1/period),
//!    seeded by the first value rather than an initial average
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI), 0 when both DI are 0
//! 6. ADX = Wilder-smoothed DX
//!
//! The first `period` outputs are masked to NaN because the recursive
//! smoothing has not yet absorbed a full window.
//! Lookback: period.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::atr::true_range;
use crate::indicators::ema::wilder_ema;

/// Which directional line to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdxLine {
    Adx,
    PlusDi,
    MinusDi,
}

impl AdxLine {
    pub fn column(self) -> &'static str {
        match self {
            AdxLine::Adx => "adx",
            AdxLine::PlusDi => "plus_di",
            AdxLine::MinusDi => "minus_di",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    line: AdxLine,
}

impl Adx {
    pub fn new(period: usize, line: AdxLine) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self { period, line }
    }

    pub fn adx(period: usize) -> Self {
        Self::new(period, AdxLine::Adx)
    }

    pub fn plus_di(period: usize) -> Self {
        Self::new(period, AdxLine::PlusDi)
    }

    pub fn minus_di(period: usize) -> Self {
        Self::new(period, AdxLine::MinusDi)
    }
}

/// Directional movement: (+DM, -DM). Index 0 is 0 for both.
fn directional_movement(bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;

        if up.is_nan() || down.is_nan() {
            plus_dm[i] = f64::NAN;
            minus_dm[i] = f64::NAN;
            continue;
        }
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
    }

    (plus_dm, minus_dm)
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        self.line.column()
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let (plus_dm, minus_dm) = directional_movement(bars);

        let smooth_tr = wilder_ema(&true_range(bars), self.period);
        let smooth_plus = wilder_ema(&plus_dm, self.period);
        let smooth_minus = wilder_ema(&minus_dm, self.period);

        let mut plus_di = vec![f64::NAN; n];
        let mut minus_di = vec![f64::NAN; n];
        let mut dx = vec![f64::NAN; n];

        for i in 0..n {
            let tr = smooth_tr[i];
            if tr.is_nan() || tr == 0.0 || smooth_plus[i].is_nan() || smooth_minus[i].is_nan() {
                continue;
            }
            plus_di[i] = 100.0 * smooth_plus[i] / tr;
            minus_di[i] = 100.0 * smooth_minus[i] / tr;

            let di_sum = plus_di[i] + minus_di[i];
            dx[i] = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di[i] - minus_di[i]).abs() / di_sum
            };
        }

        let mut result = match self.line {
            AdxLine::Adx => wilder_ema(&dx, self.period),
            AdxLine::PlusDi => plus_di,
            AdxLine::MinusDi => minus_di,
        };
        for v in result.iter_mut().take(self.period) {
            *v = f64::NAN;
        }
        result
    }
}
