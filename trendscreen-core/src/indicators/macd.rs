//! MACD — Moving Average Convergence/Divergence.
//!
//! Three lines (separate Indicator instances):
//! - `macd`:        EMA(close, fast) - EMA(close, slow)
//! - `macd_signal`: EMA(macd, signal)
//! - `macd_hist`:   macd - macd_signal
//!
//! All EMAs are seeded by their first input, so there is no warmup.
//! Lookback: 0.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::ema::ema_of_series;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

impl MacdLine {
    pub fn column(self) -> &'static str {
        match self {
            MacdLine::Macd => "macd",
            MacdLine::Signal => "macd_signal",
            MacdLine::Histogram => "macd_hist",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD periods must be >= 1");
        Self {
            fast,
            slow,
            signal,
            line,
        }
    }

    fn macd_line(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        self.line.column()
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let macd = self.macd_line(bars);
        match self.line {
            MacdLine::Macd => macd,
            MacdLine::Signal => ema_of_series(&macd, self.signal),
            MacdLine::Histogram => {
                let signal = ema_of_series(&macd, self.signal);
                macd.iter().zip(&signal).map(|(m, s)| m - s).collect()
            }
        }
    }
}
