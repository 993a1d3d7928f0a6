//! Percent price change over N bars.
//!
//! CHANGE[t] = (close[t] - close[t-period]) / close[t-period] * 100
//! Output is in percent units: a 3% move is 3.0, not 0.03.
//! Lookback: period.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct PriceChange {
    period: usize,
    name: String,
}

impl PriceChange {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "price change period must be >= 1");
        Self {
            period,
            name: format!("price_change_{period}d"),
        }
    }
}

impl Indicator for PriceChange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let prev = bars[i - self.period].close;
            let curr = bars[i].close;
            if prev.is_nan() || curr.is_nan() || prev == 0.0 {
                continue;
            }
            result[i] = (curr - prev) / prev * 100.0;
        }

        result
    }
}
