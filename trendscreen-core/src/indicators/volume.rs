//! Volume average and relative volume.
//!
//! - `volume_ma`:    rolling mean of volume over `period` bars
//! - `volume_ratio`: volume / volume_ma (the current bar is part of its own average)
//!
//! Lookback: period - 1. A zero average leaves the ratio undefined.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::sma::rolling_mean;

fn volume_average(bars: &[Bar], period: usize) -> Vec<f64> {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    rolling_mean(&volumes, period)
}

#[derive(Debug, Clone)]
pub struct VolumeMa {
    period: usize,
}

impl VolumeMa {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume MA period must be >= 1");
        Self { period }
    }
}

impl Indicator for VolumeMa {
    fn name(&self) -> &str {
        "volume_ma"
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        volume_average(bars, self.period)
    }
}

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    period: usize,
}

impl VolumeRatio {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume ratio period must be >= 1");
        Self { period }
    }
}

impl Indicator for VolumeRatio {
    fn name(&self) -> &str {
        "volume_ratio"
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        volume_average(bars, self.period)
            .iter()
            .zip(bars)
            .map(|(&avg, bar)| {
                if avg == 0.0 {
                    f64::NAN
                } else {
                    bar.volume / avg
                }
            })
            .collect()
    }
}
