//! Liquidity scorer — continuous 0–100 score from trailing dollar volume.

use super::round2;
use crate::config::LiquidityScorerConfig;
use crate::domain::IndicatedSeries;

/// Score returned when there is not enough history to measure dollar volume.
pub const NEUTRAL_LIQUIDITY_SCORE: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct LiquidityScorer {
    config: LiquidityScorerConfig,
}

impl LiquidityScorer {
    pub fn new(config: LiquidityScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LiquidityScorerConfig {
        &self.config
    }

    /// Score one series.
    ///
    /// - D ≥ excellent: 100
    /// - min ≤ D < excellent: linear from 60 to 100
    /// - D < min: linear from 0 to 50
    pub fn score(&self, series: &IndicatedSeries) -> f64 {
        match series.avg_dollar_volume(self.config.volume_period) {
            Some(d) => round2(self.score_dollar_volume(d)),
            None => NEUTRAL_LIQUIDITY_SCORE,
        }
    }

    pub fn score_dollar_volume(&self, dollar_volume: f64) -> f64 {
        let min = self.config.min_avg_dollar_volume;
        let excellent = self.config.excellent_dollar_volume;

        if !dollar_volume.is_finite() {
            return NEUTRAL_LIQUIDITY_SCORE;
        }
        let raw = if dollar_volume >= excellent {
            100.0
        } else if dollar_volume >= min {
            60.0 + 40.0 * (dollar_volume - min) / (excellent - min)
        } else if min > 0.0 {
            50.0 * dollar_volume / min
        } else {
            0.0
        };
        raw.clamp(0.0, 100.0)
    }
}
