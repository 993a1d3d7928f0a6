//! Moving average crossover — golden cross on the latest bar.
//!
//! Fires when the short SMA was at or below the long SMA on the previous bar
//! and is above it on the latest bar.

use serde_json::json;

use super::{last_two, latest_close, DetectorError, SignalDetector, SignalEvent, SignalKind};
use crate::components::scorer::{num, Details};
use crate::config::MaCrossoverConfig;
use crate::domain::IndicatedSeries;

/// Minimum volume ratio for a confirmed crossover.
const CONFIRM_VOLUME_RATIO: f64 = 1.0;

/// Golden-cross detector.
///
/// # Indicator dependencies
/// - `sma_{short_period}` and `sma_{long_period}`
/// - `volume_ratio` when `volume_confirm` is set
#[derive(Debug, Clone)]
pub struct MaCrossover {
    pub short_period: usize,
    pub long_period: usize,
    pub volume_confirm: bool,
    short_key: String,
    long_key: String,
}

impl MaCrossover {
    pub const NAME: &'static str = "ma_crossover";

    pub fn new(short_period: usize, long_period: usize, volume_confirm: bool) -> Self {
        assert!(short_period >= 1, "short_period must be >= 1");
        assert!(
            long_period > short_period,
            "long_period must be > short_period"
        );

        Self {
            short_period,
            long_period,
            volume_confirm,
            short_key: format!("sma_{short_period}"),
            long_key: format!("sma_{long_period}"),
        }
    }

    pub fn from_config(config: &MaCrossoverConfig) -> Self {
        Self::new(
            config.short_period,
            config.long_period,
            config.volume_confirm,
        )
    }
}

impl SignalDetector for MaCrossover {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_columns(&self) -> Vec<String> {
        let mut cols = vec![self.short_key.clone(), self.long_key.clone()];
        if self.volume_confirm {
            cols.push("volume_ratio".into());
        }
        cols
    }

    fn min_bars(&self) -> usize {
        self.long_period + 1
    }

    fn detect(
        &self,
        ticker: &str,
        series: &IndicatedSeries,
    ) -> Result<Option<SignalEvent>, DetectorError> {
        let Some((short_prev, short_now)) = last_two(series, &self.short_key)? else {
            return Ok(None);
        };
        let Some((long_prev, long_now)) = last_two(series, &self.long_key)? else {
            return Ok(None);
        };

        let golden_cross = short_prev <= long_prev && short_now > long_now;
        if !golden_cross {
            return Ok(None);
        }

        let volume_ratio = series.latest("volume_ratio");
        if self.volume_confirm && !volume_ratio.is_some_and(|r| r >= CONFIRM_VOLUME_RATIO) {
            return Ok(None);
        }

        let mut details = Details::new();
        details.insert("short_ma".into(), num(Some(short_now)));
        details.insert("long_ma".into(), num(Some(long_now)));
        details.insert("volume_ratio".into(), num(volume_ratio));
        details.insert("volume_confirmed".into(), json!(self.volume_confirm));

        Ok(Some(SignalEvent::new(
            ticker,
            self.name(),
            SignalKind::GoldenCross,
            latest_close(series)?,
            details,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::with_columns;
    use super::*;

    fn cross_series(short: Vec<f64>, long: Vec<f64>, ratio: f64) -> IndicatedSeries {
        let n = short.len();
        with_columns(
            n,
            100.0,
            &[
                ("sma_2", short),
                ("sma_3", long),
                ("volume_ratio", vec![ratio; n]),
            ],
        )
    }

    #[test]
    fn golden_cross_fires() {
        let s = cross_series(vec![9.0, 9.0, 10.0, 11.0], vec![10.0, 10.0, 10.0, 10.5], 1.5);
        let event = MaCrossover::new(2, 3, true)
            .detect("AAA", &s)
            .unwrap()
            .unwrap();
        assert_eq!(event.signal, SignalKind::GoldenCross);
        assert_eq!(event.strategy, "ma_crossover");
        assert_eq!(event.price, 100.0);
        assert_eq!(event.details["short_ma"], 11.0);
        assert_eq!(event.details["long_ma"], 10.5);
    }

    #[test]
    fn already_above_does_not_fire() {
        let s = cross_series(vec![11.0, 11.0, 11.0, 11.0], vec![10.0; 4], 1.5);
        assert_eq!(MaCrossover::new(2, 3, false).detect("AAA", &s), Ok(None));
    }

    #[test]
    fn death_cross_does_not_fire() {
        let s = cross_series(vec![11.0, 11.0, 11.0, 9.0], vec![10.0; 4], 1.5);
        assert_eq!(MaCrossover::new(2, 3, false).detect("AAA", &s), Ok(None));
    }

    #[test]
    fn weak_volume_blocks_confirmed_cross() {
        let s = cross_series(vec![9.0, 9.0, 10.0, 11.0], vec![10.0; 4], 0.8);
        assert_eq!(MaCrossover::new(2, 3, true).detect("AAA", &s), Ok(None));
        assert!(MaCrossover::new(2, 3, false)
            .detect("AAA", &s)
            .unwrap()
            .is_some());
    }

    #[test]
    fn undefined_ma_is_no_signal() {
        let s = cross_series(vec![9.0, 9.0, f64::NAN, 11.0], vec![10.0; 4], 1.5);
        assert_eq!(MaCrossover::new(2, 3, false).detect("AAA", &s), Ok(None));
    }

    #[test]
    fn guards() {
        let d = MaCrossover::new(20, 50, true);
        assert_eq!(d.min_bars(), 51);
        assert_eq!(d.required_columns(), vec!["sma_20", "sma_50", "volume_ratio"]);
    }

    #[test]
    #[should_panic(expected = "long_period must be > short_period")]
    fn rejects_inverted_periods() {
        MaCrossover::new(50, 20, false);
    }
}
