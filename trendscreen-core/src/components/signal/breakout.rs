//! Price breakout — latest close above the prior N-bar high.

use serde_json::json;

use super::{latest_close, DetectorError, SignalDetector, SignalEvent, SignalKind};
use crate::components::scorer::{num, Details};
use crate::config::BreakoutConfig;
use crate::domain::series::nan_max;
use crate::domain::IndicatedSeries;

/// Breakout detector.
///
/// The reference high is the maximum `high` over the `lookback_period` bars
/// before the latest one; the latest bar's own high is excluded.
#[derive(Debug, Clone)]
pub struct Breakout {
    pub lookback_period: usize,
    pub volume_confirm: bool,
    pub min_volume_ratio: f64,
}

impl Breakout {
    pub const NAME: &'static str = "breakout";

    pub fn new(lookback_period: usize, volume_confirm: bool, min_volume_ratio: f64) -> Self {
        assert!(lookback_period >= 1, "lookback_period must be >= 1");
        Self {
            lookback_period,
            volume_confirm,
            min_volume_ratio,
        }
    }

    pub fn from_config(config: &BreakoutConfig) -> Self {
        Self::new(
            config.lookback_period,
            config.volume_confirm,
            config.min_volume_ratio,
        )
    }

    fn prior_high(&self, series: &IndicatedSeries) -> Result<Option<f64>, DetectorError> {
        let highs = series
            .column("high")
            .ok_or_else(|| DetectorError::MissingColumn("high".into()))?;
        if highs.len() < self.lookback_period + 1 {
            return Ok(None);
        }
        let end = highs.len() - 1;
        Ok(nan_max(&highs[end - self.lookback_period..end]))
    }
}

impl SignalDetector for Breakout {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_columns(&self) -> Vec<String> {
        let mut cols = vec!["close".to_string(), "high".to_string()];
        if self.volume_confirm {
            cols.push("volume_ratio".into());
        }
        cols
    }

    fn min_bars(&self) -> usize {
        self.lookback_period + 1
    }

    fn detect(
        &self,
        ticker: &str,
        series: &IndicatedSeries,
    ) -> Result<Option<SignalEvent>, DetectorError> {
        let Some(recent_high) = self.prior_high(series)? else {
            return Ok(None);
        };
        if recent_high <= 0.0 {
            return Err(DetectorError::NonFinite("high".into()));
        }

        let close = latest_close(series)?;
        if close <= recent_high {
            return Ok(None);
        }

        let volume_ratio = series.latest("volume_ratio");
        if self.volume_confirm && !volume_ratio.is_some_and(|r| r >= self.min_volume_ratio) {
            return Ok(None);
        }

        let breakout_pct = (close - recent_high) / recent_high * 100.0;

        let mut details = Details::new();
        details.insert("recent_high".into(), num(Some(recent_high)));
        details.insert("breakout_pct".into(), num(Some(breakout_pct)));
        details.insert("volume_ratio".into(), num(volume_ratio));
        details.insert("lookback_period".into(), json!(self.lookback_period));

        Ok(Some(SignalEvent::new(
            ticker,
            self.name(),
            SignalKind::PriceBreakout,
            close,
            details,
        )))
    }
}
