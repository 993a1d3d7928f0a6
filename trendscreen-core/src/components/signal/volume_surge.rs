//! Volume surge — heavy volume on an up day.

use serde_json::json;

use super::{latest_close, DetectorError, SignalDetector, SignalEvent, SignalKind};
use crate::components::scorer::{num, Details};
use crate::config::VolumeSurgeConfig;
use crate::domain::IndicatedSeries;

/// Fires when the latest `volume_ratio` is at least `surge_multiplier` and the
/// one-bar percent change is at least `min_price_change`.
#[derive(Debug, Clone)]
pub struct VolumeSurge {
    pub surge_multiplier: f64,
    pub min_price_change: f64,
}

impl VolumeSurge {
    pub const NAME: &'static str = "volume_surge";

    pub fn new(surge_multiplier: f64, min_price_change: f64) -> Self {
        Self {
            surge_multiplier,
            min_price_change,
        }
    }

    pub fn from_config(config: &VolumeSurgeConfig) -> Self {
        Self::new(config.surge_multiplier, config.min_price_change)
    }
}

impl SignalDetector for VolumeSurge {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_columns(&self) -> Vec<String> {
        vec!["volume_ratio".into(), "price_change_1d".into()]
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect(
        &self,
        ticker: &str,
        series: &IndicatedSeries,
    ) -> Result<Option<SignalEvent>, DetectorError> {
        let (Some(ratio), Some(change)) = (
            series.latest("volume_ratio"),
            series.latest("price_change_1d"),
        ) else {
            return Ok(None);
        };

        if ratio < self.surge_multiplier || change < self.min_price_change {
            return Ok(None);
        }

        let mut details = Details::new();
        details.insert("volume_ratio".into(), num(Some(ratio)));
        details.insert("price_change".into(), num(Some(change)));
        if let Some(volume) = series.latest("volume") {
            details.insert("volume".into(), json!(volume.round() as u64));
        }

        Ok(Some(SignalEvent::new(
            ticker,
            self.name(),
            SignalKind::VolumeSurge,
            latest_close(series)?,
            details,
        )))
    }
}
