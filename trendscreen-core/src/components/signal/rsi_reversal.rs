//! RSI reversal — RSI crossing back out of an extreme zone.

use serde_json::json;

use super::{last_two, latest_close, DetectorError, SignalDetector, SignalEvent, SignalKind};
use crate::components::scorer::{num, Details};
use crate::config::{RsiMode, RsiReversalConfig};
use crate::domain::IndicatedSeries;

/// Oversold rebound: previous RSI ≤ `oversold`, latest RSI > `oversold`.
/// Overbought pullback: previous RSI ≥ `overbought`, latest RSI < `overbought`.
#[derive(Debug, Clone)]
pub struct RsiReversal {
    pub oversold: f64,
    pub overbought: f64,
    pub mode: RsiMode,
}

impl RsiReversal {
    pub const NAME: &'static str = "rsi";

    pub fn new(oversold: f64, overbought: f64, mode: RsiMode) -> Self {
        assert!(oversold < overbought, "oversold must be < overbought");
        Self {
            oversold,
            overbought,
            mode,
        }
    }

    pub fn from_config(config: &RsiReversalConfig) -> Self {
        Self::new(config.oversold, config.overbought, config.mode)
    }

    fn classify(&self, prev: f64, now: f64) -> Option<(SignalKind, f64)> {
        let rebound = prev <= self.oversold && now > self.oversold;
        let pullback = prev >= self.overbought && now < self.overbought;

        match self.mode {
            RsiMode::Oversold if rebound => Some((SignalKind::RsiOversoldRebound, self.oversold)),
            RsiMode::Overbought if pullback => {
                Some((SignalKind::RsiOverboughtPullback, self.overbought))
            }
            RsiMode::Both if rebound => Some((SignalKind::RsiOversoldRebound, self.oversold)),
            RsiMode::Both if pullback => Some((SignalKind::RsiOverboughtPullback, self.overbought)),
            _ => None,
        }
    }
}

impl SignalDetector for RsiReversal {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_columns(&self) -> Vec<String> {
        vec!["close".into(), "rsi".into()]
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect(
        &self,
        ticker: &str,
        series: &IndicatedSeries,
    ) -> Result<Option<SignalEvent>, DetectorError> {
        let Some((prev, now)) = last_two(series, "rsi")? else {
            return Ok(None);
        };
        let Some((kind, threshold)) = self.classify(prev, now) else {
            return Ok(None);
        };

        let mut details = Details::new();
        details.insert("rsi".into(), num(Some(now)));
        details.insert("rsi_prev".into(), num(Some(prev)));
        details.insert("threshold".into(), json!(threshold));

        Ok(Some(SignalEvent::new(
            ticker,
            self.name(),
            kind,
            latest_close(series)?,
            details,
        )))
    }
}
