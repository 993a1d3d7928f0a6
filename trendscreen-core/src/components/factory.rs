//! Factory system — converts config tables into runtime trait objects.
//!
//! Three entry points: `create_indicators` (indicator set for the engine),
//! `create_trend_scorer` (scorer registry, by name) and `create_detectors`
//! (enabled strategy detectors, in a fixed order).

use std::collections::HashSet;

use crate::config::{IndicatorConfig, StrategiesConfig, TrendScorerConfig};
use crate::indicators::{
    Adx, AdxLine, Atr, Bollinger, BollingerBand, Ema, Macd, MacdLine, PriceChange, Rsi, Sma,
    VolumeMa, VolumeRatio,
};

use super::indicator::Indicator;
use super::scorer::{MaAdxScorer, TrendScorer};
use super::signal::{Breakout, MaCrossover, RsiReversal, SignalDetector, VolumeSurge};

// ─── Error type ──────────────────────────────────────────────────────

/// Errors that can occur during component construction.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FactoryError {
    #[error("unknown trend scorer: {0}")]
    UnknownScorer(String),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Strategy names in the order detectors run.
pub const STRATEGIES: &[&str] = &[
    MaCrossover::NAME,
    VolumeSurge::NAME,
    Breakout::NAME,
    RsiReversal::NAME,
];

// ─── Indicator factory ───────────────────────────────────────────────

/// Build the deduplicated indicator set described by an `IndicatorConfig`.
///
/// Periods are assumed valid (`IndicatorConfig::validate`); indicator
/// constructors assert on zero periods.
pub fn create_indicators(config: &IndicatorConfig) -> Vec<Box<dyn Indicator>> {
    let mut seen = HashSet::new();
    let mut indicators: Vec<Box<dyn Indicator>> = Vec::new();

    let mut add = |ind: Box<dyn Indicator>| {
        let key = ind.name().to_string();
        if seen.insert(key) {
            indicators.push(ind);
        }
    };

    for &p in &config.ma_periods {
        add(Box::new(Sma::new(p)));
        add(Box::new(Ema::new(p)));
    }
    if let Some(p) = config.rsi_period {
        add(Box::new(Rsi::new(p)));
    }
    if let Some(m) = &config.macd {
        for line in [MacdLine::Macd, MacdLine::Signal, MacdLine::Histogram] {
            add(Box::new(Macd::new(m.fast, m.slow, m.signal, line)));
        }
    }
    if let Some(bb) = &config.bollinger {
        for band in [BollingerBand::Upper, BollingerBand::Middle, BollingerBand::Lower] {
            add(Box::new(Bollinger::new(bb.period, bb.std_dev, band)));
        }
    }
    if let Some(p) = config.atr_period {
        add(Box::new(Atr::new(p)));
    }
    if let Some(p) = config.adx_period {
        for line in [AdxLine::Adx, AdxLine::PlusDi, AdxLine::MinusDi] {
            add(Box::new(Adx::new(p, line)));
        }
    }
    if let Some(p) = config.volume_ma_period {
        add(Box::new(VolumeMa::new(p)));
        add(Box::new(VolumeRatio::new(p)));
    }
    for &p in &config.price_change_periods {
        add(Box::new(PriceChange::new(p)));
    }

    indicators
}

// ─── Scorer factory ──────────────────────────────────────────────────

/// Create a trend scorer by its registry name.
pub fn create_trend_scorer(
    config: &TrendScorerConfig,
) -> Result<Box<dyn TrendScorer>, FactoryError> {
    match config.name.as_str() {
        MaAdxScorer::NAME => Ok(Box::new(MaAdxScorer::new(config))),
        other => Err(FactoryError::UnknownScorer(other.to_string())),
    }
}

// ─── Detector factory ────────────────────────────────────────────────

/// Create one detector by strategy name, regardless of its `enabled` flag.
pub fn create_detector(
    name: &str,
    config: &StrategiesConfig,
) -> Result<Box<dyn SignalDetector>, FactoryError> {
    match name {
        MaCrossover::NAME => Ok(Box::new(MaCrossover::from_config(&config.ma_crossover))),
        VolumeSurge::NAME => Ok(Box::new(VolumeSurge::from_config(&config.volume_surge))),
        Breakout::NAME => Ok(Box::new(Breakout::from_config(&config.breakout))),
        RsiReversal::NAME => Ok(Box::new(RsiReversal::from_config(&config.rsi))),
        other => Err(FactoryError::UnknownStrategy(other.to_string())),
    }
}

/// Every enabled detector, in [`STRATEGIES`] order.
pub fn create_detectors(config: &StrategiesConfig) -> Vec<Box<dyn SignalDetector>> {
    let enabled = [
        config.ma_crossover.enabled,
        config.volume_surge.enabled,
        config.breakout.enabled,
        config.rsi.enabled,
    ];
    STRATEGIES
        .iter()
        .zip(enabled)
        .filter(|(_, on)| *on)
        .filter_map(|(name, _)| create_detector(name, config).ok())
        .collect()
}
