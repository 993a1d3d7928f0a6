//! Indicator engine — augments a ticker's bars with every configured column.
//!
//! All indicators are computed once per ticker, up front. Filters, scorers
//! and detectors only ever read the resulting [`IndicatedSeries`].

use thiserror::Error;
use tracing::{debug, warn};

use crate::components::factory::create_indicators;
use crate::components::indicator::Indicator;
use crate::config::{ConfigError, IndicatorConfig};
use crate::domain::{Bar, IndicatedSeries};

#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("cannot compute indicators on an empty bar series")]
    EmptySeries,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A validated, reusable indicator set.
pub struct IndicatorEngine {
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorEngine {
    /// Validate the config and build its indicator set.
    pub fn new(config: &IndicatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            indicators: create_indicators(config),
        })
    }

    pub fn from_indicators(indicators: Vec<Box<dyn Indicator>>) -> Self {
        Self { indicators }
    }

    pub fn with_indicator(mut self, indicator: Box<dyn Indicator>) -> Self {
        self.indicators.push(indicator);
        self
    }

    pub fn indicators(&self) -> &[Box<dyn Indicator>] {
        &self.indicators
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.indicators.iter().map(|i| i.name()).collect()
    }

    /// Longest lookback across the indicator set.
    pub fn warmup(&self) -> usize {
        self.indicators.iter().map(|i| i.lookback()).max().unwrap_or(0)
    }

    /// Compute every indicator over `bars` (chronological order).
    ///
    /// An indicator whose output does not line up with the bars is logged and
    /// left out; the remaining columns are still produced.
    pub fn augment(&self, bars: Vec<Bar>) -> Result<IndicatedSeries, IndicatorError> {
        if bars.is_empty() {
            return Err(IndicatorError::EmptySeries);
        }

        let values: Vec<(String, Vec<f64>)> = self
            .indicators
            .iter()
            .map(|ind| (ind.name().to_string(), ind.compute(&bars)))
            .collect();

        let mut series = IndicatedSeries::from_bars(bars);
        for (name, column) in values {
            if let Err(e) = series.insert_column(name.as_str(), column) {
                warn!(indicator = %name, error = %e, "indicator skipped");
            }
        }
        debug!(bars = series.len(), columns = series.column_names().count(), "augmented");
        Ok(series)
    }
}

/// One-shot augmentation with a fresh engine.
pub fn augment(bars: Vec<Bar>, config: &IndicatorConfig) -> Result<IndicatedSeries, IndicatorError> {
    IndicatorEngine::new(config)?.augment(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, Sma, DEFAULT_EPSILON};

    /// Emits one value too few.
    struct Truncated;

    impl Indicator for Truncated {
        fn name(&self) -> &str {
            "truncated"
        }

        fn lookback(&self) -> usize {
            0
        }

        fn compute(&self, bars: &[Bar]) -> Vec<f64> {
            vec![1.0; bars.len().saturating_sub(1)]
        }
    }

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn default_config_produces_all_columns() {
        let series = augment(make_bars(&closes(250)), &IndicatorConfig::default()).unwrap();
        for column in IndicatorConfig::default().columns() {
            assert!(series.has_column(&column), "missing {column}");
        }
        assert_eq!(series.len(), 250);
    }

    #[test]
    fn sma_values_line_up() {
        let engine = IndicatorEngine::from_indicators(vec![Box::new(Sma::new(3))]);
        let series = engine.augment(make_bars(&[10.0, 11.0, 12.0, 13.0])).unwrap();
        assert_eq!(series.value("sma_3", 1), None);
        assert_approx(series.value("sma_3", 2).unwrap(), 11.0, DEFAULT_EPSILON);
        assert_approx(series.latest("sma_3").unwrap(), 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_bars_is_an_error() {
        assert_eq!(
            augment(Vec::new(), &IndicatorConfig::default()).err(),
            Some(IndicatorError::EmptySeries)
        );
    }

    #[test]
    fn misaligned_indicator_is_skipped_not_fatal() {
        let engine = IndicatorEngine::from_indicators(vec![Box::new(Sma::new(2))])
            .with_indicator(Box::new(Truncated));
        let series = engine.augment(make_bars(&closes(10))).unwrap();
        assert!(series.has_column("sma_2"));
        assert!(!series.has_column("truncated"));
    }

    #[test]
    fn invalid_config_fails_at_construction() {
        let config = IndicatorConfig {
            rsi_period: Some(0),
            ..IndicatorConfig::empty()
        };
        assert!(IndicatorEngine::new(&config).is_err());
    }

    #[test]
    fn warmup_is_longest_lookback() {
        let engine = IndicatorEngine::new(&IndicatorConfig::default()).unwrap();
        // sma_200
        assert_eq!(engine.warmup(), 199);
        assert!(engine.column_names().contains(&"adx"));
    }
}
