//! Screening pipeline — wires the core stages together for one run.
//!
//! Order of work:
//! 1. Augment every ticker's bars with indicator columns (parallel)
//! 2. Run the hard filter chain, recording the funnel
//! 3. Score survivors for trend and liquidity (parallel)
//! 4. Scan survivors with every enabled signal detector
//! 5. Rank signalled tickers and build the report
//!
//! Per-ticker work is fanned out with rayon and collected into ordered maps,
//! so the report does not depend on thread scheduling.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info};
use trendscreen_core::components::factory::{create_detectors, create_trend_scorer};
use trendscreen_core::components::filter::FilterChain;
use trendscreen_core::components::scorer::{LiquidityScorer, ScoreBreakdown, TrendScorer};
use trendscreen_core::components::signal::{SignalDetector, SignalEvent};
use trendscreen_core::config::ScreenConfig;
use trendscreen_core::domain::{resample_weekly, BarsByTicker, IndicatedSeries, Universe};
use trendscreen_core::engine::{IndicatorEngine, ScoringEngine};

use crate::config::{fingerprint, ConfigHash};
use crate::data_loader::{dataset_hash, LoadedBars};
use crate::report::{ScreenReport, SCHEMA_VERSION};

/// A configured screen, ready to run over any number of universes.
///
/// Every component is built and validated up front; `run` cannot fail on
/// configuration.
pub struct Pipeline {
    config: ScreenConfig,
    config_hash: ConfigHash,
    indicators: IndicatorEngine,
    trend_scorer: Box<dyn TrendScorer>,
    liquidity_scorer: LiquidityScorer,
    detectors: Vec<Box<dyn SignalDetector>>,
    scoring: ScoringEngine,
}

impl Pipeline {
    pub fn new(config: ScreenConfig) -> Result<Self> {
        config.validate()?;
        let indicators = IndicatorEngine::new(&config.indicators)?;
        let trend_scorer = create_trend_scorer(&config.trend_scorer)?;
        let liquidity_scorer = LiquidityScorer::new(config.liquidity_scorer.clone());
        let detectors = create_detectors(&config.strategies);
        let scoring = ScoringEngine::new(config.scoring.clone())?;
        let config_hash = fingerprint(&config)?;

        info!(
            config_hash = %config_hash,
            columns = indicators.column_names().len(),
            trend_scorer = trend_scorer.name(),
            detectors = detectors.len(),
            "pipeline ready"
        );

        Ok(Self {
            config,
            config_hash,
            indicators,
            trend_scorer,
            liquidity_scorer,
            detectors,
            scoring,
        })
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// Names of the enabled detectors, in scan order.
    pub fn strategies(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Screen daily bars only; a convenience for synthetic universes.
    pub fn run_daily(&self, daily: BarsByTicker, as_of: DateTime<Utc>) -> ScreenReport {
        let dataset_hash = dataset_hash(&daily);
        self.run(
            LoadedBars {
                daily,
                weekly: BarsByTicker::new(),
                dataset_hash,
            },
            as_of,
        )
    }

    /// Run one screen. `as_of` stamps every ranked result.
    pub fn run(&self, bars: LoadedBars, as_of: DateTime<Utc>) -> ScreenReport {
        let LoadedBars {
            daily,
            weekly,
            dataset_hash,
        } = bars;
        let universe_size = daily.len();
        let weekly = self.weekly_bars(&daily, weekly);

        // 1. Indicators
        let universe = self.augment_all(daily);

        // 2. Hard filters
        let outcome = FilterChain::from_config(&self.config.filters, weekly).run(universe);
        let survivors = outcome.survivors;

        // 3. Scores
        let (liquidity, trend) = self.score_all(&survivors);

        // 4. Signals
        let mut signal_counts: BTreeMap<String, usize> = self
            .detectors
            .iter()
            .map(|d| (d.name().to_string(), 0))
            .collect();
        let mut events: Vec<SignalEvent> = Vec::new();
        for detector in &self.detectors {
            let found = detector.scan(&survivors);
            *signal_counts.entry(detector.name().to_string()).or_default() += found.len();
            events.extend(found);
        }

        // 5. Ranking
        let ranked = self.scoring.rank(&liquidity, &trend, events, as_of);

        info!(
            universe = universe_size,
            survivors = survivors.len(),
            signals = signal_counts.values().sum::<usize>(),
            ranked = ranked.len(),
            "screen complete"
        );

        ScreenReport {
            schema_version: SCHEMA_VERSION,
            config_hash: self.config_hash.clone(),
            dataset_hash,
            as_of,
            universe_size,
            survivors: survivors.len(),
            funnel: outcome.stages,
            signal_counts,
            ranked,
        }
    }

    /// Caller-supplied weekly bars win; the rest are resampled from daily
    /// bars when enabled. Empty when the weekly filter is off.
    fn weekly_bars(&self, daily: &BarsByTicker, mut supplied: BarsByTicker) -> BarsByTicker {
        let cfg = &self.config.filters.weekly_trend;
        if !cfg.enabled {
            return BarsByTicker::new();
        }
        if cfg.resample_from_daily {
            for (ticker, bars) in daily {
                supplied
                    .entry(ticker.clone())
                    .or_insert_with(|| resample_weekly(bars));
            }
        }
        supplied
    }

    /// Empty series stay in the universe as empty so the data quality filter
    /// records why they were dropped.
    fn augment_all(&self, daily: BarsByTicker) -> Universe {
        daily
            .into_par_iter()
            .map(|(ticker, bars)| {
                let series = match self.indicators.augment(bars) {
                    Ok(series) => series,
                    Err(err) => {
                        debug!(%ticker, error = %err, "no indicators computed");
                        IndicatedSeries::default()
                    }
                };
                (ticker, series)
            })
            .collect()
    }

    fn score_all(
        &self,
        survivors: &Universe,
    ) -> (BTreeMap<String, f64>, BTreeMap<String, ScoreBreakdown>) {
        let scored: Vec<(String, f64, ScoreBreakdown)> = survivors
            .par_iter()
            .map(|(ticker, series)| {
                (
                    ticker.clone(),
                    self.liquidity_scorer.score(series),
                    self.trend_scorer.score(series),
                )
            })
            .collect();

        let mut liquidity = BTreeMap::new();
        let mut trend = BTreeMap::new();
        for (ticker, liq, breakdown) in scored {
            liquidity.insert(ticker.clone(), liq);
            trend.insert(ticker, breakdown);
        }
        (liquidity, trend)
    }
}
