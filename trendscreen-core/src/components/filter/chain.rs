//! Filter chain — runs hard filters in order and records the funnel.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::{
    DataQualityFilter, HardFilter, LiquidityFilter, TrendFilter, WeeklyTrendFilter,
};
use crate::config::FilterConfig;
use crate::domain::{Bar, Universe};

/// Funnel record for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStage {
    pub name: String,
    pub input: usize,
    pub passed: usize,
    /// Ticker → rejection reason.
    pub rejected: BTreeMap<String, String>,
}

/// Final survivors plus a record per stage, in execution order.
#[derive(Debug, Clone, Default)]
pub struct ChainOutcome {
    pub survivors: Universe,
    pub stages: Vec<FilterStage>,
}

/// Ordered list of hard filters.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn HardFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard chain: data quality → liquidity → trend, plus weekly trend when enabled.
    ///
    /// `weekly_bars` supplies the weekly series for the optional fourth stage;
    /// tickers absent from it degrade to "unknown" and pass.
    pub fn from_config(config: &FilterConfig, weekly_bars: BTreeMap<String, Vec<Bar>>) -> Self {
        let mut chain = Self::new()
            .with_filter(Box::new(DataQualityFilter::new(config.data_quality.clone())))
            .with_filter(Box::new(LiquidityFilter::new(config.liquidity.clone())))
            .with_filter(Box::new(TrendFilter::new(config.trend.clone())));
        if config.weekly_trend.enabled {
            chain = chain.with_filter(Box::new(WeeklyTrendFilter::new(
                config.weekly_trend.clone(),
                weekly_bars,
            )));
        }
        chain
    }

    /// Append a filter to the end of the chain.
    pub fn with_filter(mut self, filter: Box<dyn HardFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every stage; each sees only the previous stage's survivors.
    pub fn run(&self, universe: Universe) -> ChainOutcome {
        let initial = universe.len();
        let mut survivors = universe;
        let mut stages = Vec::with_capacity(self.filters.len());

        for filter in &self.filters {
            let input = survivors.len();
            let verdict = filter.apply(survivors);
            stages.push(FilterStage {
                name: filter.name().to_string(),
                input,
                passed: verdict.passed_count(),
                rejected: verdict.rejected,
            });
            survivors = verdict.passed;
        }

        info!(
            stages = stages.len(),
            input = initial,
            survivors = survivors.len(),
            "filter chain complete"
        );
        ChainOutcome { survivors, stages }
    }
}
