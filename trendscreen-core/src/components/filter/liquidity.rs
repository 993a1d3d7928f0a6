//! Liquidity filter — rejects penny stocks and thinly traded names.
//!
//! Average dollar volume = mean(volume over the trailing window) × mean(close
//! over the same window). The latest close must clear `min_price` first, even
//! when the history is too short for the volume window.

use super::{format_dollars, FilterCheck, FilterError, HardFilter};
use crate::config::LiquidityFilterConfig;
use crate::domain::IndicatedSeries;

#[derive(Debug, Clone)]
pub struct LiquidityFilter {
    config: LiquidityFilterConfig,
}

impl LiquidityFilter {
    pub fn new(config: LiquidityFilterConfig) -> Self {
        Self { config }
    }
}

impl HardFilter for LiquidityFilter {
    fn name(&self) -> &str {
        "liquidity"
    }

    fn check(&self, _ticker: &str, series: &IndicatedSeries) -> Result<FilterCheck, FilterError> {
        let period = self.config.volume_period;
        if series.is_empty() {
            return Ok(FilterCheck::reject("insufficient data: no bars"));
        }

        let price = series
            .latest("close")
            .ok_or_else(|| FilterError::MissingValue("close".into()))?;
        if price < self.config.min_price {
            return Ok(FilterCheck::reject(format!(
                "price too low {} < {}",
                format_dollars(price),
                format_dollars(self.config.min_price)
            )));
        }

        if series.len() < period {
            return Ok(FilterCheck::reject(format!(
                "insufficient data: need {period} bars for volume average"
            )));
        }

        let dollar_volume = series
            .avg_dollar_volume(period)
            .ok_or_else(|| FilterError::MissingValue("volume".into()))?;
        if dollar_volume < self.config.min_avg_dollar_volume {
            return Ok(FilterCheck::reject(format!(
                "dollar volume too low {} < {}",
                format_dollars(dollar_volume),
                format_dollars(self.config.min_avg_dollar_volume)
            )));
        }

        Ok(FilterCheck::Pass)
    }
}
