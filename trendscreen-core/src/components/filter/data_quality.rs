//! Data quality filter — rejects tickers whose history is too short or too sparse.
//!
//! Checks, in order:
//! 1. Series is non-empty
//! 2. At least `min_data_points` bars
//! 3. Every required column is present
//! 4. No required column has more than `max_missing_ratio` NaN values

use super::{FilterCheck, FilterError, HardFilter};
use crate::config::DataQualityConfig;
use crate::domain::IndicatedSeries;

#[derive(Debug, Clone)]
pub struct DataQualityFilter {
    config: DataQualityConfig,
}

impl DataQualityFilter {
    pub fn new(config: DataQualityConfig) -> Self {
        Self { config }
    }
}

impl HardFilter for DataQualityFilter {
    fn name(&self) -> &str {
        "data_quality"
    }

    fn check(&self, _ticker: &str, series: &IndicatedSeries) -> Result<FilterCheck, FilterError> {
        if series.is_empty() {
            return Ok(FilterCheck::reject("empty series"));
        }

        if series.len() < self.config.min_data_points {
            return Ok(FilterCheck::reject(format!(
                "insufficient data: {} < {} bars",
                series.len(),
                self.config.min_data_points
            )));
        }

        let missing: Vec<&str> = self
            .config
            .required_columns
            .iter()
            .map(String::as_str)
            .filter(|c| !series.has_column(c))
            .collect();
        if !missing.is_empty() {
            return Ok(FilterCheck::reject(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }

        for column in &self.config.required_columns {
            let ratio = series
                .missing_ratio(column)
                .ok_or_else(|| FilterError::MissingValue(column.clone()))?;
            if ratio > self.config.max_missing_ratio {
                return Ok(FilterCheck::reject(format!(
                    "column {column} has {:.1}% missing values",
                    ratio * 100.0
                )));
            }
        }

        Ok(FilterCheck::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::series;
    use super::*;

    fn filter() -> DataQualityFilter {
        DataQualityFilter::new(DataQualityConfig::default())
    }

    #[test]
    fn passes_clean_history() {
        let s = series(&[20.0; 120], 1_000.0);
        assert_eq!(filter().check("OK", &s), Ok(FilterCheck::Pass));
    }

    #[test]
    fn rejects_empty() {
        let s = series(&[], 1_000.0);
        assert_eq!(
            filter().check("E", &s),
            Ok(FilterCheck::reject("empty series"))
        );
    }

    #[test]
    fn rejects_short_history() {
        let s = series(&[20.0; 40], 1_000.0);
        assert_eq!(
            filter().check("S", &s),
            Ok(FilterCheck::reject("insufficient data: 40 < 100 bars"))
        );
    }

    #[test]
    fn rejects_missing_column() {
        let mut cfg = DataQualityConfig::default();
        cfg.required_columns.push("rsi".into());
        cfg.required_columns.push("atr".into());
        let s = series(&[20.0; 120], 1_000.0);
        assert_eq!(
            DataQualityFilter::new(cfg).check("M", &s),
            Ok(FilterCheck::reject("missing columns: rsi, atr"))
        );
    }

    #[test]
    fn rejects_sparse_volume() {
        let mut s = series(&[20.0; 100], 1_000.0);
        let mut volume = s.column("volume").unwrap().to_vec();
        for v in volume.iter_mut().take(11) {
            *v = f64::NAN;
        }
        s.insert_column("volume", volume).unwrap();
        assert_eq!(
            filter().check("N", &s),
            Ok(FilterCheck::reject("column volume has 11.0% missing values"))
        );
    }

    #[test]
    fn tolerates_exactly_ten_percent_missing() {
        let mut s = series(&[20.0; 100], 1_000.0);
        let mut close = s.column("close").unwrap().to_vec();
        for v in close.iter_mut().take(10) {
            *v = f64::NAN;
        }
        s.insert_column("close", close).unwrap();
        assert_eq!(filter().check("T", &s), Ok(FilterCheck::Pass));
    }
}
