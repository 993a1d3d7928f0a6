//! Domain types for the screener: bars, indicator-augmented series, universes.

pub mod bar;
pub mod resample;
pub mod series;

pub use bar::Bar;
pub use resample::resample_weekly;
pub use series::{IndicatedSeries, SeriesError, BASE_COLUMNS};

use std::collections::BTreeMap;

/// Ticker type alias
pub type Ticker = String;

/// Ticker → augmented series. Ordered so every stage iterates deterministically.
pub type Universe = BTreeMap<Ticker, IndicatedSeries>;

/// Ticker → raw bars, as handed to the indicator engine.
pub type BarsByTicker = BTreeMap<Ticker, Vec<Bar>>;
