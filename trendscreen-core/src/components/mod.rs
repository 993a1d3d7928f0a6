//! Component traits — the pluggable stages of a screen.
//!
//! Each stage family has one capability contract, and concrete
//! implementations are registered by name in [`factory`]:
//! - Indicator: bar history in, one named column out
//! - Hard filter: pass or reject a ticker with a reason
//! - Trend scorer: weighted 0–100 breakdown per ticker
//! - Signal detector: zero or one discrete event per ticker

pub mod factory;
pub mod filter;
pub mod indicator;
pub mod scorer;
pub mod signal;

pub use factory::FactoryError;
pub use filter::{FilterChain, FilterCheck, FilterError, FilterVerdict, HardFilter};
pub use indicator::{Indicator, IndicatorValues};
pub use scorer::{LiquidityScorer, MaAdxScorer, ScoreBreakdown, ScoreComponent, TrendScorer};
pub use signal::{DetectorError, SignalDetector, SignalEvent, SignalKind};
