//! Screening engine — indicator augmentation and final ranking.
//!
//! The two ends of a screen: [`IndicatorEngine`] turns raw bars into an
//! [`IndicatedSeries`](crate::domain::IndicatedSeries) before filtering, and
//! [`ScoringEngine`] turns per-ticker scores and signal events into the
//! ranked shortlist.

pub mod precompute;
pub mod scoring;

pub use precompute::{augment, IndicatorEngine, IndicatorError};
pub use scoring::{
    multi_strategy_score, signal_score, BasicInfo, Confidence, FinalScore, RankedResult,
    ScoringEngine,
};
