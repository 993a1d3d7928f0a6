//! Scorers — turn a filtered ticker's series into 0–100 scores.
//!
//! The trend scorer produces a [`ScoreBreakdown`] of named weighted components.
//! The same structure is reused by the final ranking stage, so every score a
//! reader sees can be traced back to its parts.

pub mod liquidity;
pub mod ma_adx;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::IndicatedSeries;

pub use liquidity::LiquidityScorer;
pub use ma_adx::MaAdxScorer;

/// Free-form supporting values attached to a score or signal.
pub type Details = BTreeMap<String, Value>;

/// Round to 2 decimal places, the precision every reported score uses.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// JSON value for an optional number, `null` when absent or non-finite.
pub fn num(x: Option<f64>) -> Value {
    x.filter(|v| v.is_finite())
        .map_or(Value::Null, |v| Value::from(round2(v)))
}

/// One named, weighted part of a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    #[serde(default)]
    pub details: Details,
}

/// Weighted total in [0, 100] with its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub components: BTreeMap<String, ScoreComponent>,
    /// Whether `total` meets the configured minimum.
    pub pass_threshold: bool,
    #[serde(default)]
    pub details: Details,
}

/// Input row for [`ScoreBreakdown::weighted`]: (name, score, weight, details).
pub type ComponentInput<'a> = (&'a str, f64, f64, Details);

impl ScoreBreakdown {
    /// Combine component scores into a weighted total.
    ///
    /// Component scores and contributions are rounded to 2 decimals for
    /// reporting; the total is summed unrounded, clamped to [0, 100], then rounded.
    pub fn weighted(components: Vec<ComponentInput<'_>>, threshold: f64, details: Details) -> Self {
        let raw_total: f64 = components.iter().map(|(_, s, w, _)| s * w).sum();
        let total = round2(raw_total.clamp(0.0, 100.0));
        let components = components
            .into_iter()
            .map(|(name, score, weight, details)| {
                (
                    name.to_string(),
                    ScoreComponent {
                        score: round2(score),
                        weight,
                        weighted_score: round2(score * weight),
                        details,
                    },
                )
            })
            .collect();
        Self {
            total,
            components,
            pass_threshold: total >= threshold,
            details,
        }
    }

    /// All-zero breakdown over the given (name, weight) pairs.
    pub fn zeroed(weights: &[(&str, f64)], details: Details) -> Self {
        let components = weights
            .iter()
            .map(|(name, weight)| {
                (
                    name.to_string(),
                    ScoreComponent {
                        score: 0.0,
                        weight: *weight,
                        weighted_score: 0.0,
                        details: Details::new(),
                    },
                )
            })
            .collect();
        Self {
            total: 0.0,
            components,
            pass_threshold: false,
            details,
        }
    }

    pub fn component(&self, name: &str) -> Option<&ScoreComponent> {
        self.components.get(name)
    }
}

/// Identity of a scorer, reported alongside its scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Trait for trend scorers.
///
/// Scoring never fails: missing inputs degrade the affected component to a
/// documented default and are noted in that component's details.
pub trait TrendScorer: Send + Sync {
    /// Registry name (e.g., "ma_adx").
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn description(&self) -> &str;

    /// Columns the scorer reads.
    fn required_indicators(&self) -> Vec<&'static str>;

    fn score(&self, series: &IndicatedSeries) -> ScoreBreakdown;

    fn info(&self) -> ScorerInfo {
        ScorerInfo {
            name: self.name().to_string(),
            version: self.version().to_string(),
            description: self.description().to_string(),
        }
    }
}
