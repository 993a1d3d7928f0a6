//! Scoring engine — blends liquidity, trend and signal scores into a ranking.
//!
//! Only tickers with at least one signal event and both a liquidity and a
//! trend score are ranked. Output order is fully determined by the inputs:
//! final total descending, then ticker ascending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::components::scorer::{round2, Details, ScoreBreakdown};
use crate::components::signal::SignalEvent;
use crate::config::{ConfigError, ScoringConfig};

/// Signal score before any bonus is added.
pub const SIGNAL_BASE_SCORE: f64 = 50.0;
/// Cap on the summed per-signal bonuses.
pub const SIGNAL_BONUS_CAP: f64 = 50.0;

/// Discrete confidence tier attached to each ranked result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// high: total ≥ 80, trend ≥ 70 and at least two signals.
    /// medium: total ≥ 65 and trend ≥ 50.
    pub fn classify(total: f64, trend_total: f64, signal_count: usize) -> Self {
        if total >= 80.0 && trend_total >= 70.0 && signal_count >= 2 {
            Confidence::High
        } else if total >= 65.0 && trend_total >= 50.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    /// Price reported by the first signal event.
    pub price: f64,
}

/// Final weighted breakdown plus its position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
    /// 1-based.
    pub rank: usize,
    pub confidence: Confidence,
}

/// One entry of the ranked shortlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub ticker: String,
    pub timestamp: DateTime<Utc>,
    pub basic_info: BasicInfo,
    pub liquidity_score: f64,
    pub trend_score: ScoreBreakdown,
    pub signals: Vec<SignalEvent>,
    pub signal_score: f64,
    pub multi_strategy_score: f64,
    pub final_score: FinalScore,
}

/// Signal strength: base 50 plus the kind bonuses, bonus capped at 50.
pub fn signal_score(events: &[SignalEvent]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }
    let bonus: f64 = events.iter().map(|e| e.signal.bonus()).sum();
    (SIGNAL_BASE_SCORE + bonus.min(SIGNAL_BONUS_CAP)).min(100.0)
}

/// Resonance across strategies: 100 / 70 / 30 / 0 for ≥3 / 2 / 1 / 0 distinct strategies.
pub fn multi_strategy_score(events: &[SignalEvent]) -> f64 {
    match distinct_strategies(events).len() {
        0 => 0.0,
        1 => 30.0,
        2 => 70.0,
        _ => 100.0,
    }
}

fn distinct_strategies(events: &[SignalEvent]) -> BTreeSet<&str> {
    events.iter().map(|e| e.strategy.as_str()).collect()
}

pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score, sort, truncate and rank.
    ///
    /// `as_of` stamps every result, so identical inputs give identical output.
    pub fn rank(
        &self,
        liquidity: &BTreeMap<String, f64>,
        trend: &BTreeMap<String, ScoreBreakdown>,
        events: Vec<SignalEvent>,
        as_of: DateTime<Utc>,
    ) -> Vec<RankedResult> {
        let mut by_ticker: BTreeMap<String, Vec<SignalEvent>> = BTreeMap::new();
        for event in events {
            by_ticker.entry(event.ticker.clone()).or_default().push(event);
        }
        let signalled = by_ticker.len();

        let mut scored: Vec<RankedResult> = by_ticker
            .into_iter()
            .filter_map(|(ticker, signals)| {
                let (Some(&liq), Some(trend_score)) = (liquidity.get(&ticker), trend.get(&ticker))
                else {
                    debug!(%ticker, "missing liquidity or trend score, not ranked");
                    return None;
                };
                Some(self.score_one(ticker, liq, trend_score.clone(), signals, as_of))
            })
            .collect();
        let scored_count = scored.len();

        scored.sort_by(|a, b| {
            b.final_score
                .breakdown
                .total
                .total_cmp(&a.final_score.breakdown.total)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });
        scored.truncate(self.config.output_count);

        for (i, result) in scored.iter_mut().enumerate() {
            result.final_score.rank = i + 1;
            result.final_score.confidence = Confidence::classify(
                result.final_score.breakdown.total,
                result.trend_score.total,
                result.signals.len(),
            );
        }

        info!(
            signalled,
            scored = scored_count,
            output = scored.len(),
            "scoring complete"
        );
        scored
    }

    fn score_one(
        &self,
        ticker: String,
        liquidity_score: f64,
        trend_score: ScoreBreakdown,
        signals: Vec<SignalEvent>,
        as_of: DateTime<Utc>,
    ) -> RankedResult {
        let w = &self.config.weights;
        let signal = signal_score(&signals);
        let resonance = multi_strategy_score(&signals);

        let mut signal_details = Details::new();
        signal_details.insert("signal_count".into(), json!(signals.len()));
        let mut resonance_details = Details::new();
        resonance_details.insert(
            "strategies".into(),
            json!(distinct_strategies(&signals).into_iter().collect::<Vec<_>>()),
        );

        let breakdown = ScoreBreakdown::weighted(
            vec![
                ("liquidity", liquidity_score, w.liquidity, Details::new()),
                ("trend", trend_score.total, w.trend, Details::new()),
                ("signal", signal, w.signal, signal_details),
                ("multi_strategy", resonance, w.multi_strategy, resonance_details),
            ],
            self.config.pass_threshold,
            Details::new(),
        );

        let price = signals.first().map_or(0.0, |e| e.price);
        RankedResult {
            ticker,
            timestamp: as_of,
            basic_info: BasicInfo { price },
            liquidity_score: round2(liquidity_score),
            trend_score,
            signals,
            signal_score: round2(signal),
            multi_strategy_score: round2(resonance),
            final_score: FinalScore {
                breakdown,
                rank: 0,
                confidence: Confidence::Low,
            },
        }
    }
}
