//! Property tests for screening invariants.
//!
//! Uses proptest to verify:
//! 1. Final totals stay within [0, 100]
//! 2. Ranks are exactly 1..N, N = min(output_count, eligible tickers)
//! 3. Tickers without signal events are never ranked
//! 4. MA alignment score is 25 points per satisfied condition
//! 5. ADX strength is 100 exactly inside [25, 40] with +DI > -DI, 0 when +DI <= -DI
//! 6. Multi-strategy score saturates at three distinct strategies
//! 7. Bounded indicators (RSI, ADX) stay within [0, 100]
//! 8. Every filter stage accounts for every input ticker

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use trendscreen_core::components::filter::FilterChain;
use trendscreen_core::components::scorer::{Details, MaAdxScorer, ScoreBreakdown, TrendScorer};
use trendscreen_core::components::signal::{SignalEvent, SignalKind};
use trendscreen_core::config::{FilterConfig, IndicatorConfig, ScoringConfig, TrendScorerConfig};
use trendscreen_core::domain::{Bar, IndicatedSeries, Universe};
use trendscreen_core::engine::{multi_strategy_score, IndicatorEngine, ScoringEngine};

// ── Helpers ──────────────────────────────────────────────────────────

const STRATEGIES: [&str; 4] = ["ma_crossover", "volume_surge", "breakout", "rsi"];

fn kind(i: usize) -> SignalKind {
    match i % 6 {
        0 => SignalKind::GoldenCross,
        1 => SignalKind::VolumeSurge,
        2 => SignalKind::PriceBreakout,
        3 => SignalKind::RsiOversoldRebound,
        4 => SignalKind::RsiOverboughtPullback,
        _ => SignalKind::Other("custom".into()),
    }
}

fn trend(total: f64) -> ScoreBreakdown {
    ScoreBreakdown::weighted(vec![("t", total, 1.0, Details::new())], 50.0, Details::new())
}

/// One-bar series at `close` with the given latest-bar columns.
fn single_bar(close: f64, columns: &[(&str, f64)]) -> IndicatedSeries {
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut s = IndicatedSeries::from_bars(vec![Bar::new(date, close, close, close, close, 1e6)]);
    for (name, value) in columns {
        s.insert_column(*name, vec![*value]).unwrap();
    }
    s
}

/// Bars from a random walk of percentage steps.
fn walk(steps: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut close = 50.0;
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let open = close;
            close *= 1.0 + step;
            Bar::new(
                base + chrono::Duration::days(i as i64),
                open,
                open.max(close) * 1.01,
                open.min(close) * 0.99,
                close,
                1e6 + (i % 7) as f64 * 1e5,
            )
        })
        .collect()
}

fn arb_events() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0usize..30, 0usize..4, 0usize..6), 0..60)
}

// ── 1–3. Ranking ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn ranking_invariants(
        raw in arb_events(),
        liq in prop::collection::vec(0.0..=100.0_f64, 30),
        trends in prop::collection::vec(0.0..=100.0_f64, 30),
        output_count in 1usize..25,
    ) {
        let tickers: Vec<String> = (0..30).map(|i| format!("T{i:02}")).collect();
        let liquidity: BTreeMap<String, f64> =
            tickers.iter().cloned().zip(liq.iter().copied()).collect();
        let trend_scores: BTreeMap<String, ScoreBreakdown> =
            tickers.iter().cloned().zip(trends.iter().map(|t| trend(*t))).collect();
        let events: Vec<SignalEvent> = raw
            .iter()
            .map(|&(t, s, k)| SignalEvent::new(&tickers[t], STRATEGIES[s], kind(k), 10.0, Details::new()))
            .collect();
        let signalled: BTreeSet<String> = events.iter().map(|e| e.ticker.clone()).collect();

        let engine = ScoringEngine::new(ScoringConfig { output_count, ..ScoringConfig::default() }).unwrap();
        let as_of = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let ranked = engine.rank(&liquidity, &trend_scores, events, as_of);

        prop_assert_eq!(ranked.len(), output_count.min(signalled.len()));
        for (i, r) in ranked.iter().enumerate() {
            prop_assert_eq!(r.final_score.rank, i + 1);
            let total = r.final_score.breakdown.total;
            prop_assert!((0.0..=100.0).contains(&total), "total {} out of range", total);
            prop_assert!(signalled.contains(&r.ticker));
            prop_assert!(!r.signals.is_empty());
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].final_score.breakdown.total >= pair[1].final_score.breakdown.total);
        }
    }
}

// ── 4–5. Trend scorer components ─────────────────────────────────────

proptest! {
    #[test]
    fn ma_alignment_is_25_per_condition(
        values in prop::collection::vec(1.0..200.0_f64, 5),
    ) {
        let (price, ma5, ma10, ma20, ma50) = (values[0], values[1], values[2], values[3], values[4]);
        let s = single_bar(price, &[("sma_5", ma5), ("sma_10", ma10), ("sma_20", ma20), ("sma_50", ma50)]);
        let expected = [price > ma5, ma5 > ma10, ma10 > ma20, ma20 > ma50]
            .iter()
            .filter(|c| **c)
            .count() as f64
            * 25.0;

        let b = MaAdxScorer::new(&TrendScorerConfig::default()).score(&s);
        prop_assert_eq!(b.component("ma_alignment").unwrap().score, expected);
    }

    #[test]
    fn adx_strength_rule(
        adx in 0.0..100.0_f64,
        plus_di in 0.0..60.0_f64,
        minus_di in 0.0..60.0_f64,
    ) {
        let s = single_bar(10.0, &[("adx", adx), ("plus_di", plus_di), ("minus_di", minus_di)]);
        let score = MaAdxScorer::new(&TrendScorerConfig::default())
            .score(&s)
            .component("adx_strength")
            .unwrap()
            .score;

        let maximal = (25.0..=40.0).contains(&adx) && plus_di > minus_di;
        prop_assert_eq!(score == 100.0, maximal);
        if plus_di <= minus_di {
            prop_assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn flat_range_position_is_neutral(price in 1.0..500.0_f64, n in 20usize..60) {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| Bar::new(base + chrono::Duration::days(i as i64), price, price, price, price, 1.0))
            .collect();
        let b = MaAdxScorer::new(&TrendScorerConfig::default()).score(&IndicatedSeries::from_bars(bars));
        prop_assert_eq!(b.component("price_position").unwrap().score, 50.0);
    }
}

// ── 6. Resonance saturation ──────────────────────────────────────────

proptest! {
    #[test]
    fn resonance_saturates(extra in 0usize..5) {
        let mut events: Vec<SignalEvent> = STRATEGIES[..3]
            .iter()
            .map(|s| SignalEvent::new("AAA", s, SignalKind::VolumeSurge, 1.0, Details::new()))
            .collect();
        for i in 0..extra {
            let name = format!("extra_{i}");
            events.push(SignalEvent::new("AAA", &name, SignalKind::VolumeSurge, 1.0, Details::new()));
        }
        prop_assert_eq!(multi_strategy_score(&events), 100.0);
    }
}

// ── 7. Indicator bounds ──────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bounded_indicators_stay_in_range(
        steps in prop::collection::vec(-0.05..0.05_f64, 30..120),
    ) {
        let engine = IndicatorEngine::new(&IndicatorConfig::default()).unwrap();
        let series = engine.augment(walk(&steps)).unwrap();
        for column in ["rsi", "adx", "plus_di", "minus_di"] {
            for v in series.column(column).unwrap().iter().filter(|v| !v.is_nan()) {
                prop_assert!((0.0..=100.0).contains(v), "{} = {}", column, v);
            }
        }
    }
}

// ── 8. Funnel accounting ─────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_stage_accounts_for_its_input(
        walks in prop::collection::vec(prop::collection::vec(-0.03..0.035_f64, 20..160), 1..8),
    ) {
        let engine = IndicatorEngine::new(&IndicatorConfig::default()).unwrap();
        let universe: Universe = walks
            .iter()
            .enumerate()
            .map(|(i, steps)| (format!("W{i}"), engine.augment(walk(steps)).unwrap()))
            .collect();
        let input = universe.len();

        let outcome = FilterChain::from_config(&FilterConfig::default(), BTreeMap::new()).run(universe);
        let mut expected_input = input;
        for stage in &outcome.stages {
            prop_assert_eq!(stage.input, expected_input);
            prop_assert_eq!(stage.passed + stage.rejected.len(), stage.input);
            expected_input = stage.passed;
        }
        prop_assert_eq!(outcome.survivors.len(), expected_input);
    }
}
