//! MA/ADX trend scorer.
//!
//! Four components, each 0–100:
//! - `ma_alignment`:   how many of close>sma5>sma10>sma20>sma50 hold (25 points each)
//! - `adx_strength`:   ADX band, zero unless +DI > -DI
//! - `price_momentum`: 5-bar percent return bands
//! - `price_position`: where the close sits in the trailing 20-bar high/low range

use serde_json::{json, Value};

use super::{num, ComponentInput, Details, ScoreBreakdown, TrendScorer};
use crate::config::{TrendScorerConfig, TrendWeights};
use crate::domain::series::{nan_max, nan_min};
use crate::domain::IndicatedSeries;

const POSITION_WINDOW: usize = 20;

#[derive(Debug, Clone)]
pub struct MaAdxScorer {
    weights: TrendWeights,
    pass_threshold: f64,
}

impl MaAdxScorer {
    pub const NAME: &'static str = "ma_adx";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(config: &TrendScorerConfig) -> Self {
        Self {
            weights: config.weights.clone(),
            pass_threshold: config.pass_threshold,
        }
    }

    fn weight_table(&self) -> [(&'static str, f64); 4] {
        [
            ("ma_alignment", self.weights.ma_alignment),
            ("adx_strength", self.weights.adx_strength),
            ("price_momentum", self.weights.price_momentum),
            ("price_position", self.weights.price_position),
        ]
    }

    fn base_details(&self) -> Details {
        let mut d = Details::new();
        d.insert("scorer".into(), json!(Self::NAME));
        d.insert("version".into(), json!(Self::VERSION));
        d
    }

    fn ma_alignment(series: &IndicatedSeries) -> (f64, Details) {
        let close = series.latest("close");
        let mas = ["sma_5", "sma_10", "sma_20", "sma_50"].map(|c| series.latest(c));
        let (Some(price), [Some(ma5), Some(ma10), Some(ma20), Some(ma50)]) = (close, mas) else {
            return (0.0, status_with("no_data", [("error", json!("missing MA data"))]));
        };

        let count = [price > ma5, ma5 > ma10, ma10 > ma20, ma20 > ma50]
            .iter()
            .filter(|holds| **holds)
            .count();
        let (score, status) = match count {
            4 => (100.0, "perfect_bullish"),
            3 => (75.0, "strong_bullish"),
            2 => (50.0, "moderate_bullish"),
            1 => (25.0, "weak_bullish"),
            _ => (0.0, "no_alignment"),
        };

        let details = status_with(
            status,
            [
                ("alignment_count", json!(count)),
                ("price", num(Some(price))),
                ("ma5", num(Some(ma5))),
                ("ma10", num(Some(ma10))),
                ("ma20", num(Some(ma20))),
                ("ma50", num(Some(ma50))),
            ],
        );
        (score, details)
    }

    fn adx_strength(series: &IndicatedSeries) -> (f64, Details) {
        let (Some(adx), Some(plus_di), Some(minus_di)) = (
            series.latest("adx"),
            series.latest("plus_di"),
            series.latest("minus_di"),
        ) else {
            return (0.0, status_with("no_data", [("adx", Value::Null)]));
        };

        let (score, status) = if plus_di <= minus_di {
            (0.0, "downtrend")
        } else if (25.0..=40.0).contains(&adx) {
            (100.0, "strong_uptrend")
        } else if adx > 40.0 && adx <= 50.0 {
            (70.0, "very_strong_uptrend")
        } else if adx > 50.0 {
            (50.0, "overheated")
        } else if adx >= 20.0 {
            (60.0, "forming_uptrend")
        } else {
            (30.0, "weak_trend")
        };

        let details = status_with(
            status,
            [
                ("adx", num(Some(adx))),
                ("plus_di", num(Some(plus_di))),
                ("minus_di", num(Some(minus_di))),
                ("di_diff", num(Some(plus_di - minus_di))),
            ],
        );
        (score, details)
    }

    fn price_momentum(series: &IndicatedSeries) -> (f64, Details) {
        let Some(ret) = series.latest("price_change_5d") else {
            return (0.0, status_with("no_data", [("return_pct", Value::Null)]));
        };

        let (score, status) = if ret >= 10.0 {
            (100.0, "strong_momentum")
        } else if ret >= 5.0 {
            (70.0, "good_momentum")
        } else if ret >= 2.0 {
            (50.0, "moderate_momentum")
        } else if ret >= 0.0 {
            (30.0, "weak_momentum")
        } else {
            (0.0, "negative_momentum")
        };
        (score, status_with(status, [("return_pct", num(Some(ret)))]))
    }

    fn price_position(series: &IndicatedSeries) -> (f64, Details) {
        let neutral = |status: &str| (50.0, status_with(status, [("position", json!(0.5))]));

        if series.len() < POSITION_WINDOW {
            return neutral("insufficient_data");
        }
        let (Some(highs), Some(lows)) = (
            series.tail("high", POSITION_WINDOW),
            series.tail("low", POSITION_WINDOW),
        ) else {
            return neutral("insufficient_data");
        };
        let (Some(high), Some(low), Some(close)) =
            (nan_max(highs), nan_min(lows), series.latest("close"))
        else {
            return neutral("insufficient_data");
        };
        if high == low {
            return neutral("flat");
        }

        let position = (close - low) / (high - low);
        let (score, status) = if (0.5..=0.75).contains(&position) {
            (100.0, "ideal_position")
        } else if position > 0.75 && position <= 0.85 {
            (80.0, "high_position")
        } else if (0.3..0.5).contains(&position) {
            (60.0, "mid_position")
        } else if position > 0.85 {
            (30.0, "too_high")
        } else {
            (20.0, "low_position")
        };

        let details = status_with(
            status,
            [
                ("position", json!((position * 1000.0).round() / 1000.0)),
                ("high_20d", num(Some(high))),
                ("low_20d", num(Some(low))),
                ("current", num(Some(close))),
            ],
        );
        (score, details)
    }
}

fn status_with<const N: usize>(status: &str, extra: [(&str, Value); N]) -> Details {
    let mut d = Details::new();
    d.insert("status".into(), json!(status));
    for (k, v) in extra {
        d.insert(k.to_string(), v);
    }
    d
}

impl TrendScorer for MaAdxScorer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        Self::VERSION
    }

    fn description(&self) -> &str {
        "trend score from moving-average alignment and ADX strength"
    }

    fn required_indicators(&self) -> Vec<&'static str> {
        vec![
            "close",
            "high",
            "low",
            "sma_5",
            "sma_10",
            "sma_20",
            "sma_50",
            "adx",
            "plus_di",
            "minus_di",
            "price_change_5d",
        ]
    }

    fn score(&self, series: &IndicatedSeries) -> ScoreBreakdown {
        if series.is_empty() {
            let mut details = self.base_details();
            details.insert("error".into(), json!("empty_data"));
            return ScoreBreakdown::zeroed(&self.weight_table(), details);
        }

        let parts = [
            Self::ma_alignment(series),
            Self::adx_strength(series),
            Self::price_momentum(series),
            Self::price_position(series),
        ];
        let components: Vec<ComponentInput<'_>> = self
            .weight_table()
            .into_iter()
            .zip(parts)
            .map(|((name, weight), (score, details))| (name, score, weight, details))
            .collect();

        ScoreBreakdown::weighted(components, self.pass_threshold, self.base_details())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use chrono::NaiveDate;

    /// 20 bars with high 110 / low 90, closing at `close` on the last bar,
    /// and the given latest-bar indicator values.
    fn scenario(close: f64, latest: &[(&str, f64)]) -> IndicatedSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<Bar> = (0..20)
            .map(|i| {
                let c = if i == 19 { close } else { 100.0 };
                Bar::new(base + chrono::Duration::days(i), 100.0, 110.0, 90.0, c, 1e6)
            })
            .collect();
        let mut s = IndicatedSeries::from_bars(bars);
        for (name, value) in latest {
            let mut col = vec![f64::NAN; 20];
            col[19] = *value;
            s.insert_column(*name, col).unwrap();
        }
        s
    }

    fn scorer() -> MaAdxScorer {
        MaAdxScorer::new(&TrendScorerConfig::default())
    }

    fn perfect_inputs() -> Vec<(&'static str, f64)> {
        vec![
            ("sma_5", 101.0),
            ("sma_10", 100.0),
            ("sma_20", 99.0),
            ("sma_50", 98.0),
            ("adx", 30.0),
            ("plus_di", 30.0),
            ("minus_di", 10.0),
            ("price_change_5d", 12.0),
        ]
    }

    #[test]
    fn perfect_trend_scores_100() {
        // position = (102 - 90) / (110 - 90) = 0.6
        let b = scorer().score(&scenario(102.0, &perfect_inputs()));
        assert_eq!(b.total, 100.0);
        assert!(b.pass_threshold);
        for name in ["ma_alignment", "adx_strength", "price_momentum", "price_position"] {
            assert_eq!(b.component(name).unwrap().score, 100.0, "{name}");
        }
        assert_eq!(b.component("ma_alignment").unwrap().weighted_score, 40.0);
        assert_eq!(b.details["scorer"], "ma_adx");
        assert_eq!(b.details["version"], "1.0.0");
    }

    #[test]
    fn empty_series_is_zero_with_error_tag() {
        let b = scorer().score(&IndicatedSeries::from_bars(Vec::new()));
        assert_eq!(b.total, 0.0);
        assert!(!b.pass_threshold);
        assert_eq!(b.details["error"], "empty_data");
        assert_eq!(b.components.len(), 4);
    }

    #[test]
    fn missing_ma_scores_zero_alignment() {
        let inputs: Vec<_> = perfect_inputs()
            .into_iter()
            .filter(|(n, _)| *n != "sma_50")
            .collect();
        let b = scorer().score(&scenario(102.0, &inputs));
        let ma = b.component("ma_alignment").unwrap();
        assert_eq!(ma.score, 0.0);
        assert_eq!(ma.details["status"], "no_data");
        // 0 + 35 + 15 + 10
        assert_eq!(b.total, 60.0);
    }

    #[test]
    fn adx_bands() {
        let cases = [
            (30.0, 30.0, 10.0, 100.0, "strong_uptrend"),
            (45.0, 30.0, 10.0, 70.0, "very_strong_uptrend"),
            (55.0, 30.0, 10.0, 50.0, "overheated"),
            (22.0, 30.0, 10.0, 60.0, "forming_uptrend"),
            (15.0, 30.0, 10.0, 30.0, "weak_trend"),
            (30.0, 10.0, 30.0, 0.0, "downtrend"),
            (30.0, 20.0, 20.0, 0.0, "downtrend"),
        ];
        for (adx, plus, minus, expected, status) in cases {
            let s = scenario(102.0, &[("adx", adx), ("plus_di", plus), ("minus_di", minus)]);
            let (score, details) = MaAdxScorer::adx_strength(&s);
            assert_eq!(score, expected, "adx={adx}");
            assert_eq!(details["status"], status);
        }
    }

    #[test]
    fn momentum_bands() {
        for (ret, expected) in [(10.0, 100.0), (5.0, 70.0), (2.0, 50.0), (0.0, 30.0), (-0.1, 0.0)] {
            let s = scenario(102.0, &[("price_change_5d", ret)]);
            assert_eq!(MaAdxScorer::price_momentum(&s).0, expected, "ret={ret}");
        }
    }

    #[test]
    fn position_bands() {
        // low 90, high 110: close → position
        for (close, expected) in [
            (100.0, 100.0), // 0.5
            (105.0, 100.0), // 0.75
            (106.0, 80.0),  // 0.8
            (96.0, 60.0),   // 0.3
            (108.0, 30.0),  // 0.9
            (94.0, 20.0),   // 0.2
        ] {
            let (score, _) = MaAdxScorer::price_position(&scenario(close, &[]));
            assert_eq!(score, expected, "close={close}");
        }
    }

    #[test]
    fn short_history_is_neutral_position() {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = vec![Bar::new(base, 10.0, 11.0, 9.0, 10.0, 1.0)];
        let (score, details) = MaAdxScorer::price_position(&IndicatedSeries::from_bars(bars));
        assert_eq!(score, 50.0);
        assert_eq!(details["status"], "insufficient_data");
    }

    #[test]
    fn flat_range_is_neutral_position() {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..20)
            .map(|i| Bar::new(base + chrono::Duration::days(i), 10.0, 10.0, 10.0, 10.0, 1.0))
            .collect();
        let (score, details) = MaAdxScorer::price_position(&IndicatedSeries::from_bars(bars));
        assert_eq!(score, 50.0);
        assert_eq!(details["status"], "flat");
    }

    #[test]
    fn metadata() {
        let s = scorer();
        assert_eq!(s.info().name, "ma_adx");
        assert!(s.required_indicators().contains(&"price_change_5d"));
    }
}
