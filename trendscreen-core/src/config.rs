//! Screen configuration: one serde struct per stage, aggregated by `ScreenConfig`.
//!
//! Every table has defaults, so an empty TOML document is a valid config.
//! The one exception is `[indicators]`: when the table is present, only the
//! entries it lists are computed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::components::factory::{create_trend_scorer, FactoryError};
use crate::domain::BASE_COLUMNS;

/// Tolerance when checking that a weight table sums to at most 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid period for {field}: {value} (must be >= 1)")]
    InvalidPeriod { field: String, value: usize },

    #[error("invalid weights in [{table}]: {reason}")]
    InvalidWeights { table: String, reason: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{consumer} needs column '{column}' but no indicator produces it")]
    MissingIndicator { consumer: String, column: String },

    #[error(transparent)]
    Factory(#[from] FactoryError),
}

// ─── Aggregate ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub indicators: IndicatorConfig,
    pub filters: FilterConfig,
    pub trend_scorer: TrendScorerConfig,
    pub liquidity_scorer: LiquidityScorerConfig,
    pub strategies: StrategiesConfig,
    pub scoring: ScoringConfig,
}

impl ScreenConfig {
    /// Validate every table plus the cross-table column dependencies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.filters.validate()?;
        self.trend_scorer.validate()?;
        let scorer = create_trend_scorer(&self.trend_scorer)?;
        self.liquidity_scorer.validate()?;
        self.strategies.validate()?;
        self.scoring.validate()?;

        let produced = self.indicators.columns();
        let mut needs: Vec<(String, String)> = Vec::new();
        for column in &self.filters.data_quality.required_columns {
            needs.push(("data_quality filter".into(), column.clone()));
        }
        if self.filters.trend.require_above_ma50 {
            needs.push(("trend filter".into(), "sma_50".into()));
        }
        if self.filters.trend.require_ma20_uptrend {
            needs.push(("trend filter".into(), "sma_20".into()));
        }
        if self.filters.weekly_trend.enabled {
            needs.push(("weekly_trend filter".into(), "sma_20".into()));
        }
        for column in scorer.required_indicators() {
            needs.push(("trend scorer".into(), column.to_string()));
        }
        for (strategy, columns) in self.strategies.required_columns() {
            for column in columns {
                needs.push((format!("{strategy} strategy"), column));
            }
        }

        for (consumer, column) in needs {
            if !produced.contains(&column) {
                return Err(ConfigError::MissingIndicator { consumer, column });
            }
        }
        Ok(())
    }
}

// ─── Indicators ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

/// Which indicator columns to compute. `None` / empty entries are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default)]
    pub ma_periods: Vec<usize>,
    pub rsi_period: Option<usize>,
    pub macd: Option<MacdParams>,
    pub bollinger: Option<BollingerParams>,
    pub atr_period: Option<usize>,
    pub adx_period: Option<usize>,
    pub volume_ma_period: Option<usize>,
    #[serde(default)]
    pub price_change_periods: Vec<usize>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_periods: vec![5, 10, 20, 50, 200],
            rsi_period: Some(14),
            macd: Some(MacdParams::default()),
            bollinger: Some(BollingerParams::default()),
            atr_period: Some(14),
            adx_period: Some(14),
            volume_ma_period: Some(20),
            price_change_periods: vec![1, 5],
        }
    }
}

impl IndicatorConfig {
    /// A config that computes nothing beyond the raw OHLCV columns.
    pub fn empty() -> Self {
        Self {
            ma_periods: Vec::new(),
            rsi_period: None,
            macd: None,
            bollinger: None,
            atr_period: None,
            adx_period: None,
            volume_ma_period: None,
            price_change_periods: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for &p in &self.ma_periods {
            check_period("indicators.ma_periods", p)?;
        }
        for &p in &self.price_change_periods {
            check_period("indicators.price_change_periods", p)?;
        }
        if let Some(p) = self.rsi_period {
            check_period("indicators.rsi_period", p)?;
        }
        if let Some(p) = self.atr_period {
            check_period("indicators.atr_period", p)?;
        }
        if let Some(p) = self.adx_period {
            check_period("indicators.adx_period", p)?;
        }
        if let Some(p) = self.volume_ma_period {
            check_period("indicators.volume_ma_period", p)?;
        }
        if let Some(macd) = &self.macd {
            check_period("indicators.macd.fast", macd.fast)?;
            check_period("indicators.macd.slow", macd.slow)?;
            check_period("indicators.macd.signal", macd.signal)?;
            if macd.fast >= macd.slow {
                return Err(invalid("indicators.macd.fast", "must be less than slow"));
            }
        }
        if let Some(bb) = &self.bollinger {
            check_period("indicators.bollinger.period", bb.period)?;
            check_positive("indicators.bollinger.std_dev", bb.std_dev)?;
        }
        Ok(())
    }

    /// Every column an augmented series will carry, raw OHLCV included.
    pub fn columns(&self) -> BTreeSet<String> {
        let mut cols: BTreeSet<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        for p in &self.ma_periods {
            cols.insert(format!("sma_{p}"));
            cols.insert(format!("ema_{p}"));
        }
        if self.rsi_period.is_some() {
            cols.insert("rsi".into());
        }
        if self.macd.is_some() {
            cols.extend(["macd", "macd_signal", "macd_hist"].map(String::from));
        }
        if self.bollinger.is_some() {
            cols.extend(["bb_upper", "bb_middle", "bb_lower"].map(String::from));
        }
        if self.atr_period.is_some() {
            cols.insert("atr".into());
        }
        if self.adx_period.is_some() {
            cols.extend(["adx", "plus_di", "minus_di"].map(String::from));
        }
        if self.volume_ma_period.is_some() {
            cols.extend(["volume_ma", "volume_ratio"].map(String::from));
        }
        for p in &self.price_change_periods {
            cols.insert(format!("price_change_{p}d"));
        }
        cols
    }
}

// ─── Filters ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub data_quality: DataQualityConfig,
    pub liquidity: LiquidityFilterConfig,
    pub trend: TrendFilterConfig,
    pub weekly_trend: WeeklyTrendConfig,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dq = &self.data_quality;
        check_period("filters.data_quality.min_data_points", dq.min_data_points)?;
        if !(0.0..=1.0).contains(&dq.max_missing_ratio) {
            return Err(invalid(
                "filters.data_quality.max_missing_ratio",
                "must be within [0, 1]",
            ));
        }

        let liq = &self.liquidity;
        check_period("filters.liquidity.volume_period", liq.volume_period)?;
        check_non_negative("filters.liquidity.min_avg_dollar_volume", liq.min_avg_dollar_volume)?;
        check_non_negative("filters.liquidity.min_price", liq.min_price)?;

        if !self.trend.min_20d_return.is_finite() {
            return Err(invalid("filters.trend.min_20d_return", "must be finite"));
        }

        let wk = &self.weekly_trend;
        check_period("filters.weekly_trend.weekly_ma_period", wk.weekly_ma_period)?;
        check_period(
            "filters.weekly_trend.slope_lookback_weeks",
            wk.slope_lookback_weeks,
        )?;
        check_non_negative(
            "filters.weekly_trend.sideways_threshold",
            wk.sideways_threshold,
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataQualityConfig {
    pub min_data_points: usize,
    pub required_columns: Vec<String>,
    /// Reject when a required column has more than this fraction of NaN values.
    pub max_missing_ratio: f64,
}

impl Default for DataQualityConfig {
    fn default() -> Self {
        Self {
            min_data_points: 100,
            required_columns: ["close", "volume", "high", "low"].map(String::from).to_vec(),
            max_missing_ratio: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityFilterConfig {
    pub min_avg_dollar_volume: f64,
    pub min_price: f64,
    pub volume_period: usize,
}

impl Default for LiquidityFilterConfig {
    fn default() -> Self {
        Self {
            min_avg_dollar_volume: 1_000_000.0,
            min_price: 5.0,
            volume_period: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendFilterConfig {
    /// Minimum 20-bar return as a fraction (0.05 = 5%).
    pub min_20d_return: f64,
    pub require_above_ma50: bool,
    pub require_ma20_uptrend: bool,
}

impl Default for TrendFilterConfig {
    fn default() -> Self {
        Self {
            min_20d_return: 0.0,
            require_above_ma50: true,
            require_ma20_uptrend: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyTrendConfig {
    pub enabled: bool,
    pub weekly_ma_period: usize,
    pub slope_lookback_weeks: usize,
    /// Relative slope magnitude below which a trend counts as sideways.
    pub sideways_threshold: f64,
    /// Derive weekly bars from daily bars when the caller supplies none.
    pub resample_from_daily: bool,
}

impl Default for WeeklyTrendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            weekly_ma_period: 20,
            slope_lookback_weeks: 4,
            sideways_threshold: 0.005,
            resample_from_daily: true,
        }
    }
}

// ─── Scorers ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendWeights {
    pub ma_alignment: f64,
    pub adx_strength: f64,
    pub price_momentum: f64,
    pub price_position: f64,
}

impl Default for TrendWeights {
    fn default() -> Self {
        Self {
            ma_alignment: 0.40,
            adx_strength: 0.35,
            price_momentum: 0.15,
            price_position: 0.10,
        }
    }
}

impl TrendWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_weights(
            "trend_scorer.weights",
            &[
                ("ma_alignment", self.ma_alignment),
                ("adx_strength", self.adx_strength),
                ("price_momentum", self.price_momentum),
                ("price_position", self.price_position),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendScorerConfig {
    /// Registered scorer name.
    pub name: String,
    pub weights: TrendWeights,
    pub pass_threshold: f64,
}

impl Default for TrendScorerConfig {
    fn default() -> Self {
        Self {
            name: "ma_adx".into(),
            weights: TrendWeights::default(),
            pass_threshold: 50.0,
        }
    }
}

impl TrendScorerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        check_score("trend_scorer.pass_threshold", self.pass_threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityScorerConfig {
    pub volume_period: usize,
    /// Dollar volume that scores 60; below it the score falls linearly to 0.
    pub min_avg_dollar_volume: f64,
    /// Dollar volume at or above which the score is 100.
    pub excellent_dollar_volume: f64,
}

impl Default for LiquidityScorerConfig {
    fn default() -> Self {
        Self {
            volume_period: 20,
            min_avg_dollar_volume: 1_000_000.0,
            excellent_dollar_volume: 10_000_000.0,
        }
    }
}

impl LiquidityScorerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_period("liquidity_scorer.volume_period", self.volume_period)?;
        check_non_negative(
            "liquidity_scorer.min_avg_dollar_volume",
            self.min_avg_dollar_volume,
        )?;
        if !self.excellent_dollar_volume.is_finite()
            || self.excellent_dollar_volume <= self.min_avg_dollar_volume
        {
            return Err(invalid(
                "liquidity_scorer.excellent_dollar_volume",
                "must be finite and greater than min_avg_dollar_volume",
            ));
        }
        Ok(())
    }
}

// ─── Strategies ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategiesConfig {
    pub ma_crossover: MaCrossoverConfig,
    pub volume_surge: VolumeSurgeConfig,
    pub breakout: BreakoutConfig,
    pub rsi: RsiReversalConfig,
}

impl StrategiesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ma = &self.ma_crossover;
        check_period("strategies.ma_crossover.short_period", ma.short_period)?;
        check_period("strategies.ma_crossover.long_period", ma.long_period)?;
        if ma.short_period >= ma.long_period {
            return Err(invalid(
                "strategies.ma_crossover.short_period",
                "must be less than long_period",
            ));
        }

        check_non_negative(
            "strategies.volume_surge.surge_multiplier",
            self.volume_surge.surge_multiplier,
        )?;
        if !self.volume_surge.min_price_change.is_finite() {
            return Err(invalid(
                "strategies.volume_surge.min_price_change",
                "must be finite",
            ));
        }

        check_period(
            "strategies.breakout.lookback_period",
            self.breakout.lookback_period,
        )?;
        check_non_negative(
            "strategies.breakout.min_volume_ratio",
            self.breakout.min_volume_ratio,
        )?;

        let rsi = &self.rsi;
        check_score("strategies.rsi.oversold", rsi.oversold)?;
        check_score("strategies.rsi.overbought", rsi.overbought)?;
        if rsi.oversold >= rsi.overbought {
            return Err(invalid(
                "strategies.rsi.oversold",
                "must be less than overbought",
            ));
        }
        Ok(())
    }

    /// (strategy name, columns it reads) for every enabled strategy.
    pub fn required_columns(&self) -> Vec<(&'static str, Vec<String>)> {
        let mut out = Vec::new();
        if self.ma_crossover.enabled {
            let mut cols = vec![
                format!("sma_{}", self.ma_crossover.short_period),
                format!("sma_{}", self.ma_crossover.long_period),
            ];
            if self.ma_crossover.volume_confirm {
                cols.push("volume_ratio".into());
            }
            out.push(("ma_crossover", cols));
        }
        if self.volume_surge.enabled {
            out.push((
                "volume_surge",
                vec!["volume_ratio".into(), "price_change_1d".into()],
            ));
        }
        if self.breakout.enabled && self.breakout.volume_confirm {
            out.push(("breakout", vec!["volume_ratio".into()]));
        }
        if self.rsi.enabled {
            out.push(("rsi", vec!["rsi".into()]));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaCrossoverConfig {
    pub enabled: bool,
    pub short_period: usize,
    pub long_period: usize,
    pub volume_confirm: bool,
}

impl Default for MaCrossoverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            short_period: 20,
            long_period: 50,
            volume_confirm: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSurgeConfig {
    pub enabled: bool,
    pub surge_multiplier: f64,
    /// Minimum one-bar price change in percent.
    pub min_price_change: f64,
}

impl Default for VolumeSurgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            surge_multiplier: 2.0,
            min_price_change: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub enabled: bool,
    pub lookback_period: usize,
    pub volume_confirm: bool,
    pub min_volume_ratio: f64,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lookback_period: 20,
            volume_confirm: true,
            min_volume_ratio: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiMode {
    Oversold,
    Overbought,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiReversalConfig {
    pub enabled: bool,
    pub oversold: f64,
    pub overbought: f64,
    pub mode: RsiMode,
}

impl Default for RsiReversalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            oversold: 30.0,
            overbought: 70.0,
            mode: RsiMode::Oversold,
        }
    }
}

// ─── Final scoring ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalWeights {
    pub liquidity: f64,
    pub trend: f64,
    pub signal: f64,
    pub multi_strategy: f64,
}

impl Default for FinalWeights {
    fn default() -> Self {
        Self {
            liquidity: 0.20,
            trend: 0.30,
            signal: 0.40,
            multi_strategy: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: FinalWeights,
    /// Maximum number of ranked results returned.
    pub output_count: usize,
    pub pass_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FinalWeights::default(),
            output_count: 20,
            pass_threshold: 50.0,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        check_weights(
            "scoring.weights",
            &[
                ("liquidity", w.liquidity),
                ("trend", w.trend),
                ("signal", w.signal),
                ("multi_strategy", w.multi_strategy),
            ],
        )?;
        if self.output_count == 0 {
            return Err(invalid("scoring.output_count", "must be at least 1"));
        }
        check_score("scoring.pass_threshold", self.pass_threshold)
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

fn check_period(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidPeriod {
            field: field.into(),
            value,
        });
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, "must be finite and non-negative"));
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, "must be finite and positive"));
    }
    Ok(())
}

fn check_score(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(field, "must be within [0, 100]"));
    }
    Ok(())
}

/// Weights must be finite, non-negative, and sum to a value in (0, 1].
pub fn check_weights(table: &str, weights: &[(&str, f64)]) -> Result<(), ConfigError> {
    for (name, w) in weights {
        if !w.is_finite() || *w < 0.0 {
            return Err(ConfigError::InvalidWeights {
                table: table.into(),
                reason: format!("{name} = {w} must be finite and non-negative"),
            });
        }
    }
    let sum: f64 = weights.iter().map(|(_, w)| w).sum();
    if sum <= 0.0 || sum > 1.0 + WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::InvalidWeights {
            table: table.into(),
            reason: format!("weights sum to {sum}, expected a value in (0, 1]"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ScreenConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_weight_tables() {
        let cfg = ScreenConfig::default();
        let t = &cfg.trend_scorer.weights;
        assert_eq!(
            (t.ma_alignment, t.adx_strength, t.price_momentum, t.price_position),
            (0.40, 0.35, 0.15, 0.10)
        );
        let f = &cfg.scoring.weights;
        assert_eq!(
            (f.liquidity, f.trend, f.signal, f.multi_strategy),
            (0.20, 0.30, 0.40, 0.10)
        );
    }

    #[test]
    fn weights_summing_above_one_are_rejected() {
        let mut cfg = ScreenConfig::default();
        cfg.scoring.weights.signal = 0.9;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidWeights { ref table, .. }) if table == "scoring.weights"
        ));
    }

    #[test]
    fn negative_or_nan_weight_rejected() {
        assert!(check_weights("t", &[("a", -0.1), ("b", 0.5)]).is_err());
        assert!(check_weights("t", &[("a", f64::NAN)]).is_err());
        assert!(check_weights("t", &[("a", 0.0), ("b", 0.0)]).is_err());
        assert!(check_weights("t", &[("a", 0.25), ("b", 0.25)]).is_ok());
    }

    #[test]
    fn zero_period_rejected() {
        let mut cfg = ScreenConfig::default();
        cfg.indicators.ma_periods.push(0);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidPeriod {
                field: "indicators.ma_periods".into(),
                value: 0
            })
        );
    }

    #[test]
    fn strategy_needs_its_indicator() {
        let mut cfg = ScreenConfig::default();
        cfg.indicators.rsi_period = None;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MissingIndicator {
                consumer: "rsi strategy".into(),
                column: "rsi".into()
            })
        );
        cfg.strategies.rsi.enabled = false;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn unknown_scorer_name_rejected() {
        let mut cfg = ScreenConfig::default();
        cfg.trend_scorer.name = "momentum_only".into();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Factory(FactoryError::UnknownScorer(
                "momentum_only".into()
            )))
        );
    }

    #[test]
    fn trend_scorer_needs_its_indicators() {
        let mut cfg = ScreenConfig::default();
        cfg.indicators.ma_periods = vec![20, 50];
        cfg.indicators.adx_period = None;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MissingIndicator {
                consumer: "trend scorer".into(),
                column: "sma_5".into()
            })
        );
        cfg.indicators.ma_periods = vec![5, 10, 20, 50];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MissingIndicator {
                consumer: "trend scorer".into(),
                column: "adx".into()
            })
        );
        cfg.indicators.adx_period = Some(14);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn macd_fast_must_be_below_slow() {
        let mut cfg = ScreenConfig::default();
        cfg.indicators.macd = Some(MacdParams { fast: 26, slow: 12, signal: 9 });
        assert_eq!(
            cfg.validate(),
            Err(invalid("indicators.macd.fast", "must be less than slow"))
        );
        cfg.indicators.macd = Some(MacdParams { fast: 12, slow: 12, signal: 9 });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn indicator_columns_follow_config() {
        let cols = IndicatorConfig::default().columns();
        for expected in [
            "close", "sma_200", "ema_5", "rsi", "macd_hist", "bb_lower", "atr", "adx",
            "minus_di", "volume_ratio", "price_change_1d", "price_change_5d",
        ] {
            assert!(cols.contains(expected), "missing {expected}");
        }
        let bare = IndicatorConfig::empty().columns();
        assert_eq!(bare.len(), BASE_COLUMNS.len());
    }

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: ScreenConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ScreenConfig::default());
    }

    #[test]
    fn present_indicator_table_only_computes_listed_entries() {
        let cfg: ScreenConfig =
            serde_json::from_str(r#"{"indicators": {"ma_periods": [20, 50], "rsi_period": 14}}"#)
                .unwrap();
        assert_eq!(cfg.indicators.ma_periods, vec![20, 50]);
        assert_eq!(cfg.indicators.macd, None);
        assert!(cfg.indicators.price_change_periods.is_empty());
    }

    #[test]
    fn rsi_mode_serializes_lowercase() {
        let json = serde_json::to_string(&RsiMode::Both).unwrap();
        assert_eq!(json, "\"both\"");
    }
}
