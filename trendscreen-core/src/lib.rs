//! TrendScreen Core — indicators, hard filters, scorers, signal detectors, ranking.
//!
//! This crate contains the screening pipeline itself, with no I/O:
//! - Domain types (bars, indicator-augmented series, weekly resampling)
//! - Indicator engine producing named columns per ticker
//! - Ordered hard-filter chain with per-ticker rejection reasons
//! - Trend and liquidity scorers
//! - Strategy signal detectors
//! - Scoring engine that blends everything into a ranked shortlist
//!
//! Every stage is synchronous and works one ticker at a time, so callers are
//! free to parallelise across tickers.

pub mod components;
pub mod config;
pub mod domain;
pub mod engine;
pub mod indicators;
