//! Synthetic universes for demos and tests.
//!
//! Each ticker is a random walk seeded from BLAKE3 of `(seed, ticker)`, so the
//! same arguments always produce the same bars. Every ticker draws its own
//! drift, which gives a mix of uptrends, downtrends and chop, and its own
//! price level so some land below the liquidity filter's minimum price.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trendscreen_core::domain::{Bar, BarsByTicker};

/// Ticker names used for synthetic universes: `SYN000`, `SYN001`, ...
pub fn synthetic_ticker(index: usize) -> String {
    format!("SYN{index:03}")
}

/// The last `count` weekdays up to and including `end`, oldest first.
pub fn trading_days(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut current = end;
    while days.len() < count {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(current);
        }
        current -= Duration::days(1);
    }
    days.reverse();
    days
}

/// Deterministic daily bars for one ticker, ending on `end`.
pub fn generate_bars(ticker: &str, bars: usize, end: NaiveDate, seed: u64) -> Vec<Bar> {
    let seed_bytes = blake3::hash(format!("{seed}:{ticker}").as_bytes());
    let mut rng = StdRng::from_seed(*seed_bytes.as_bytes());

    let drift: f64 = rng.gen_range(-0.002..0.004);
    let base_volume: f64 = rng.gen_range(500_000.0..5_000_000.0);
    let mut price: f64 = rng.gen_range(2.0..250.0);

    trading_days(end, bars)
        .into_iter()
        .map(|date| {
            let daily_return = drift + rng.gen_range(-0.02..0.02);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            // Occasional heavy session.
            let surge = if rng.gen_bool(0.03) { 3.0 } else { 1.0 };
            let volume = (base_volume * rng.gen_range(0.6..1.4) * surge).round();
            price = close;
            Bar::new(date, open, high, low, close, volume)
        })
        .collect()
}

/// `tickers` synthetic tickers with `bars` daily bars each, ending on `end`.
pub fn synthetic_universe(tickers: usize, bars: usize, end: NaiveDate, seed: u64) -> BarsByTicker {
    (0..tickers)
        .map(|i| {
            let ticker = synthetic_ticker(i);
            let series = generate_bars(&ticker, bars, end, seed);
            (ticker, series)
        })
        .collect()
}
