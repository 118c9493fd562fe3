//! Synthetic price data for demo mode.
//!
//! Produces a deterministic random-walk OHLC series per symbol so the chart
//! looks plausible (drift, noise, wicks) without any network access. The
//! same symbol always yields the same series.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use kumo_core::domain::PriceBar;

/// Generate `count` weekday bars starting at `start`, seeded by the symbol.
pub fn sample_bars(symbol: &str, start: NaiveDate, count: usize) -> Vec<PriceBar> {
    let mut rng_state = seed_from_symbol(symbol);
    let mut bars = Vec::with_capacity(count);

    // Per-symbol base level and behavior, also derived from the seed.
    let mut close = 50.0 + (next_unit(&mut rng_state) + 1.0) * 200.0;
    let drift = 0.0004 + next_unit(&mut rng_state) * 0.0006;
    let volatility = 0.012 + (next_unit(&mut rng_state) + 1.0) * 0.004;

    let mut date = start;
    while bars.len() < count {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            date += Duration::days(1);
            continue;
        }

        let open = close;
        let daily_return = drift + volatility * next_unit(&mut rng_state);
        close = (open * (1.0 + daily_return)).max(1.0);

        let wick_up = open.max(close) * (1.0 + next_unit(&mut rng_state).abs() * 0.006);
        let wick_down = open.min(close) * (1.0 - next_unit(&mut rng_state).abs() * 0.006);
        let volume = 500_000 + ((next_unit(&mut rng_state) + 1.0) * 2_000_000.0) as u64;

        bars.push(PriceBar {
            date,
            open,
            high: wick_up,
            low: wick_down,
            close,
            volume,
        });
        date += Duration::days(1);
    }

    bars
}

fn seed_from_symbol(symbol: &str) -> u64 {
    // FNV-1a over the symbol bytes.
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in symbol.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Deterministic pseudo-random: LCG producing values in [-1, 1].
fn next_unit(state: &mut u64) -> f64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    ((*state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
}
