//! Synchronous data access for the TUI — directory resolution and price
//! loading run inline on the main thread.
//!
//! Demo mode swaps both paths for deterministic synthetic data so the
//! dashboard can be exercised with no network and no cache.

use std::path::Path;

use chrono::NaiveDate;

use kumo_core::data::{canonicalize, DataError, FlatCache, PriceProvider, YahooProvider};
use kumo_core::directory::{
    resolve_directory, DirectoryOrigin, DirectoryOutcome, HttpConstituentSource, IndexKind,
};
use kumo_core::indicators::{Ichimoku, IchimokuFrame};

use crate::sample_data;

/// A computed frame plus any non-fatal warning picked up along the way.
pub struct LoadedSeries {
    pub frame: IchimokuFrame,
    pub warning: Option<String>,
}

/// Resolve the constituent directory for an index.
///
/// Demo mode returns the built-in fallback table without touching the
/// network or the cache. `refresh` bypasses the cached snapshot (the live
/// result is still not persisted in that case, matching a one-shot reload).
pub fn load_directory(
    index: IndexKind,
    cache_dir: &Path,
    demo: bool,
    refresh: bool,
) -> DirectoryOutcome {
    if demo {
        return DirectoryOutcome {
            directory: index.fallback(),
            origin: DirectoryOrigin::Fallback,
            warning: None,
        };
    }

    let cache = FlatCache::new(cache_dir);
    let cache_ref = if refresh { None } else { Some(&cache) };
    let source = HttpConstituentSource::new();
    resolve_directory(index, cache_ref, &source)
}

/// Load daily bars for a symbol and compute the Ichimoku overlay.
///
/// Order of preference: same-day cache, live fetch, then any older cached
/// fetch (with a staleness warning). Only when all three fail does the
/// error reach the caller.
pub fn load_frame(
    symbol: &str,
    start_date: NaiveDate,
    cache_dir: &Path,
    demo: bool,
) -> Result<LoadedSeries, DataError> {
    if demo {
        let bars = sample_data::sample_bars(symbol, start_date, 260);
        return Ok(LoadedSeries {
            frame: Ichimoku::standard().compute(&bars),
            warning: None,
        });
    }

    let cache = FlatCache::new(cache_dir);
    let today = chrono::Local::now().date_naive();

    let (bars, warning) = match cache.load_prices(symbol, today) {
        Ok(bars) => (bars, None),
        Err(_) => fetch_or_stale(&cache, symbol, start_date, today)?,
    };

    let in_range: Vec<_> = bars
        .into_iter()
        .filter(|b| b.date >= start_date)
        .collect();

    if in_range.is_empty() {
        return Err(DataError::NoData {
            symbol: symbol.to_string(),
        });
    }

    Ok(LoadedSeries {
        frame: Ichimoku::standard().compute(&in_range),
        warning,
    })
}

type BarsAndWarning = (Vec<kumo_core::domain::PriceBar>, Option<String>);

fn fetch_or_stale(
    cache: &FlatCache,
    symbol: &str,
    start_date: NaiveDate,
    today: NaiveDate,
) -> Result<BarsAndWarning, DataError> {
    let provider = YahooProvider::new();
    match provider.fetch(symbol, start_date, today) {
        Ok(result) => {
            let report = canonicalize(result.bars);
            if report.bars.is_empty() {
                return Err(DataError::NoData {
                    symbol: symbol.to_string(),
                });
            }
            let warning = report.warnings.first().cloned();
            // A cache write failure is not fatal for display purposes.
            let warning = match cache.write_prices(symbol, today, &report.bars) {
                Ok(()) => warning,
                Err(e) => Some(format!("fetched but not cached: {e}")),
            };
            Ok((report.bars, warning))
        }
        Err(fetch_err) => {
            // Stale fallback: the most recent earlier fetch, if any.
            let Some(fetched_on) = cache.get_meta(symbol).map(|m| m.fetched_on) else {
                return Err(fetch_err);
            };
            match cache.load_prices(symbol, fetched_on) {
                Ok(bars) => Ok((
                    bars,
                    Some(format!(
                        "live fetch failed ({fetch_err}); showing data cached {fetched_on}"
                    )),
                )),
                Err(_) => Err(fetch_err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_directory_never_touches_network() {
        let outcome = load_directory(IndexKind::Sp500, Path::new("/nonexistent"), true, false);
        assert_eq!(outcome.origin, DirectoryOrigin::Fallback);
        assert_eq!(outcome.directory.len(), 5);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn demo_frame_is_deterministic() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let a = load_frame("AAPL", start, Path::new("/nonexistent"), true).unwrap();
        let b = load_frame("AAPL", start, Path::new("/nonexistent"), true).unwrap();

        assert_eq!(a.frame.len(), b.frame.len());
        assert_eq!(
            a.frame.bars.last().unwrap().close,
            b.frame.bars.last().unwrap().close
        );
    }

    #[test]
    fn demo_frames_differ_per_symbol() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let a = load_frame("AAPL", start, Path::new("/nonexistent"), true).unwrap();
        let m = load_frame("MSFT", start, Path::new("/nonexistent"), true).unwrap();

        assert_ne!(
            a.frame.bars.last().unwrap().close,
            m.frame.bars.last().unwrap().close
        );
    }

    #[test]
    fn demo_frame_has_cloud_coverage() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let loaded = load_frame("TSLA", start, Path::new("/nonexistent"), true).unwrap();
        // 260 bars is well past the point where both spans are defined.
        assert!(loaded.frame.cloud.iter().any(|c| c.is_some()));
    }
}
