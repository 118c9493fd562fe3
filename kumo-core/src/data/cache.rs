//! Flat CSV cache layer.
//!
//! Layout:
//! - `{cache_dir}/prices/{SYMBOL}/{fetch-date}.csv` — price series keyed by
//!   symbol plus the calendar date the fetch ran (a same-day read is fresh
//!   by definition, no other expiry exists)
//! - `{cache_dir}/prices/{SYMBOL}/meta.json` — metadata sidecar
//! - `{cache_dir}/directory/{index}.csv` — constituent directories keyed by
//!   index name only, no versioning (a stale directory wins over a live fetch)
//!
//! Writes are atomic: write to .tmp, rename into place.

use super::provider::DataError;
use crate::directory::{IndexKind, TickerDirectory, TickerRecord};
use crate::domain::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata sidecar for a cached symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub data_hash: String,
    pub fetched_on: NaiveDate,
    pub cached_at: chrono::NaiveDateTime,
}

/// Cache status for a single symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub symbol: String,
    pub cached: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub bar_count: Option<usize>,
}

/// The flat CSV cache.
pub struct FlatCache {
    cache_dir: PathBuf,
}

impl FlatCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Directory for a specific symbol: `{cache_dir}/prices/{SYMBOL}/`
    pub fn symbol_dir(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join("prices").join(symbol)
    }

    fn price_path(&self, symbol: &str, fetch_date: NaiveDate) -> PathBuf {
        self.symbol_dir(symbol).join(format!("{fetch_date}.csv"))
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.symbol_dir(symbol).join("meta.json")
    }

    fn directory_path(&self, index: IndexKind) -> PathBuf {
        self.cache_dir
            .join("directory")
            .join(format!("{}.csv", index.slug()))
    }

    // ── Price series ────────────────────────────────────────────────

    /// Write bars for a symbol under today's fetch-date key.
    ///
    /// Atomic: writes to .tmp then renames. Also refreshes the metadata
    /// sidecar (blake3 content hash, date range, bar count).
    pub fn write_prices(
        &self,
        symbol: &str,
        fetch_date: NaiveDate,
        bars: &[PriceBar],
    ) -> Result<(), DataError> {
        if bars.is_empty() {
            return Err(DataError::CacheError("no bars to cache".into()));
        }

        let sym_dir = self.symbol_dir(symbol);
        fs::create_dir_all(&sym_dir)
            .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;

        let path = self.price_path(symbol, fetch_date);
        write_csv_atomic(&path, bars)?;

        let meta = CacheMeta {
            symbol: symbol.to_string(),
            start_date: bars.first().map(|b| b.date).unwrap_or_default(),
            end_date: bars.last().map(|b| b.date).unwrap_or_default(),
            bar_count: bars.len(),
            data_hash: blake3::hash(
                &serde_json::to_vec(bars)
                    .map_err(|e| DataError::CacheError(format!("hash serialization: {e}")))?,
            )
            .to_hex()
            .to_string(),
            fetched_on: fetch_date,
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(symbol), meta_json)
            .map_err(|e| DataError::CacheError(format!("meta write: {e}")))?;

        Ok(())
    }

    /// Load the bars cached for a symbol under the given fetch-date key,
    /// sorted by date ascending.
    pub fn load_prices(
        &self,
        symbol: &str,
        fetch_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        let path = self.price_path(symbol, fetch_date);
        if !path.exists() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }

        let mut bars = read_csv_bars(&path)?;
        if bars.is_empty() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    /// True if a price file exists for this symbol and fetch date.
    pub fn has_prices(&self, symbol: &str, fetch_date: NaiveDate) -> bool {
        self.price_path(symbol, fetch_date).exists()
    }

    /// Read the metadata sidecar for a symbol, if any.
    pub fn get_meta(&self, symbol: &str) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path(symbol)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Cache status for a list of symbols.
    pub fn status(&self, symbols: &[&str]) -> Vec<CacheStatus> {
        symbols
            .iter()
            .map(|sym| {
                let meta = self.get_meta(sym);
                CacheStatus {
                    symbol: sym.to_string(),
                    cached: meta.is_some(),
                    start_date: meta.as_ref().map(|m| m.start_date),
                    end_date: meta.as_ref().map(|m| m.end_date),
                    bar_count: meta.as_ref().map(|m| m.bar_count),
                }
            })
            .collect()
    }

    /// All symbols present under `prices/`.
    pub fn cached_symbols(&self) -> Vec<String> {
        let prices = self.cache_dir.join("prices");
        let mut symbols = Vec::new();
        if let Ok(entries) = fs::read_dir(prices) {
            for entry in entries.flatten() {
                if entry.path().is_dir() {
                    symbols.push(entry.file_name().to_string_lossy().to_string());
                }
            }
        }
        symbols.sort();
        symbols
    }

    /// Remove all cached data for a symbol.
    pub fn remove_symbol(&self, symbol: &str) -> Result<(), DataError> {
        let dir = self.symbol_dir(symbol);
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .map_err(|e| DataError::CacheError(format!("remove {symbol}: {e}")))?;
        }
        Ok(())
    }

    // ── Ticker directories ──────────────────────────────────────────

    /// Persist a directory snapshot keyed by index name.
    pub fn write_directory(
        &self,
        index: IndexKind,
        directory: &TickerDirectory,
    ) -> Result<(), DataError> {
        if directory.is_empty() {
            return Err(DataError::CacheError("no directory rows to cache".into()));
        }

        let path = self.directory_path(index);
        let parent = path
            .parent()
            .ok_or_else(|| DataError::CacheError("directory cache path has no parent".into()))?;
        fs::create_dir_all(parent)
            .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;

        write_csv_atomic(&path, &directory.records)
    }

    /// Load a cached directory for an index. None when missing, empty, or
    /// unreadable — the resolver then moves on to a live fetch.
    pub fn load_directory(&self, index: IndexKind) -> Option<TickerDirectory> {
        let path = self.directory_path(index);
        if !path.exists() {
            return None;
        }

        let mut reader = csv::Reader::from_path(&path).ok()?;
        let records: Vec<TickerRecord> = reader.deserialize().collect::<Result<_, _>>().ok()?;
        if records.is_empty() {
            return None;
        }
        Some(TickerDirectory { records })
    }
}

// ── CSV I/O helpers ─────────────────────────────────────────────────

/// Serialize records to CSV at `path` atomically (tmp + rename).
fn write_csv_atomic<T: Serialize>(path: &Path, records: &[T]) -> Result<(), DataError> {
    let tmp_path = path.with_extension("csv.tmp");

    {
        let mut writer = csv::Writer::from_path(&tmp_path)
            .map_err(|e| DataError::CacheError(format!("create {}: {e}", tmp_path.display())))?;
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| DataError::CacheError(format!("serialize row: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| DataError::CacheError(format!("flush: {e}")))?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DataError::CacheError(format!("atomic rename failed: {e}"))
    })
}

fn read_csv_bars(path: &Path) -> Result<Vec<PriceBar>, DataError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DataError::CacheError(format!("open {}: {e}", path.display())))?;
    reader
        .deserialize()
        .collect::<Result<Vec<PriceBar>, _>>()
        .map_err(|e| DataError::ValidationError(format!("corrupt cache row: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_cache_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("kumo_test_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_bars() -> Vec<PriceBar> {
        vec![
            PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                open: 100.0,
                high: 102.0,
                low: 99.0,
                close: 101.0,
                volume: 1000,
            },
            PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                open: 101.0,
                high: 103.0,
                low: 100.0,
                close: 102.0,
                volume: 1100,
            },
        ]
    }

    fn fetch_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn write_and_load_roundtrip() {
        let dir = temp_cache_dir();
        let cache = FlatCache::new(&dir);

        cache.write_prices("SPY", fetch_date(), &sample_bars()).unwrap();
        let loaded = cache.load_prices("SPY", fetch_date()).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(loaded[0].open, 100.0);
        assert_eq!(loaded[1].close, 102.0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_nonexistent_returns_error() {
        let dir = temp_cache_dir();
        let cache = FlatCache::new(&dir);

        let result = cache.load_prices("NONEXISTENT", fetch_date());
        assert!(matches!(result, Err(DataError::NoCachedData { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn fetch_date_keys_are_distinct() {
        let dir = temp_cache_dir();
        let cache = FlatCache::new(&dir);

        cache.write_prices("SPY", fetch_date(), &sample_bars()).unwrap();
        let other_day = fetch_date() + chrono::Duration::days(1);

        assert!(cache.has_prices("SPY", fetch_date()));
        assert!(!cache.has_prices("SPY", other_day));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn cache_meta_roundtrip() {
        let dir = temp_cache_dir();
        let cache = FlatCache::new(&dir);

        cache.write_prices("SPY", fetch_date(), &sample_bars()).unwrap();
        let meta = cache.get_meta("SPY").unwrap();

        assert_eq!(meta.symbol, "SPY");
        assert_eq!(meta.bar_count, 2);
        assert_eq!(meta.fetched_on, fetch_date());
        assert_eq!(meta.start_date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn cache_status_query() {
        let dir = temp_cache_dir();
        let cache = FlatCache::new(&dir);

        cache.write_prices("SPY", fetch_date(), &sample_bars()).unwrap();
        let statuses = cache.status(&["SPY", "QQQ"]);

        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].cached);
        assert!(!statuses[1].cached);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_roundtrip() {
        let dir = temp_cache_dir();
        let cache = FlatCache::new(&dir);

        let directory = IndexKind::Nasdaq100.fallback();
        cache.write_directory(IndexKind::Nasdaq100, &directory).unwrap();

        let loaded = cache.load_directory(IndexKind::Nasdaq100).unwrap();
        assert_eq!(loaded.len(), directory.len());
        assert_eq!(loaded.records[0].symbol, directory.records[0].symbol);

        // Other index remains uncached.
        assert!(cache.load_directory(IndexKind::Sp500).is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn remove_symbol_clears_prices() {
        let dir = temp_cache_dir();
        let cache = FlatCache::new(&dir);

        cache.write_prices("SPY", fetch_date(), &sample_bars()).unwrap();
        assert_eq!(cache.cached_symbols(), vec!["SPY".to_string()]);

        cache.remove_symbol("SPY").unwrap();
        assert!(cache.cached_symbols().is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
