//! Download orchestrator — multi-symbol downloads with progress reporting.

use super::cache::FlatCache;
use super::ingest;
use super::provider::{DataError, DownloadProgress, PriceProvider};
use chrono::NaiveDate;

/// Download multiple symbols: fetch → canonicalize → cache.
///
/// A symbol already cached under today's fetch-date key is skipped unless
/// `force` is set. Failures are collected, not retried.
pub fn download_symbols(
    provider: &dyn PriceProvider,
    cache: &FlatCache,
    symbols: &[&str],
    start: NaiveDate,
    end: NaiveDate,
    force: bool,
    progress: &dyn DownloadProgress,
) -> DownloadSummary {
    let total = symbols.len();
    let fetch_date = chrono::Local::now().date_naive();
    let mut succeeded = 0;
    let mut failed = 0;
    let mut errors: Vec<(String, DataError)> = Vec::new();

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);

        if !force && cache.has_prices(symbol, fetch_date) {
            progress.on_complete(symbol, i, total, &Ok(()));
            succeeded += 1;
            continue;
        }

        let result = download_single(provider, cache, symbol, start, end, fetch_date);
        progress.on_complete(symbol, i, total, &result);

        match result {
            Ok(()) => succeeded += 1,
            Err(e) => {
                errors.push((symbol.to_string(), e));
                failed += 1;
            }
        }
    }

    progress.on_batch_complete(succeeded, failed, total);

    DownloadSummary {
        total,
        succeeded,
        failed,
        errors,
    }
}

fn download_single(
    provider: &dyn PriceProvider,
    cache: &FlatCache,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    fetch_date: NaiveDate,
) -> Result<(), DataError> {
    let fetch_result = provider.fetch(symbol, start, end)?;
    let report = ingest::canonicalize(fetch_result.bars);
    for warning in &report.warnings {
        eprintln!("WARNING: {symbol}: {warning}");
    }
    if report.bars.is_empty() {
        return Err(DataError::NoData {
            symbol: symbol.to_string(),
        });
    }
    cache.write_prices(symbol, fetch_date, &report.bars)?;
    Ok(())
}

/// Summary of a batch download operation.
#[derive(Debug)]
pub struct DownloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, DataError)>,
}

impl DownloadSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
