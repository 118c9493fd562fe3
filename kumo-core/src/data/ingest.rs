//! Canonicalization of fetched bars.
//!
//! Providers hand back whatever the wire gave them. Before anything is
//! cached or charted the series is canonicalized: sorted ascending by date,
//! duplicate dates dropped (first occurrence wins), insane bars dropped.
//! Drops are surfaced as data-quality warnings, never as errors.

use crate::domain::PriceBar;

/// Result of canonicalizing a fetched series.
#[derive(Debug)]
pub struct IngestReport {
    pub bars: Vec<PriceBar>,
    pub warnings: Vec<String>,
}

/// Sort, dedupe, and sanity-filter a fetched series.
pub fn canonicalize(mut bars: Vec<PriceBar>) -> IngestReport {
    let mut warnings = Vec::new();

    bars.sort_by_key(|b| b.date);

    let before = bars.len();
    bars.dedup_by_key(|b| b.date);
    let dupes = before - bars.len();
    if dupes > 0 {
        warnings.push(format!("dropped {dupes} duplicate-date bar(s)"));
    }

    let before = bars.len();
    bars.retain(|b| b.is_sane());
    let insane = before - bars.len();
    if insane > 0 {
        warnings.push(format!("dropped {insane} bar(s) failing OHLC sanity checks"));
    }

    IngestReport { bars, warnings }
}
