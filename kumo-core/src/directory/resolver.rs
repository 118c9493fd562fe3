//! Directory resolution: cache → live scrape → fixed fallback.
//!
//! `resolve_directory` is total: it never returns an error past its own
//! boundary. The worst case is the fallback table plus a warning string the
//! caller can surface however it likes.

use super::scrape::parse_constituents;
use super::{IndexKind, TickerDirectory};
use crate::data::cache::FlatCache;
use crate::data::DataError;
use std::time::Duration;

/// Source of raw constituents HTML, injectable for tests.
pub trait ConstituentSource {
    fn fetch_html(&self, index: IndexKind) -> Result<String, DataError>;
}

/// Live source: blocking GET of the index's public constituents page.
pub struct HttpConstituentSource {
    client: reqwest::blocking::Client,
}

impl Default for HttpConstituentSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpConstituentSource {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }
}

impl ConstituentSource for HttpConstituentSource {
    fn fetch_html(&self, index: IndexKind) -> Result<String, DataError> {
        let url = index.constituents_url();
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                context: format!("constituents page for {index}"),
            });
        }

        resp.text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))
    }
}

/// How the returned directory was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryOrigin {
    Cache,
    Live,
    Fallback,
}

impl DirectoryOrigin {
    pub fn label(self) -> &'static str {
        match self {
            DirectoryOrigin::Cache => "cache",
            DirectoryOrigin::Live => "live",
            DirectoryOrigin::Fallback => "fallback",
        }
    }
}

/// A directory, where it came from, and an optional non-fatal warning.
#[derive(Debug, Clone)]
pub struct DirectoryOutcome {
    pub directory: TickerDirectory,
    pub origin: DirectoryOrigin,
    pub warning: Option<String>,
}

/// Resolve the constituent directory for an index.
///
/// 1. A non-empty cached snapshot wins outright — no freshness check.
/// 2. Otherwise scrape the live page; a successful scrape is persisted to
///    the cache (a persist failure only warns).
/// 3. Any live failure degrades to the fixed fallback table with a warning.
pub fn resolve_directory(
    index: IndexKind,
    cache: Option<&FlatCache>,
    source: &dyn ConstituentSource,
) -> DirectoryOutcome {
    if let Some(cache) = cache {
        if let Some(directory) = cache.load_directory(index) {
            return DirectoryOutcome {
                directory,
                origin: DirectoryOrigin::Cache,
                warning: None,
            };
        }
    }

    match fetch_live(index, source) {
        Ok(directory) => {
            let mut warning = None;
            if let Some(cache) = cache {
                if let Err(e) = cache.write_directory(index, &directory) {
                    warning = Some(format!("directory fetched but not cached: {e}"));
                }
            }
            DirectoryOutcome {
                directory,
                origin: DirectoryOrigin::Live,
                warning,
            }
        }
        Err(e) => DirectoryOutcome {
            directory: index.fallback(),
            origin: DirectoryOrigin::Fallback,
            warning: Some(format!(
                "live constituent fetch for {index} failed ({e}); using the built-in fallback list"
            )),
        },
    }
}

fn fetch_live(index: IndexKind, source: &dyn ConstituentSource) -> Result<TickerDirectory, DataError> {
    let html = source.fetch_html(index)?;
    let records = parse_constituents(&html, index.table_locator(), index.column_map())?;
    Ok(TickerDirectory { records })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnreachableSource;
    impl ConstituentSource for UnreachableSource {
        fn fetch_html(&self, _index: IndexKind) -> Result<String, DataError> {
            Err(DataError::NetworkUnreachable("connection refused".into()))
        }
    }

    struct GarbageSource;
    impl ConstituentSource for GarbageSource {
        fn fetch_html(&self, _index: IndexKind) -> Result<String, DataError> {
            Ok("<html><body><p>redesigned page</p></body></html>".into())
        }
    }

    #[test]
    fn unreachable_nasdaq_yields_pinned_fallback() {
        let outcome = resolve_directory(IndexKind::Nasdaq100, None, &UnreachableSource);
        assert_eq!(outcome.origin, DirectoryOrigin::Fallback);
        assert_eq!(
            outcome.directory.symbols(),
            vec!["AAPL", "MSFT", "AMZN", "FB", "TSLA"]
        );
        assert!(outcome.warning.is_some());
    }

    #[test]
    fn markup_change_degrades_like_network_failure() {
        let outcome = resolve_directory(IndexKind::Sp500, None, &GarbageSource);
        assert_eq!(outcome.origin, DirectoryOrigin::Fallback);
        assert_eq!(outcome.directory.len(), 5);
        assert!(outcome.warning.unwrap().contains("fallback"));
    }
}
