//! Price data: providers, flat-file caching, ingest, download orchestration.

pub mod cache;
pub mod download;
pub mod ingest;
pub mod provider;
pub mod yahoo;

pub use cache::{CacheMeta, CacheStatus, FlatCache};
pub use download::{download_symbols, DownloadSummary};
pub use ingest::{canonicalize, IngestReport};
pub use provider::{
    DataError, DownloadProgress, FetchResult, PriceProvider, PriceSource, StdoutProgress,
};
pub use yahoo::YahooProvider;
