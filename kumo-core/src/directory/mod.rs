//! Index constituent directories — ticker records, fallback tables, scraping.
//!
//! A directory is an ordered snapshot of (company, symbol, sector,
//! sub-industry) rows for one index, sourced from the index's public
//! constituents table when reachable and from a fixed five-row fallback
//! when not.

pub mod resolver;
pub mod scrape;

pub use resolver::{
    resolve_directory, ConstituentSource, DirectoryOrigin, DirectoryOutcome, HttpConstituentSource,
};
pub use scrape::{parse_constituents, ColumnMap, TableLocator};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One constituent row. Symbol is exchange-normalized (dots → hyphens).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerRecord {
    pub company: String,
    pub symbol: String,
    pub sector: String,
    pub sub_industry: String,
}

/// Ordered list of constituent rows for one index. Row order is the source
/// table's order; no sorting is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickerDirectory {
    pub records: Vec<TickerRecord>,
}

impl TickerDirectory {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.symbol.as_str()).collect()
    }

    pub fn get(&self, i: usize) -> Option<&TickerRecord> {
        self.records.get(i)
    }
}

/// Supported indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    Nasdaq100,
    Sp500,
}

impl IndexKind {
    pub fn all() -> [IndexKind; 2] {
        [IndexKind::Nasdaq100, IndexKind::Sp500]
    }

    pub fn label(self) -> &'static str {
        match self {
            IndexKind::Nasdaq100 => "NASDAQ-100",
            IndexKind::Sp500 => "S&P 500",
        }
    }

    /// Filesystem-safe cache key.
    pub fn slug(self) -> &'static str {
        match self {
            IndexKind::Nasdaq100 => "nasdaq100",
            IndexKind::Sp500 => "sp500",
        }
    }

    /// Public constituents page for this index.
    pub fn constituents_url(self) -> &'static str {
        match self {
            IndexKind::Nasdaq100 => "https://en.wikipedia.org/wiki/Nasdaq-100",
            IndexKind::Sp500 => "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies",
        }
    }

    /// Structural marker for the constituents table on this index's page.
    /// The two pages differ: one is found by id, the other by class.
    pub fn table_locator(self) -> TableLocator {
        match self {
            IndexKind::Nasdaq100 => TableLocator::ByClass("wikitable sortable"),
            IndexKind::Sp500 => TableLocator::ById("constituents"),
        }
    }

    /// Column positions in this index's table. The two pages also disagree
    /// on column order: NASDAQ lists company first, the S&P page symbol first.
    pub fn column_map(self) -> ColumnMap {
        match self {
            IndexKind::Nasdaq100 => ColumnMap {
                company: 0,
                symbol: 1,
                sector: 2,
                sub_industry: 3,
            },
            IndexKind::Sp500 => ColumnMap {
                symbol: 0,
                company: 1,
                sector: 2,
                sub_industry: 3,
            },
        }
    }

    /// Fixed five-row directory used when the live table is unreachable or
    /// no longer parses.
    pub fn fallback(self) -> TickerDirectory {
        let rows: &[(&str, &str, &str, &str)] = match self {
            IndexKind::Nasdaq100 => &[
                ("Apple Inc.", "AAPL", "Information Technology", "Technology Hardware"),
                ("Microsoft Corporation", "MSFT", "Information Technology", "Systems Software"),
                ("Amazon.com, Inc.", "AMZN", "Consumer Discretionary", "Internet Retail"),
                ("Meta Platforms, Inc.", "FB", "Communication Services", "Interactive Media"),
                ("Tesla, Inc.", "TSLA", "Consumer Discretionary", "Automobile Manufacturers"),
            ],
            IndexKind::Sp500 => &[
                ("Apple Inc.", "AAPL", "Information Technology", "Technology Hardware"),
                ("Microsoft Corporation", "MSFT", "Information Technology", "Systems Software"),
                ("Amazon.com, Inc.", "AMZN", "Consumer Discretionary", "Internet Retail"),
                ("Berkshire Hathaway", "BRK.B", "Financials", "Multi-Sector Holdings"),
                ("JPMorgan Chase & Co.", "JPM", "Financials", "Diversified Banks"),
            ],
        };

        TickerDirectory {
            records: rows
                .iter()
                .map(|&(company, symbol, sector, sub_industry)| TickerRecord {
                    company: company.to_string(),
                    symbol: normalize_symbol(symbol),
                    sector: sector.to_string(),
                    sub_industry: sub_industry.to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIndexKindError(String);

impl fmt::Display for ParseIndexKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown index '{}' (expected nasdaq or sp500)", self.0)
    }
}

impl std::error::Error for ParseIndexKindError {}

impl FromStr for IndexKind {
    type Err = ParseIndexKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nasdaq" | "nasdaq100" | "nasdaq-100" => Ok(IndexKind::Nasdaq100),
            "sp500" | "s&p500" | "s&p 500" | "sp-500" => Ok(IndexKind::Sp500),
            other => Err(ParseIndexKindError(other.to_string())),
        }
    }
}

/// Exchange notation compatibility: class shares are dotted on the source
/// pages ("BRK.B") but hyphenated at the price provider ("BRK-B").
/// Idempotent — an already-hyphenated symbol passes through unchanged.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().replace('.', "-")
}
