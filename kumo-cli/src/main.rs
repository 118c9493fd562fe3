//! Kumo CLI — ticker directory, download, Ichimoku, and cache commands.
//!
//! Commands:
//! - `tickers` — resolve an index's constituent directory and print it
//! - `download` — fetch daily bars from Yahoo Finance into the flat cache
//! - `ichimoku` — compute the Ichimoku frame for a symbol and print the tail
//! - `cache status` — report cached symbols and date ranges
//! - `cache clean` — remove symbols whose cache entries are old

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use kumo_core::data::{download_symbols, FlatCache, StdoutProgress, YahooProvider};
use kumo_core::directory::{resolve_directory, HttpConstituentSource, IndexKind};
use kumo_core::indicators::{CloudBias, Ichimoku, IchimokuFrame};

#[derive(Parser)]
#[command(
    name = "kumo",
    about = "Kumo CLI — Ichimoku Kinko Hyo dashboard toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print the constituent directory for an index.
    Tickers {
        /// Index: nasdaq or sp500.
        index: IndexKind,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Ignore any cached snapshot and fetch live.
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// Download daily bars from Yahoo Finance into the flat cache.
    Download {
        /// Symbols to download (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 2020-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Force re-download even if cached today.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Compute the Ichimoku overlay for a symbol and print the last rows.
    Ichimoku {
        /// Ticker symbol.
        #[arg(long)]
        symbol: String,

        /// Start date (YYYY-MM-DD). Defaults to 2020-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Offline mode: cache only, no network.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Number of trailing rows to print.
        #[arg(long, default_value_t = 20)]
        tail: usize,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report cached symbols, date ranges, and sizes.
    Status {
        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Remove cached symbols not fetched within the given number of days.
    Clean {
        /// Remove symbols not fetched in this many days.
        #[arg(long)]
        older_than_days: u64,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Actually delete (without this flag, only previews what would be removed).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tickers {
            index,
            cache_dir,
            refresh,
        } => run_tickers(index, &cache_dir, refresh),
        Commands::Download {
            symbols,
            start,
            end,
            force,
            cache_dir,
        } => run_download(symbols, start, end, force, cache_dir),
        Commands::Ichimoku {
            symbol,
            start,
            end,
            offline,
            tail,
            cache_dir,
        } => run_ichimoku(&symbol, start, end, offline, tail, &cache_dir),
        Commands::Cache { action } => match action {
            CacheAction::Status { cache_dir } => run_cache_status(&cache_dir),
            CacheAction::Clean {
                older_than_days,
                cache_dir,
                confirm,
            } => run_cache_clean(&cache_dir, older_than_days, confirm),
        },
    }
}

fn run_tickers(index: IndexKind, cache_dir: &Path, refresh: bool) -> Result<()> {
    let cache = FlatCache::new(cache_dir);
    let source = HttpConstituentSource::new();

    let cache_ref = if refresh { None } else { Some(&cache) };
    let outcome = resolve_directory(index, cache_ref, &source);

    if let Some(warning) = &outcome.warning {
        eprintln!("WARNING: {warning}");
    }

    println!(
        "{} constituents ({} rows, source: {})",
        index.label(),
        outcome.directory.len(),
        outcome.origin.label()
    );
    println!();
    println!(
        "{:<8} {:<34} {:<26} {}",
        "Symbol", "Company", "Sector", "Sub-Industry"
    );
    println!("{}", "-".repeat(100));
    for record in &outcome.directory.records {
        println!(
            "{:<8} {:<34} {:<26} {}",
            record.symbol,
            truncate(&record.company, 33),
            truncate(&record.sector, 25),
            record.sub_industry
        );
    }

    Ok(())
}

fn run_download(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    force: bool,
    cache_dir: PathBuf,
) -> Result<()> {
    let (start_date, end_date) = parse_range(start.as_deref(), end.as_deref())?;

    let provider = YahooProvider::new();
    let cache = FlatCache::new(cache_dir);
    let progress = StdoutProgress;

    let sym_refs: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();

    let summary = download_symbols(
        &provider, &cache, &sym_refs, start_date, end_date, force, &progress,
    );

    if !summary.all_succeeded() {
        for (sym, err) in &summary.errors {
            eprintln!("Error for {sym}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_ichimoku(
    symbol: &str,
    start: Option<String>,
    end: Option<String>,
    offline: bool,
    tail: usize,
    cache_dir: &Path,
) -> Result<()> {
    let (start_date, end_date) = parse_range(start.as_deref(), end.as_deref())?;
    let cache = FlatCache::new(cache_dir);
    let today = chrono::Local::now().date_naive();

    // Same-day cache first; otherwise fetch (unless offline, which falls
    // back to the most recent cached fetch whatever its date).
    let bars = match cache.load_prices(symbol, today) {
        Ok(bars) => bars,
        Err(_) if offline => {
            let Some(fetched_on) = cache.get_meta(symbol).map(|m| m.fetched_on) else {
                println!("No cached data for {symbol} and --offline is set.");
                return Ok(());
            };
            match cache.load_prices(symbol, fetched_on) {
                Ok(bars) => bars,
                Err(_) => {
                    println!("No cached data for {symbol} and --offline is set.");
                    return Ok(());
                }
            }
        }
        Err(_) => {
            let provider = YahooProvider::new();
            let summary = download_symbols(
                &provider,
                &cache,
                &[symbol],
                start_date,
                end_date,
                false,
                &StdoutProgress,
            );
            if !summary.all_succeeded() {
                if summary.errors.iter().all(|(_, e)| e.is_empty_result()) {
                    println!("Nothing to display: {symbol} has no data in range.");
                    return Ok(());
                }
                for (sym, err) in &summary.errors {
                    eprintln!("Error for {sym}: {err}");
                }
                std::process::exit(1);
            }
            cache.load_prices(symbol, today).map_err(|e| anyhow::anyhow!("{e}"))?
        }
    };

    let in_range: Vec<_> = bars
        .into_iter()
        .filter(|b| b.date >= start_date && b.date <= end_date)
        .collect();

    if in_range.is_empty() {
        println!("Nothing to display: {symbol} has no bars in range.");
        return Ok(());
    }

    let frame = Ichimoku::standard().compute(&in_range);
    print_frame_tail(symbol, &frame, tail);
    Ok(())
}

fn print_frame_tail(symbol: &str, frame: &IchimokuFrame, tail: usize) {
    println!(
        "Ichimoku Kinko Hyo for {symbol} ({} bars, {} to {})",
        frame.len(),
        frame.bars.first().map(|b| b.date.to_string()).unwrap_or_default(),
        frame.bars.last().map(|b| b.date.to_string()).unwrap_or_default(),
    );
    println!();
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}  {}",
        "Date", "Close", "Tenkan", "Kijun", "SpanA", "SpanB", "Chikou", "Cloud"
    );
    println!("{}", "-".repeat(90));

    let start = frame.len().saturating_sub(tail);
    for i in start..frame.len() {
        println!(
            "{:<12} {:>10.2} {:>10} {:>10} {:>10} {:>10} {:>10}  {}",
            frame.bars[i].date,
            frame.bars[i].close,
            fmt_opt(frame.tenkan[i]),
            fmt_opt(frame.kijun[i]),
            fmt_opt(frame.senkou_a[i]),
            fmt_opt(frame.senkou_b[i]),
            fmt_opt(frame.chikou[i]),
            match frame.cloud[i] {
                Some(CloudBias::Bullish) => "bullish",
                Some(CloudBias::Bearish) => "bearish",
                None => "-",
            }
        );
    }
}

/// Absence prints as a dash, never as zero.
fn fmt_opt(v: f64) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{v:.2}")
    }
}

fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<(NaiveDate, NaiveDate)> {
    let start_date = start
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());

    let end_date = end
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    Ok((start_date, end_date))
}

fn run_cache_status(cache_dir: &Path) -> Result<()> {
    if !cache_dir.exists() {
        println!("Cache directory does not exist: {}", cache_dir.display());
        return Ok(());
    }

    let cache = FlatCache::new(cache_dir);
    let symbols = cache.cached_symbols();

    if symbols.is_empty() {
        println!("Cache is empty: {}", cache_dir.display());
        return Ok(());
    }

    let mut total_size: u64 = 0;
    let mut rows: Vec<(String, String, String, u64)> = Vec::new();

    for symbol in &symbols {
        let (date_range, bar_count) = match cache.get_meta(symbol) {
            Some(meta) => (
                format!("{} to {}", meta.start_date, meta.end_date),
                meta.bar_count,
            ),
            None => ("(no meta)".into(), 0),
        };
        let size = dir_size(&cache.symbol_dir(symbol));
        total_size += size;
        rows.push((symbol.clone(), date_range, format!("{bar_count} bars"), size));
    }

    println!("Cache: {}", cache_dir.display());
    println!("Symbols: {}", symbols.len());
    println!("Total size: {}", format_size(total_size));
    println!();
    println!("{:<8} {:<25} {:<12} {:>10}", "Symbol", "Date Range", "Bars", "Size");
    println!("{}", "-".repeat(58));
    for (sym, range, bars, size) in &rows {
        println!("{:<8} {:<25} {:<12} {:>10}", sym, range, bars, format_size(*size));
    }

    Ok(())
}

fn run_cache_clean(cache_dir: &Path, older_than_days: u64, confirm: bool) -> Result<()> {
    if !cache_dir.exists() {
        println!("Cache directory does not exist: {}", cache_dir.display());
        return Ok(());
    }

    let cache = FlatCache::new(cache_dir);
    let cutoff = chrono::Local::now().naive_local() - chrono::Duration::days(older_than_days as i64);

    let mut to_remove: Vec<String> = Vec::new();
    for symbol in cache.cached_symbols() {
        let should_remove = cache
            .get_meta(&symbol)
            // Keep entries we can't date rather than guessing.
            .map(|meta| meta.cached_at < cutoff)
            .unwrap_or(false);
        if should_remove {
            to_remove.push(symbol);
        }
    }

    if to_remove.is_empty() {
        println!("No symbols older than {older_than_days} days to remove.");
        return Ok(());
    }

    println!(
        "Found {} symbol(s) not fetched in {older_than_days} days:",
        to_remove.len()
    );
    for sym in &to_remove {
        let size = dir_size(&cache.symbol_dir(sym));
        println!("  {sym} ({})", format_size(size));
    }

    if !confirm {
        println!();
        println!("Dry run — pass --confirm to actually delete.");
        return Ok(());
    }

    for sym in &to_remove {
        cache.remove_symbol(sym).map_err(|e| anyhow::anyhow!("{e}"))?;
        println!("Removed: {sym}");
    }

    println!("Done. Removed {} symbol(s).", to_remove.len());
    Ok(())
}

fn dir_size(path: &Path) -> u64 {
    let mut size = 0u64;
    if let Ok(entries) = std::fs::read_dir(path) {
        for entry in entries.flatten() {
            if let Ok(meta) = entry.metadata() {
                size += meta.len();
            }
        }
    }
    size
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
