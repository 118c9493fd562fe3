//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. Data loading is synchronous: the directory
//! resolver and the price fetch both run inline on the main thread, so
//! there are no channels and no worker handles to manage.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use kumo_core::config::AppConfig;
use kumo_core::directory::{DirectoryOrigin, IndexKind, TickerDirectory, TickerRecord};
use kumo_core::indicators::IchimokuFrame;

use crate::data_service;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Tickers,
    Chart,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Tickers => 0,
            Panel::Chart => 1,
            Panel::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Tickers),
            1 => Some(Panel::Chart),
            2 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Tickers => "Tickers",
            Panel::Chart => "Chart",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 3).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 2) % 3).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Ticker panel state — index selection plus the resolved directory.
pub struct TickerPanelState {
    pub index: IndexKind,
    pub directory: TickerDirectory,
    pub origin: DirectoryOrigin,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub warning: Option<String>,
}

impl TickerPanelState {
    pub fn new(index: IndexKind) -> Self {
        Self {
            index,
            directory: TickerDirectory::default(),
            origin: DirectoryOrigin::Fallback,
            cursor: 0,
            scroll_offset: 0,
            warning: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.directory.len()
    }

    pub fn selected_record(&self) -> Option<&TickerRecord> {
        self.directory.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.row_count();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        let new = self.cursor as isize + delta;
        self.cursor = new.clamp(0, count as isize - 1) as usize;
    }

    pub fn cursor_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_bottom(&mut self) {
        self.cursor = self.row_count().saturating_sub(1);
    }
}

/// Chart panel state — the computed overlay plus view position.
pub struct ChartPanelState {
    pub symbol: Option<String>,
    pub frame: Option<IchimokuFrame>,
    /// Bars scrolled back from the latest bar (0 = right edge is newest).
    pub view_offset: usize,
    pub show_chikou: bool,
}

impl ChartPanelState {
    pub fn new() -> Self {
        Self {
            symbol: None,
            frame: None,
            view_offset: 0,
            show_chikou: true,
        }
    }

    pub fn scroll_back(&mut self, step: usize) {
        let len = self.frame.as_ref().map(|f| f.len()).unwrap_or(0);
        self.view_offset = (self.view_offset + step).min(len.saturating_sub(1));
    }

    pub fn scroll_forward(&mut self, step: usize) {
        self.view_offset = self.view_offset.saturating_sub(step);
    }

    pub fn jump_to_latest(&mut self) {
        self.view_offset = 0;
    }
}

/// Top-level application state.
pub struct AppState {
    pub active_panel: Panel,
    pub running: bool,
    /// Demo mode: deterministic synthetic data, no network at all.
    pub demo: bool,

    pub tickers: TickerPanelState,
    pub chart: ChartPanelState,

    pub status_message: Option<(String, StatusLevel)>,

    pub config: AppConfig,
    pub cache_dir: PathBuf,
    #[allow(dead_code)]
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(config: AppConfig, state_path: PathBuf, demo: bool) -> Self {
        let cache_dir = config.cache_dir.clone();
        Self {
            active_panel: Panel::Tickers,
            running: true,
            demo,
            tickers: TickerPanelState::new(IndexKind::Nasdaq100),
            chart: ChartPanelState::new(),
            status_message: None,
            config,
            cache_dir,
            state_path,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    /// Resolve the directory for the current index (cache → live → fallback)
    /// and reset the cursor. With `refresh`, the cached snapshot is bypassed.
    pub fn reload_directory(&mut self, refresh: bool) {
        let outcome =
            data_service::load_directory(self.tickers.index, &self.cache_dir, self.demo, refresh);

        self.tickers.directory = prepend_watchlist(&self.config.watchlist, outcome.directory);
        self.tickers.origin = outcome.origin;
        self.tickers.warning = outcome.warning.clone();
        self.tickers.cursor = 0;
        self.tickers.scroll_offset = 0;

        match outcome.warning {
            Some(w) => self.set_warning(w),
            None => self.set_status(format!(
                "{}: {} constituents ({})",
                self.tickers.index.label(),
                self.tickers.directory.len(),
                self.tickers.origin.label()
            )),
        }
    }

    /// Switch to the other index and reload.
    pub fn toggle_index(&mut self) {
        let other = match self.tickers.index {
            IndexKind::Nasdaq100 => IndexKind::Sp500,
            IndexKind::Sp500 => IndexKind::Nasdaq100,
        };
        self.select_index(other);
    }

    /// Switch to a specific index. Reselecting the current one is a no-op.
    pub fn select_index(&mut self, index: IndexKind) {
        if self.tickers.index == index {
            return;
        }
        self.tickers.index = index;
        self.reload_directory(false);
    }

    /// Load price history for a symbol, compute the overlay, and switch to
    /// the chart panel. Failures stay on the ticker panel with an error in
    /// the status bar.
    pub fn open_symbol(&mut self, symbol: String) {
        match data_service::load_frame(
            &symbol,
            self.config.start_date,
            &self.cache_dir,
            self.demo,
        ) {
            Ok(loaded) => {
                let bar_count = loaded.frame.len();
                self.chart.frame = Some(loaded.frame);
                self.chart.symbol = Some(symbol.clone());
                self.chart.view_offset = 0;
                self.active_panel = Panel::Chart;
                match loaded.warning {
                    Some(w) => self.set_warning(w),
                    None => self.set_status(format!("{symbol}: {bar_count} bars loaded")),
                }
            }
            Err(e) => {
                self.set_error(format!("{symbol}: {e}"));
            }
        }
    }
}

/// Watchlist symbols pin to the top of the panel as synthetic rows ahead of
/// the index constituents.
fn prepend_watchlist(watchlist: &[String], directory: TickerDirectory) -> TickerDirectory {
    if watchlist.is_empty() {
        return directory;
    }

    let mut records: Vec<TickerRecord> = watchlist
        .iter()
        .filter(|w| !directory.records.iter().any(|r| &r.symbol == *w))
        .map(|symbol| TickerRecord {
            company: String::new(),
            symbol: symbol.clone(),
            sector: "Watchlist".to_string(),
            sub_industry: String::new(),
        })
        .collect();
    records.extend(directory.records);
    TickerDirectory { records }
}
