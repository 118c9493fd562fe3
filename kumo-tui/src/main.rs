//! Kumo TUI — index constituents, ticker picker, Ichimoku chart.
//!
//! Panels:
//! 1. Tickers — NASDAQ-100 / S&P 500 constituent directory with cursor picker
//! 2. Chart — candles over the shaded kumo cloud with all five lines
//! 3. Help — keyboard shortcuts and the chart legend
//!
//! Data loading is synchronous: picking a ticker blocks briefly while the
//! history downloads, then the chart opens. `--demo` runs entirely offline
//! on deterministic synthetic data.

mod app;
mod data_service;
mod input;
mod persistence;
mod sample_data;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use kumo_core::config::AppConfig;

use crate::app::AppState;

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let demo = std::env::args().any(|a| a == "--demo");

    let config = AppConfig::load_or_default(Path::new("kumo.toml"));
    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kumoscope")
        .join("state.json");

    let persisted = persistence::load(&state_path);

    let mut app = AppState::new(config, state_path.clone(), demo);
    persistence::apply(&mut app, persisted);

    // Resolve the initial directory before the first frame; the cache path
    // makes this instant on every run but the first.
    app.reload_directory(false);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    let persisted = persistence::extract(&app);
    let _ = persistence::save(&state_path, &persisted);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for input events (50ms timeout for ~20 FPS tick).
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
