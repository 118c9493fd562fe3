//! App state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use kumo_core::directory::IndexKind;

use crate::app::{AppState, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub active_panel: Panel,
    pub index: IndexKind,
    pub last_symbol: Option<String>,
    pub show_chikou: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_panel: Panel::Tickers,
            index: IndexKind::Nasdaq100,
            last_symbol: None,
            show_chikou: true,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        active_panel: app.active_panel,
        index: app.tickers.index,
        last_symbol: app.chart.symbol.clone(),
        show_chikou: app.chart.show_chikou,
    }
}

/// Apply persisted state to AppState. The last symbol is only recorded, not
/// re-fetched; the user reopens it explicitly.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    app.tickers.index = state.index;
    app.chart.show_chikou = state.show_chikou;
    if app.active_panel == Panel::Chart && app.chart.frame.is_none() {
        // No data yet to chart; start on the picker instead.
        app.active_panel = Panel::Tickers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = std::env::temp_dir().join("kumo_persist_test");
        let path = dir.join("state.json");

        let state = PersistedState {
            active_panel: Panel::Help,
            index: IndexKind::Sp500,
            last_symbol: Some("BRK-B".into()),
            show_chikou: false,
        };

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.active_panel, Panel::Help);
        assert_eq!(loaded.index, IndexKind::Sp500);
        assert_eq!(loaded.last_symbol.as_deref(), Some("BRK-B"));
        assert!(!loaded.show_chikou);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded.active_panel, Panel::Tickers);
        assert_eq!(loaded.index, IndexKind::Nasdaq100);
    }

    #[test]
    fn chart_panel_without_data_falls_back_to_tickers() {
        use kumo_core::config::AppConfig;
        let mut app = AppState::new(AppConfig::default(), std::path::PathBuf::from("."), true);

        let state = PersistedState {
            active_panel: Panel::Chart,
            ..Default::default()
        };
        apply(&mut app, state);
        assert_eq!(app.active_panel, Panel::Tickers);
    }
}
