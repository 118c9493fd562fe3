//! Keyboard input dispatch — global keys first, then the active panel.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use kumo_core::directory::IndexKind;

use crate::app::{AppState, Panel};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => {
            app.active_panel = Panel::Tickers;
            return;
        }
        KeyCode::Char('2') => {
            app.active_panel = Panel::Chart;
            return;
        }
        KeyCode::Char('3') | KeyCode::Char('?') => {
            app.active_panel = Panel::Help;
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        _ => {}
    }

    match app.active_panel {
        Panel::Tickers => handle_tickers_key(app, key),
        Panel::Chart => handle_chart_key(app, key),
        Panel::Help => {}
    }
}

fn handle_tickers_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.tickers.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.tickers.move_cursor(-1),
        KeyCode::PageDown => app.tickers.move_cursor(10),
        KeyCode::PageUp => app.tickers.move_cursor(-10),
        KeyCode::Char('g') | KeyCode::Home => app.tickers.cursor_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.tickers.cursor_to_bottom(),
        KeyCode::Char('i') => app.toggle_index(),
        KeyCode::Char('n') => app.select_index(IndexKind::Nasdaq100),
        KeyCode::Char('s') => app.select_index(IndexKind::Sp500),
        KeyCode::Char('r') => {
            app.set_status("Refreshing directory...");
            app.reload_directory(true);
        }
        KeyCode::Enter | KeyCode::Char('l') => {
            if let Some(record) = app.tickers.selected_record() {
                let symbol = record.symbol.clone();
                app.set_status(format!("Loading {symbol}..."));
                app.open_symbol(symbol);
            }
        }
        _ => {}
    }
}

fn handle_chart_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.chart.scroll_back(5),
        KeyCode::Char('l') | KeyCode::Right => app.chart.scroll_forward(5),
        KeyCode::PageUp => app.chart.scroll_back(30),
        KeyCode::PageDown => app.chart.scroll_forward(30),
        KeyCode::Char('0') | KeyCode::End => app.chart.jump_to_latest(),
        KeyCode::Char('c') => {
            app.chart.show_chikou = !app.chart.show_chikou;
            let state = if app.chart.show_chikou { "on" } else { "off" };
            app.set_status(format!("Chikou span {state}"));
        }
        KeyCode::Char('r') => {
            if let Some(symbol) = app.chart.symbol.clone() {
                app.set_status(format!("Reloading {symbol}..."));
                app.open_symbol(symbol);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumo_core::config::AppConfig;
    use std::path::PathBuf;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn demo_app() -> AppState {
        let mut app = AppState::new(AppConfig::default(), PathBuf::from("."), true);
        app.reload_directory(false);
        app
    }

    #[test]
    fn q_quits() {
        let mut app = demo_app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn number_keys_switch_panels() {
        let mut app = demo_app();
        handle_key(&mut app, press(KeyCode::Char('2')));
        assert_eq!(app.active_panel, Panel::Chart);
        handle_key(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.active_panel, Panel::Help);
        handle_key(&mut app, press(KeyCode::Char('1')));
        assert_eq!(app.active_panel, Panel::Tickers);
    }

    #[test]
    fn tab_cycles_forward() {
        let mut app = demo_app();
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Chart);
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_panel, Panel::Tickers);
    }

    #[test]
    fn jk_moves_ticker_cursor() {
        let mut app = demo_app();
        handle_key(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.tickers.cursor, 1);
        handle_key(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.tickers.cursor, 0);
        handle_key(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.tickers.cursor, 0);
    }

    #[test]
    fn enter_opens_chart_for_cursor_symbol() {
        let mut app = demo_app();
        let expected = app.tickers.selected_record().unwrap().symbol.clone();
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.active_panel, Panel::Chart);
        assert_eq!(app.chart.symbol.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn i_toggles_index() {
        let mut app = demo_app();
        handle_key(&mut app, press(KeyCode::Char('i')));
        assert_eq!(app.tickers.index, IndexKind::Sp500);
    }

    #[test]
    fn n_and_s_select_index_directly() {
        let mut app = demo_app();
        handle_key(&mut app, press(KeyCode::Char('s')));
        assert_eq!(app.tickers.index, IndexKind::Sp500);
        handle_key(&mut app, press(KeyCode::Char('s')));
        assert_eq!(app.tickers.index, IndexKind::Sp500);
        handle_key(&mut app, press(KeyCode::Char('n')));
        assert_eq!(app.tickers.index, IndexKind::Nasdaq100);
    }

    #[test]
    fn chart_keys_scroll_and_toggle() {
        let mut app = demo_app();
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.active_panel, Panel::Chart);

        handle_key(&mut app, press(KeyCode::Char('h')));
        assert_eq!(app.chart.view_offset, 5);
        handle_key(&mut app, press(KeyCode::Char('0')));
        assert_eq!(app.chart.view_offset, 0);

        assert!(app.chart.show_chikou);
        handle_key(&mut app, press(KeyCode::Char('c')));
        assert!(!app.chart.show_chikou);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = demo_app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }
}
