//! Top-level UI layout — active panel plus a one-line status bar.

pub mod help_panel;
pub mod ichimoku_chart;
pub mod status_bar;
pub mod ticker_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    draw_panel(f, chunks[0], app);
    status_bar::render(f, chunks[1], app);
}

/// Draw the active panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Tickers => ticker_panel::render(f, inner, app),
        Panel::Chart => {
            let theme = theme::Theme::default();
            let widget = ichimoku_chart::IchimokuChart::new(
                app.chart.frame.as_ref(),
                app.chart.symbol.as_deref().unwrap_or(""),
                &theme,
                app.chart.view_offset,
                app.chart.show_chikou,
            );
            f.render_widget(widget, inner);
        }
        Panel::Help => help_panel::render(f, inner, app),
    }
}
