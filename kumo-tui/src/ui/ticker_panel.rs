//! Panel 1 — Tickers: index selection and the constituent directory list.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let tickers = &app.tickers;
    let mut lines: Vec<Line> = Vec::new();

    // Header: index, row count, and where the directory came from.
    let origin = tickers.origin.label();
    let palette = theme::Theme::default();
    lines.push(Line::from(vec![
        Span::styled(tickers.index.label(), theme::accent()),
        Span::styled(
            format!("  {} constituents  ", tickers.row_count()),
            theme::secondary(),
        ),
        Span::styled(
            format!("[{origin}]"),
            Style::default().fg(palette.origin_color(origin)),
        ),
        Span::styled("  [n/s]index [r]efresh [Enter]chart", theme::muted()),
    ]));

    if let Some(warning) = &tickers.warning {
        lines.push(Line::from(Span::styled(warning.as_str(), theme::warning())));
    }
    lines.push(Line::from(""));

    let header_rows = lines.len();
    let list_height = (area.height as usize).saturating_sub(header_rows);

    // Keep the cursor inside the visible window.
    let scroll = if tickers.cursor >= tickers.scroll_offset + list_height {
        tickers.cursor + 1 - list_height
    } else if tickers.cursor < tickers.scroll_offset {
        tickers.cursor
    } else {
        tickers.scroll_offset
    };

    for (row, record) in tickers
        .directory
        .records
        .iter()
        .enumerate()
        .skip(scroll)
        .take(list_height)
    {
        let is_cursor = row == tickers.cursor;
        let style = if is_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::text()
        };

        let label = format!(
            "{:<8} {:<32} {}",
            record.symbol,
            clip(&record.company, 32),
            record.sector
        );
        lines.push(Line::from(Span::styled(label, style)));
    }

    if tickers.directory.is_empty() {
        lines.push(Line::from(Span::styled(
            "No directory loaded — press r to fetch",
            theme::muted(),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).chain(['…']).collect()
    }
}
