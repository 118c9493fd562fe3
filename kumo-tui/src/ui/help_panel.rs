//! Panel 3 — Help: keyboard shortcuts and a short legend.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-3", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Tickers");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "g / G", "Jump to top / bottom");
    key(&mut lines, "PgUp / PgDn", "Move cursor by 10");
    key(&mut lines, "n / s / i", "NASDAQ-100 / S&P 500 / toggle");
    key(&mut lines, "r", "Refresh directory from the live source");
    key(&mut lines, "Enter", "Download history and open the chart");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Chart");
    key(&mut lines, "h / l", "Scroll back / forward 5 bars");
    key(&mut lines, "PgUp / PgDn", "Scroll by 30 bars");
    key(&mut lines, "0", "Jump to the latest bar");
    key(&mut lines, "c", "Toggle the chikou span");
    key(&mut lines, "r", "Re-fetch the current symbol");
    lines.push(Line::from(""));

    section(&mut lines, "Chart Legend");
    key(&mut lines, "· (cyan)", "Tenkan-sen — 9-bar midpoint");
    key(&mut lines, "• (purple)", "Kijun-sen — 26-bar midpoint");
    key(&mut lines, "─ (green/pink)", "Senkou span A / B, shifted 26 forward");
    key(&mut lines, "+ (blue)", "Chikou span — close plotted 26 back");
    key(&mut lines, "shaded area", "Kumo cloud: green bullish, red bearish");
    lines.push(Line::from(""));

    section(&mut lines, "Data Sources");
    key(&mut lines, "live", "Directory scraped from the index's public table");
    key(&mut lines, "cache", "Directory or prices reused from disk");
    key(&mut lines, "fallback", "Built-in five-ticker list (source unreachable)");

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent())));
}

fn key(lines: &mut Vec<Line>, binding: &str, description: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {binding:<18}"), theme::positive()),
        Span::styled(description.to_string(), theme::secondary()),
    ]));
}
