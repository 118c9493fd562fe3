//! Panel 2 — Ichimoku chart: candles over a shaded kumo cloud.
//!
//! Renders with direct buffer writes:
//! - Each bar = 1 terminal column
//! - Cloud: background fill between senkou span A and B, green when span A
//!   is on top, red otherwise
//! - Candle body: block char, wicks as vertical lines
//! - Tenkan/kijun/chikou: dot marks drawn over the candles, gaps where a
//!   line is not yet defined

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Widget};

use kumo_core::indicators::{CloudBias, IchimokuFrame};

use crate::theme::Theme;

pub struct IchimokuChart<'a> {
    frame: Option<&'a IchimokuFrame>,
    symbol: &'a str,
    theme: &'a Theme,
    view_offset: usize,
    show_chikou: bool,
}

impl<'a> IchimokuChart<'a> {
    pub fn new(
        frame: Option<&'a IchimokuFrame>,
        symbol: &'a str,
        theme: &'a Theme,
        view_offset: usize,
        show_chikou: bool,
    ) -> Self {
        Self {
            frame,
            symbol,
            theme,
            view_offset,
            show_chikou,
        }
    }

    /// Map a price to a Y position in the plot area (0 = top).
    fn price_to_y(price: f64, y_min: f64, y_max: f64, plot_height: u16) -> u16 {
        if (y_max - y_min).abs() < 1e-9 || plot_height == 0 {
            return 0;
        }
        let frac = (price - y_min) / (y_max - y_min);
        let y = plot_height.saturating_sub(1) as f64 * (1.0 - frac);
        y.round()
            .max(0.0)
            .min(plot_height.saturating_sub(1) as f64) as u16
    }
}

impl<'a> Widget for IchimokuChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame.filter(|f| !f.is_empty()) else {
            let block = Block::default()
                .title(" Ichimoku [No Data — pick a ticker first] ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background));
            block.render(area, buf);
            return;
        };

        let len = frame.len();
        let end = len - self.view_offset.min(len - 1);
        // Bias shown in the title is the one at the visible right edge.
        let edge_bias = frame.cloud[end - 1];
        let bias_label = match edge_bias {
            Some(CloudBias::Bullish) => "bullish",
            Some(CloudBias::Bearish) => "bearish",
            None => "-",
        };

        let title = format!(
            " {} | {} bars | {} to {} | cloud: {bias_label} ",
            self.symbol,
            len,
            frame.bars[0].date,
            frame.bars[end - 1].date,
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let inner = block.inner(area);
        block.render(area, buf);

        // Left margin for Y-axis labels, one bottom row for the legend.
        let label_width: u16 = 9;
        let plot_left = inner.x + label_width;
        let plot_top = inner.y;
        let plot_width = inner.width.saturating_sub(label_width);
        let plot_height = inner.height.saturating_sub(1);

        if plot_width == 0 || plot_height == 0 {
            return;
        }

        let start = end.saturating_sub(plot_width as usize);
        let visible = start..end;

        // Price bounds over everything visible: bars plus any defined line
        // value, so the cloud never clips off the top or bottom.
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for i in visible.clone() {
            y_min = y_min.min(frame.bars[i].low);
            y_max = y_max.max(frame.bars[i].high);
            let mut lines = vec![
                frame.tenkan[i],
                frame.kijun[i],
                frame.senkou_a[i],
                frame.senkou_b[i],
            ];
            if self.show_chikou {
                lines.push(frame.chikou[i]);
            }
            for v in lines {
                if !v.is_nan() {
                    y_min = y_min.min(v);
                    y_max = y_max.max(v);
                }
            }
        }

        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let y_lower = y_min - pad;
        let y_upper = y_max + pad;

        // Y-axis labels
        let y_labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let y_positions = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (label_val, y_pos) in y_labels.iter().zip(y_positions.iter()) {
            let label = format!("{:>8.1}", label_val);
            let y = plot_top + y_pos;
            if y < inner.y + inner.height {
                buf.set_string(inner.x, y, &label, Style::default().fg(self.theme.muted));
            }
        }

        // Pass 1: cloud background fill between the two spans.
        for (col, i) in visible.clone().enumerate() {
            let x = plot_left + col as u16;
            if x >= area.right() {
                break;
            }
            let (a, b) = (frame.senkou_a[i], frame.senkou_b[i]);
            if a.is_nan() || b.is_nan() {
                continue;
            }
            let Some(fill) = self.theme.cloud_fill(frame.cloud[i]) else {
                continue;
            };

            let top = Self::price_to_y(a.max(b), y_lower, y_upper, plot_height);
            let bottom = Self::price_to_y(a.min(b), y_lower, y_upper, plot_height);
            for y in top..=bottom {
                let py = plot_top + y;
                if py < area.bottom() {
                    buf.set_style(Rect::new(x, py, 1, 1), Style::default().bg(fill));
                }
            }
        }

        // Pass 2: candles.
        for (col, i) in visible.clone().enumerate() {
            let x = plot_left + col as u16;
            if x >= area.right() {
                break;
            }
            let bar = &frame.bars[i];
            let is_up = bar.close >= bar.open;
            let style = Style::default().fg(self.theme.candle_color(is_up));

            let high_y = Self::price_to_y(bar.high, y_lower, y_upper, plot_height);
            let low_y = Self::price_to_y(bar.low, y_lower, y_upper, plot_height);
            let body_top_y =
                Self::price_to_y(bar.open.max(bar.close), y_lower, y_upper, plot_height);
            let body_bot_y =
                Self::price_to_y(bar.open.min(bar.close), y_lower, y_upper, plot_height);

            for y in high_y..body_top_y {
                let py = plot_top + y;
                if py < area.bottom() {
                    buf.set_string(x, py, "│", style);
                }
            }

            let body_char = if is_up { "█" } else { "▓" };
            for y in body_top_y..=body_bot_y {
                let py = plot_top + y;
                if py < area.bottom() {
                    buf.set_string(x, py, body_char, style);
                }
            }

            for y in (body_bot_y + 1)..=low_y {
                let py = plot_top + y;
                if py < area.bottom() {
                    buf.set_string(x, py, "│", style);
                }
            }
        }

        // Pass 3: overlay lines on top of the candles. NaN = gap, nothing
        // drawn. set_string patches the style, so the cloud background
        // survives underneath the marks.
        for (col, i) in visible.clone().enumerate() {
            let x = plot_left + col as u16;
            if x >= area.right() {
                break;
            }

            let mut marks = vec![
                (frame.senkou_a[i], "─", self.theme.positive),
                (frame.senkou_b[i], "─", self.theme.negative),
                (frame.tenkan[i], "·", self.theme.accent),
                (frame.kijun[i], "•", self.theme.neutral),
            ];
            if self.show_chikou {
                marks.push((frame.chikou[i], "+", self.theme.muted));
            }

            for (value, ch, color) in marks {
                if value.is_nan() {
                    continue;
                }
                let y = Self::price_to_y(value, y_lower, y_upper, plot_height);
                let py = plot_top + y;
                if py < area.bottom() {
                    buf.set_string(x, py, ch, Style::default().fg(color));
                }
            }
        }

        // Legend row.
        let legend_y = plot_top + plot_height;
        if legend_y < area.bottom() {
            let legend = format!(
                "·tenkan •kijun ─spans +chikou({}) | h/l:scroll 0:latest c:chikou r:reload",
                if self.show_chikou { "on" } else { "off" }
            );
            buf.set_string(
                plot_left,
                legend_y,
                &legend,
                Style::default().fg(self.theme.muted),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kumo_core::domain::PriceBar;
    use kumo_core::indicators::Ichimoku;

    fn make_frame(closes: &[f64]) -> IchimokuFrame {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars: Vec<PriceBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000,
            })
            .collect();
        Ichimoku::standard().compute(&bars)
    }

    fn buffer_text(buf: &Buffer, area: Rect) -> String {
        let mut content = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                content.push_str(buf.cell((x, y)).unwrap().symbol());
            }
        }
        content
    }

    #[test]
    fn renders_without_panic() {
        let theme = Theme::default();
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64) * 0.3).collect();
        let frame = make_frame(&closes);
        let chart = IchimokuChart::new(Some(&frame), "AAPL", &theme, 0, true);

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);

        let content = buffer_text(&buf, area);
        assert!(content.contains("AAPL"));
        assert!(content.contains("120 bars"));
    }

    #[test]
    fn no_frame_shows_placeholder() {
        let theme = Theme::default();
        let chart = IchimokuChart::new(None, "", &theme, 0, true);

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);

        assert!(buffer_text(&buf, area).contains("No Data"));
    }

    #[test]
    fn rising_series_titles_bullish_cloud() {
        let theme = Theme::default();
        let closes: Vec<f64> = (0..160).map(|i| 100.0 + (i as f64) * 0.5).collect();
        let frame = make_frame(&closes);
        let chart = IchimokuChart::new(Some(&frame), "QQQ", &theme, 0, true);

        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);

        assert!(buffer_text(&buf, area).contains("cloud: bullish"));
    }

    #[test]
    fn cloud_fill_reaches_the_buffer() {
        let theme = Theme::default();
        let closes: Vec<f64> = (0..160).map(|i| 100.0 + (i as f64) * 0.5).collect();
        let frame = make_frame(&closes);
        let chart = IchimokuChart::new(Some(&frame), "QQQ", &theme, 0, true);

        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);

        let mut filled = 0;
        for y in 0..area.height {
            for x in 0..area.width {
                let cell = buf.cell((x, y)).unwrap();
                if cell.style().bg == Some(theme.cloud_bullish) {
                    filled += 1;
                }
            }
        }
        assert!(filled > 0, "expected at least one bullish cloud cell");
    }

    #[test]
    fn chikou_toggle_changes_legend() {
        let theme = Theme::default();
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64) * 0.3).collect();
        let frame = make_frame(&closes);

        let area = Rect::new(0, 0, 80, 24);

        let mut buf_on = Buffer::empty(area);
        IchimokuChart::new(Some(&frame), "SPY", &theme, 0, true).render(area, &mut buf_on);
        assert!(buffer_text(&buf_on, area).contains("+chikou(on)"));

        let mut buf_off = Buffer::empty(area);
        IchimokuChart::new(Some(&frame), "SPY", &theme, 0, false).render(area, &mut buf_off);
        assert!(buffer_text(&buf_off, area).contains("+chikou(off)"));
    }

    #[test]
    fn view_offset_moves_the_window() {
        let theme = Theme::default();
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + (i as f64) * 0.2).collect();
        let frame = make_frame(&closes);
        let last_date = frame.bars.last().unwrap().date.to_string();

        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);
        IchimokuChart::new(Some(&frame), "SPY", &theme, 50, true).render(area, &mut buf);

        // The title's right edge date should not be the newest bar.
        assert!(!buffer_text(&buf, area).contains(&last_date));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let theme = Theme::default();
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64) * 0.3).collect();
        let frame = make_frame(&closes);
        let chart = IchimokuChart::new(Some(&frame), "SPY", &theme, 0, true);

        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
    }
}
