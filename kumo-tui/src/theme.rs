//! Kumo theme tokens — neon accents on a dark base.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (focus, tenkan-sen)
//! - **Positive**: Neon green (up candles, bullish cloud)
//! - **Negative**: Hot pink (down candles, bearish cloud)
//! - **Warning**: Neon orange (degraded data sources, alerts)
//! - **Neutral**: Cool purple (kijun-sen, secondary info)
//! - **Muted**: Steel blue (chikou span, axis labels, disabled)

use kumo_core::indicators::CloudBias;
use ratatui::style::{Color, Modifier, Style};

/// Kumo neon theme.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Near-black background (primary surface)
    pub background: Color,
    /// Electric cyan accent (focus, tenkan-sen)
    pub accent: Color,
    /// Neon green (up candles, bullish cloud)
    pub positive: Color,
    /// Hot pink (down candles, bearish cloud)
    pub negative: Color,
    /// Neon orange (warnings, fallback data)
    pub warning: Color,
    /// Cool purple (kijun-sen, neutral info)
    pub neutral: Color,
    /// Steel blue (chikou, axis labels, muted text)
    pub muted: Color,
    /// White (primary text)
    pub text_primary: Color,
    /// Light gray (secondary text)
    pub text_secondary: Color,
    /// Dim green (bullish cloud background fill)
    pub cloud_bullish: Color,
    /// Dim red (bearish cloud background fill)
    pub cloud_bearish: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::kumo_neon()
    }
}

impl Theme {
    pub fn kumo_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
            // Cloud fills are darker than the candle colors so candles and
            // lines stay readable on top of them.
            cloud_bullish: Color::Rgb(0, 60, 30),
            cloud_bearish: Color::Rgb(70, 10, 40),
        }
    }

    /// Candle body/wick color for a bar.
    pub fn candle_color(&self, is_up: bool) -> Color {
        if is_up {
            self.positive
        } else {
            self.negative
        }
    }

    /// Background fill for a cloud column. None when either span is absent.
    pub fn cloud_fill(&self, bias: Option<CloudBias>) -> Option<Color> {
        match bias {
            Some(CloudBias::Bullish) => Some(self.cloud_bullish),
            Some(CloudBias::Bearish) => Some(self.cloud_bearish),
            None => None,
        }
    }

    /// Foreground color for a cloud bias badge.
    pub fn bias_color(&self, bias: Option<CloudBias>) -> Color {
        match bias {
            Some(CloudBias::Bullish) => self.positive,
            Some(CloudBias::Bearish) => self.negative,
            None => self.text_secondary,
        }
    }

    /// Color for a directory origin label (cache/live/fallback).
    pub fn origin_color(&self, origin: &str) -> Color {
        match origin {
            "live" => self.positive,
            "cache" => self.accent,
            "fallback" => self.warning,
            _ => self.text_secondary,
        }
    }
}

// Style helpers used across the panel renderers. These use the default
// palette; the chart widget takes a &Theme directly.

pub fn accent() -> Style {
    Style::default().fg(Theme::default().accent)
}

pub fn muted() -> Style {
    Style::default().fg(Theme::default().muted)
}

pub fn warning() -> Style {
    Style::default().fg(Theme::default().warning)
}

pub fn negative() -> Style {
    Style::default().fg(Theme::default().negative)
}

pub fn positive() -> Style {
    Style::default().fg(Theme::default().positive)
}

pub fn text() -> Style {
    Style::default().fg(Theme::default().text_primary)
}

pub fn secondary() -> Style {
    Style::default().fg(Theme::default().text_secondary)
}

pub fn panel_border(active: bool) -> Style {
    let theme = Theme::default();
    if active {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.muted)
    }
}

pub fn panel_title(active: bool) -> Style {
    let theme = Theme::default();
    if active {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted)
    }
}
