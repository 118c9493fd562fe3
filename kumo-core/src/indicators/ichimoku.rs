//! Ichimoku Kinko Hyo — five derived series plus the cloud bias flag.
//!
//! Components (standard 9/26/52 parameters, displacement 26):
//! - Tenkan-sen: (highest high + lowest low) / 2 over the trailing 9 bars
//! - Kijun-sen: same midpoint over the trailing 26 bars
//! - Senkou Span A: (Tenkan + Kijun) / 2 computed 26 bars back, plotted here
//! - Senkou Span B: 52-bar extremes midpoint computed 26 bars back, plotted here
//! - Chikou Span: close shifted backward 26 bars (close[i + 26] at position i)
//!
//! Positions where a window cannot be satisfied carry `f64::NAN`. The cloud
//! flag is `Some` only where both spans are defined; a tie (Span A == Span B)
//! counts as bullish.

use crate::domain::PriceBar;
use serde::{Deserialize, Serialize};

/// Window lengths and forward/backward displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IchimokuParams {
    pub tenkan_period: usize,
    pub kijun_period: usize,
    pub senkou_b_period: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan_period: 9,
            kijun_period: 26,
            senkou_b_period: 52,
            displacement: 26,
        }
    }
}

/// Cloud coloring: relative order of the two Senkou spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudBias {
    Bullish,
    Bearish,
}

impl CloudBias {
    /// Span A >= Span B is bullish; the tie goes bullish, verbatim from the
    /// reference charting convention. None when either span is absent.
    pub fn from_spans(span_a: f64, span_b: f64) -> Option<Self> {
        if span_a.is_nan() || span_b.is_nan() {
            return None;
        }
        if span_a >= span_b {
            Some(CloudBias::Bullish)
        } else {
            Some(CloudBias::Bearish)
        }
    }

    pub fn is_bullish(self) -> bool {
        self == CloudBias::Bullish
    }
}

/// A price series extended with the five Ichimoku series and the cloud flag.
///
/// All vectors have the same length as `bars`; the source OHLC is never
/// mutated. Computed fresh from a series on each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IchimokuFrame {
    pub bars: Vec<PriceBar>,
    pub tenkan: Vec<f64>,
    pub kijun: Vec<f64>,
    pub senkou_a: Vec<f64>,
    pub senkou_b: Vec<f64>,
    pub chikou: Vec<f64>,
    pub cloud: Vec<Option<CloudBias>>,
}

impl IchimokuFrame {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// The Ichimoku indicator engine. Pure: `compute` has no side effects and
/// signals no errors — short series simply carry NaN everywhere.
#[derive(Debug, Clone)]
pub struct Ichimoku {
    params: IchimokuParams,
}

impl Ichimoku {
    pub fn new(params: IchimokuParams) -> Self {
        assert!(params.tenkan_period >= 1, "tenkan period must be >= 1");
        assert!(params.kijun_period >= 1, "kijun period must be >= 1");
        assert!(params.senkou_b_period >= 1, "senkou B period must be >= 1");
        Self { params }
    }

    /// Standard 9/26/52 configuration with displacement 26.
    pub fn standard() -> Self {
        Self::new(IchimokuParams::default())
    }

    pub fn params(&self) -> IchimokuParams {
        self.params
    }

    pub fn compute(&self, bars: &[PriceBar]) -> IchimokuFrame {
        let n = bars.len();
        let p = self.params;

        let mut tenkan = vec![f64::NAN; n];
        let mut kijun = vec![f64::NAN; n];
        let mut senkou_a = vec![f64::NAN; n];
        let mut senkou_b = vec![f64::NAN; n];
        let mut chikou = vec![f64::NAN; n];

        // Trailing-window midpoints, inclusive of the current bar.
        for i in (p.tenkan_period.saturating_sub(1))..n {
            tenkan[i] = extremes_midpoint(&bars[i + 1 - p.tenkan_period..=i]);
        }
        for i in (p.kijun_period.saturating_sub(1))..n {
            kijun[i] = extremes_midpoint(&bars[i + 1 - p.kijun_period..=i]);
        }

        // Senkou spans: computed `displacement` bars back, plotted here so
        // the cloud runs ahead of price.
        for i in p.displacement..n {
            let j = i - p.displacement;
            if !tenkan[j].is_nan() && !kijun[j].is_nan() {
                senkou_a[i] = (tenkan[j] + kijun[j]) / 2.0;
            }
            if j + 1 >= p.senkou_b_period {
                senkou_b[i] = extremes_midpoint(&bars[j + 1 - p.senkou_b_period..=j]);
            }
        }

        // Chikou: the close `displacement` bars ahead, plotted here so it
        // runs behind price. Absent for the final `displacement` bars.
        for i in 0..n {
            if i + p.displacement < n {
                chikou[i] = bars[i + p.displacement].close;
            }
        }

        let cloud = (0..n)
            .map(|i| CloudBias::from_spans(senkou_a[i], senkou_b[i]))
            .collect();

        IchimokuFrame {
            bars: bars.to_vec(),
            tenkan,
            kijun,
            senkou_a,
            senkou_b,
            chikou,
            cloud,
        }
    }
}

/// (highest high + lowest low) / 2 over the window. NaN in any High/Low
/// propagates NaN for the whole window.
fn extremes_midpoint(window: &[PriceBar]) -> f64 {
    let mut max_high = f64::NEG_INFINITY;
    let mut min_low = f64::INFINITY;
    for bar in window {
        if bar.high.is_nan() || bar.low.is_nan() {
            return f64::NAN;
        }
        if bar.high > max_high {
            max_high = bar.high;
        }
        if bar.low < min_low {
            min_low = bar.low;
        }
    }
    (max_high + min_low) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    /// Flat synthetic series: High=110, Low=90, Close=100 on every bar.
    fn flat_bars(n: usize) -> Vec<PriceBar> {
        let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        (0..n)
            .map(|i| PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open: 100.0,
                high: 110.0,
                low: 90.0,
                close: 100.0,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn empty_series_yields_empty_frame() {
        let frame = Ichimoku::standard().compute(&[]);
        assert!(frame.is_empty());
        assert!(frame.tenkan.is_empty());
        assert!(frame.cloud.is_empty());
    }

    #[test]
    fn short_series_is_all_absent() {
        let frame = Ichimoku::standard().compute(&flat_bars(8));
        assert!(frame.tenkan.iter().all(|v| v.is_nan()));
        assert!(frame.kijun.iter().all(|v| v.is_nan()));
        assert!(frame.senkou_a.iter().all(|v| v.is_nan()));
        assert!(frame.senkou_b.iter().all(|v| v.is_nan()));
        assert!(frame.cloud.iter().all(|c| c.is_none()));
    }

    #[test]
    fn tenkan_defined_from_ninth_bar() {
        let frame = Ichimoku::standard().compute(&flat_bars(12));
        assert!(frame.tenkan[7].is_nan());
        assert_approx(frame.tenkan[8], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn kijun_defined_from_bar_26() {
        let frame = Ichimoku::standard().compute(&flat_bars(30));
        assert!(frame.kijun[24].is_nan());
        assert_approx(frame.kijun[25], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn senkou_a_shifted_forward() {
        // Span A needs kijun at i-26, so it first appears at i = 51.
        let frame = Ichimoku::standard().compute(&flat_bars(60));
        assert!(frame.senkou_a[50].is_nan());
        assert_approx(frame.senkou_a[51], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn senkou_b_defined_from_bar_77() {
        // 52-bar window at i-26 needs i-26 >= 51, so i >= 77.
        let frame = Ichimoku::standard().compute(&flat_bars(80));
        assert!(frame.senkou_b[76].is_nan());
        assert_approx(frame.senkou_b[77], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn chikou_is_future_close_shifted_back() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let frame = Ichimoku::standard().compute(&bars);

        for i in 0..40 {
            if i + 26 < 40 {
                assert_approx(frame.chikou[i], closes[i + 26], DEFAULT_EPSILON);
            } else {
                assert!(frame.chikou[i].is_nan());
            }
        }
    }

    #[test]
    fn flat_60_bar_scenario() {
        let frame = Ichimoku::standard().compute(&flat_bars(60));

        for i in 8..60 {
            assert_approx(frame.tenkan[i], 100.0, DEFAULT_EPSILON);
        }
        for i in 25..60 {
            assert_approx(frame.kijun[i], 100.0, DEFAULT_EPSILON);
        }
        for i in 51..60 {
            assert_approx(frame.senkou_a[i], 100.0, DEFAULT_EPSILON);
            // Span B window not yet satisfiable in 60 bars.
            assert!(frame.senkou_b[i].is_nan());
        }
        for i in 0..=33 {
            assert_approx(frame.chikou[i], 100.0, DEFAULT_EPSILON);
        }
        assert!(frame.chikou[34].is_nan());
    }

    #[test]
    fn cloud_tie_counts_as_bullish() {
        // Flat series: once both spans are defined they are equal.
        let frame = Ichimoku::standard().compute(&flat_bars(90));
        assert_eq!(frame.cloud[77], Some(CloudBias::Bullish));
        assert!(frame.cloud[76].is_none());
    }

    #[test]
    fn cloud_bearish_when_span_a_below_b() {
        assert_eq!(CloudBias::from_spans(99.0, 100.0), Some(CloudBias::Bearish));
        assert_eq!(CloudBias::from_spans(100.0, 100.0), Some(CloudBias::Bullish));
        assert_eq!(CloudBias::from_spans(f64::NAN, 100.0), None);
        assert_eq!(CloudBias::from_spans(100.0, f64::NAN), None);
    }

    #[test]
    fn nan_input_propagates_through_windows() {
        let mut bars = flat_bars(20);
        bars[10].high = f64::NAN;
        bars[10].low = f64::NAN;
        let frame = Ichimoku::standard().compute(&bars);

        // Every 9-bar window containing bar 10 is poisoned.
        for i in 10..=18 {
            assert!(frame.tenkan[i].is_nan());
        }
        assert_approx(frame.tenkan[9], 100.0, DEFAULT_EPSILON);
        assert_approx(frame.tenkan[19], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn trending_series_midpoints() {
        // Highs 11..15, lows 9..13 over the last 9 bars of a rising series.
        let closes: Vec<f64> = (1..=15).map(|i| i as f64 * 10.0).collect();
        let bars = make_bars(&closes);
        let frame = Ichimoku::standard().compute(&bars);

        // At i=14: window bars 6..=14. high[i] = max(open,close)+1 = close+1
        // on a rising series, low[i] = min(open,close)-1 = prev close - 1.
        let max_high = 151.0;
        let min_low = 59.0;
        assert_approx(frame.tenkan[14], (max_high + min_low) / 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn compute_does_not_mutate_source() {
        let bars = flat_bars(60);
        let frame = Ichimoku::standard().compute(&bars);
        assert_eq!(frame.len(), 60);
        assert_eq!(frame.bars[30].close, bars[30].close);
        assert_eq!(frame.bars[30].date, bars[30].date);
    }
}
