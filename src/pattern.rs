use std::fmt::Display;

use serde::{Serialize, ser::SerializeStruct};

use crate::{Bias, Ohlcv, Price, Series};

/// Chart formation found in the recent bars.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Pattern {
    /// Two nearly equal highs, bearish.
    DoubleTop,
    /// Two nearly equal lows, bullish.
    DoubleBottom,
}

impl Pattern {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DoubleTop => "Double Top",
            Self::DoubleBottom => "Double Bottom",
        }
    }

    #[must_use]
    pub fn bias(self) -> Bias {
        match self {
            Self::DoubleTop => Bias::Bearish,
            Self::DoubleBottom => Bias::Bullish,
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Pattern", 2)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("bias", &self.bias())?;
        state.end()
    }
}

/// Scans the last `lookback` bars for double tops and double bottoms.
///
/// A peak is a high strictly above both neighbouring highs, a trough a
/// low strictly below both neighbouring lows; both neighbours must lie
/// inside the lookback window. A double top fires when the two most
/// recent peaks differ by less than `tolerance` times the most recent
/// one, a double bottom likewise for troughs. Both may fire at once.
/// Series shorter than `lookback` yield nothing.
///
/// ```
/// use quantedge_signals::{Pattern, PriceBar, Series, detect_patterns};
///
/// let highs = [1.0, 1.5, 1.0, 2.0, 1.0, 2.01, 1.0];
/// let bars: Vec<_> = highs
///     .iter()
///     .zip(1..)
///     .map(|(&h, t)| PriceBar::new(t, 1.0, h, 1.0, 1.0, 0.0))
///     .collect();
/// let series = Series::new(&bars).unwrap();
///
/// assert_eq!(detect_patterns(&series, 7, 0.01), vec![Pattern::DoubleTop]);
/// ```
#[must_use]
pub fn detect_patterns<B: Ohlcv>(
    series: &Series<'_, B>,
    lookback: usize,
    tolerance: f64,
) -> Vec<Pattern> {
    let bars = series.bars();
    let Some(start) = bars.len().checked_sub(lookback) else {
        return Vec::new();
    };
    let recent = &bars[start..];

    let highs: Vec<Price> = recent.iter().map(Ohlcv::high).collect();
    let lows: Vec<Price> = recent.iter().map(Ohlcv::low).collect();

    let mut patterns = Vec::new();

    if let Some((older, newer)) = last_two(&extrema(&highs, |mid, side| mid > side))
        && nearly_equal(older, newer, tolerance)
    {
        patterns.push(Pattern::DoubleTop);
    }

    if let Some((older, newer)) = last_two(&extrema(&lows, |mid, side| mid < side))
        && nearly_equal(older, newer, tolerance)
    {
        patterns.push(Pattern::DoubleBottom);
    }

    patterns
}

/// Values that beat both neighbours under `beats`, oldest first.
fn extrema(values: &[Price], beats: impl Fn(Price, Price) -> bool) -> Vec<Price> {
    values
        .windows(3)
        .filter(|w| beats(w[1], w[0]) && beats(w[1], w[2]))
        .map(|w| w[1])
        .collect()
}

fn last_two(values: &[Price]) -> Option<(Price, Price)> {
    match values {
        [.., older, newer] => Some((*older, *newer)),
        _ => None,
    }
}

fn nearly_equal(older: Price, newer: Price, tolerance: f64) -> bool {
    (newer - older).abs() < tolerance * newer.abs()
}
