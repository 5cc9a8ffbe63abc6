use std::num::NonZero;

use serde::Serialize;

use crate::{IndicatorPoint, IndicatorSeries, Ohlcv, Price, Series};

/// Support and resistance at one bar.
#[derive(PartialEq, Clone, Copy, Debug, Default, Serialize)]
pub struct Levels {
    /// Lowest low of the window.
    pub support: Option<Price>,
    /// Highest high of the window.
    pub resistance: Option<Price>,
}

/// Support and resistance for every bar of a [`Series`].
#[derive(PartialEq, Clone, Debug, Default, Serialize)]
pub struct LevelsSeries {
    pub support: IndicatorSeries,
    pub resistance: IndicatorSeries,
}

/// Support and resistance at the latest bar.
///
/// A centered window cannot look past the newest bar, so the latest
/// levels come from the trailing `window` bars: the lowest low and the
/// highest high among them. `None` when fewer than `window` bars exist.
///
/// ```
/// use quantedge_signals::{PriceBar, Series, support_resistance};
/// use std::num::NonZero;
///
/// let bars = [
///     PriceBar::new(1, 1.0, 1.4, 0.8, 1.0, 0.0),
///     PriceBar::new(2, 1.0, 1.2, 0.9, 1.1, 0.0),
///     PriceBar::new(3, 1.1, 1.3, 1.0, 1.2, 0.0),
/// ];
/// let series = Series::new(&bars).unwrap();
///
/// let levels = support_resistance(&series, NonZero::new(2).unwrap());
/// assert_eq!(levels.support, Some(0.9));
/// assert_eq!(levels.resistance, Some(1.3));
/// ```
#[must_use]
pub fn support_resistance<B: Ohlcv>(series: &Series<'_, B>, window: NonZero<usize>) -> Levels {
    let bars = series.bars();
    bars.len()
        .checked_sub(window.get())
        .map_or_else(Levels::default, |start| extremes(&bars[start..]))
}

/// Support and resistance over a centered window for every bar.
///
/// Bar `i` reads bars `[i − ⌊w/2⌋, i + ⌈w/2⌉ − 1]`. Where that window
/// would run past the newest bar it falls back to the last `w` bars of
/// the series; where it would start before the first bar the levels are
/// `None`. Only leading values are ever undefined.
#[must_use]
pub fn support_resistance_series<B: Ohlcv>(
    series: &Series<'_, B>,
    window: NonZero<usize>,
) -> LevelsSeries {
    let bars = series.bars();
    let window = window.get();
    let ahead = (window - 1) / 2;
    let behind = window - 1 - ahead;

    let mut support = Vec::with_capacity(bars.len());
    let mut resistance = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let range = if i + ahead < bars.len() {
            i.checked_sub(behind).map(|start| start..=i + ahead)
        } else {
            bars.len().checked_sub(window).map(|start| start..=bars.len() - 1)
        };
        let levels = range.map_or_else(Levels::default, |range| extremes(&bars[range]));

        support.push(IndicatorPoint::new(bar.open_time(), levels.support));
        resistance.push(IndicatorPoint::new(bar.open_time(), levels.resistance));
    }

    LevelsSeries {
        support: support.into_iter().collect(),
        resistance: resistance.into_iter().collect(),
    }
}

fn extremes<B: Ohlcv>(bars: &[B]) -> Levels {
    let support = bars.iter().map(Ohlcv::low).reduce(f64::min);
    let resistance = bars.iter().map(Ohlcv::high).reduce(f64::max);

    Levels {
        support,
        resistance,
    }
}
