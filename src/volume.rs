use std::{fmt::Display, num::NonZero};

use serde::Serialize;

use crate::{Ohlcv, Series, Sma, SmaConfig};

/// Volume regime at the latest bar.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeTrend {
    #[default]
    Neutral,
    /// Volume surge on a rising close.
    StrongBullish,
    /// Volume surge on a falling close.
    StrongBearish,
}

impl Display for VolumeTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Neutral => "neutral",
            Self::StrongBullish => "strong_bullish",
            Self::StrongBearish => "strong_bearish",
        })
    }
}

/// Classifies the latest bar's volume against its rolling mean.
///
/// A surge is volume strictly above `multiplier` times the `window`-bar
/// SMA of volume (the mean includes the latest bar). A surge is
/// `StrongBullish` when the close rose from the previous bar and
/// `StrongBearish` when it fell. Everything else, including an
/// unchanged close and a mean that is not yet defined, is `Neutral`.
///
/// ```
/// use quantedge_signals::{PriceBar, Series, VolumeTrend, analyze_volume};
/// use std::num::NonZero;
///
/// let bars = [
///     PriceBar::new(1, 1.0, 1.0, 1.0, 1.0, 100.0),
///     PriceBar::new(2, 1.0, 1.0, 1.0, 1.0, 100.0),
///     PriceBar::new(3, 1.0, 1.2, 1.0, 1.2, 400.0),
/// ];
/// let series = Series::new(&bars).unwrap();
///
/// let trend = analyze_volume(&series, NonZero::new(3).unwrap(), 1.5);
/// assert_eq!(trend, VolumeTrend::StrongBullish);
/// ```
#[must_use]
pub fn analyze_volume<B: Ohlcv>(
    series: &Series<'_, B>,
    window: NonZero<usize>,
    multiplier: f64,
) -> VolumeTrend {
    let bars = series.bars();
    let start = bars.len().saturating_sub(window.get());

    let mut sma = Sma::new(SmaConfig::volume(window));
    let Some(mean) = bars[start..].iter().map(|bar| sma.compute(bar)).last().flatten() else {
        return VolumeTrend::Neutral;
    };

    let latest = series.latest();
    if latest.volume() <= multiplier * mean {
        return VolumeTrend::Neutral;
    }

    let Some(previous) = series.previous() else {
        return VolumeTrend::Neutral;
    };
    let change = latest.close() - previous.close();

    if change > 0.0 {
        VolumeTrend::StrongBullish
    } else if change < 0.0 {
        VolumeTrend::StrongBearish
    } else {
        VolumeTrend::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{Bar, bar, nz};

    fn with_volumes(points: &[(f64, f64)]) -> Vec<Bar> {
        points
            .iter()
            .zip(1..)
            .map(|(&(close, volume), t)| bar(close, t).with_volume(volume))
            .collect()
    }

    fn analyze(points: &[(f64, f64)], window: usize) -> VolumeTrend {
        let bars = with_volumes(points);
        let series = Series::new(&bars).unwrap();
        analyze_volume(&series, nz(window), 1.5)
    }

    mod surge {
        use super::*;

        #[test]
        fn rising_close_is_bullish() {
            let trend = analyze(&[(10.0, 100.0), (10.0, 100.0), (10.0, 100.0), (11.0, 500.0)], 4);
            assert_eq!(trend, VolumeTrend::StrongBullish);
        }

        #[test]
        fn falling_close_is_bearish() {
            let trend = analyze(&[(10.0, 100.0), (10.0, 100.0), (10.0, 100.0), (9.0, 500.0)], 4);
            assert_eq!(trend, VolumeTrend::StrongBearish);
        }

        #[test]
        fn unchanged_close_is_neutral() {
            let trend = analyze(&[(10.0, 100.0), (10.0, 100.0), (10.0, 100.0), (10.0, 500.0)], 4);
            assert_eq!(trend, VolumeTrend::Neutral);
        }

        #[test]
        fn mean_includes_latest_bar() {
            // 180 > 1.5 * 100, but the mean with it is 126.7 and 180 < 190
            let trend = analyze(&[(10.0, 100.0), (10.0, 100.0), (11.0, 180.0)], 3);
            assert_eq!(trend, VolumeTrend::Neutral);
        }

        #[test]
        fn only_window_bars_count() {
            // Huge early volume falls outside the window
            let trend = analyze(
                &[(10.0, 10_000.0), (10.0, 100.0), (10.0, 100.0), (11.0, 400.0)],
                3,
            );
            assert_eq!(trend, VolumeTrend::StrongBullish);
        }
    }

    mod quiet {
        use super::*;

        #[test]
        fn average_volume_is_neutral() {
            let trend = analyze(&[(10.0, 100.0), (11.0, 100.0), (12.0, 100.0)], 3);
            assert_eq!(trend, VolumeTrend::Neutral);
        }

        #[test]
        fn short_history_is_neutral() {
            let trend = analyze(&[(10.0, 100.0), (11.0, 1_000.0)], 20);
            assert_eq!(trend, VolumeTrend::Neutral);
        }

        #[test]
        fn zero_volume_is_neutral() {
            let trend = analyze(&[(10.0, 0.0), (11.0, 0.0), (12.0, 0.0)], 3);
            assert_eq!(trend, VolumeTrend::Neutral);
        }
    }

    #[test]
    fn labels_are_snake_case() {
        assert_eq!(VolumeTrend::StrongBullish.to_string(), "strong_bullish");
        assert_eq!(
            serde_json::to_string(&VolumeTrend::StrongBearish).unwrap(),
            "\"strong_bearish\""
        );
    }
}
