use std::{fmt::Display, num::NonZero};

use serde::Serialize;

use crate::{Cross, IndicatorSeries, Ohlcv, Price, Series, ema_series, latest_crossover};

/// Market direction from an EMA crossover at the latest bar.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl From<Option<Cross>> for TrendLabel {
    fn from(cross: Option<Cross>) -> Self {
        match cross {
            Some(Cross::Above) => Self::Bullish,
            Some(Cross::Below) => Self::Bearish,
            None => Self::Neutral,
        }
    }
}

impl Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        })
    }
}

/// Whether the prevailing move is strong enough to act on.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    #[default]
    Weak,
    Strong,
}

impl TrendStrength {
    /// `Strong` iff `adx` is defined and strictly above `threshold`.
    #[must_use]
    pub fn from_adx(adx: Option<Price>, threshold: f64) -> Self {
        match adx {
            Some(adx) if adx > threshold => Self::Strong,
            _ => Self::Weak,
        }
    }
}

impl Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Weak => "weak",
            Self::Strong => "strong",
        })
    }
}

/// Trend classification together with the EMAs it was read from.
#[derive(PartialEq, Clone, Debug, Serialize)]
pub struct Trend {
    pub label: TrendLabel,
    pub short: IndicatorSeries,
    pub long: IndicatorSeries,
}

/// Classifies the latest bar by a short/long EMA crossover.
///
/// `Bullish` only when the short EMA crosses above the long EMA exactly
/// at the latest bar, `Bearish` for the opposite cross, `Neutral`
/// otherwise, including while one EMA simply stays ahead. Series with
/// `long` bars or fewer are always `Neutral`.
///
/// ```
/// use quantedge_signals::{PriceBar, Series, TrendLabel, detect_trend};
/// use std::num::NonZero;
///
/// let bars: Vec<_> = (0..60u32)
///     .map(|i| {
///         let c = 1.0 + f64::from(i) * 0.01;
///         PriceBar::new(i.into(), c, c, c, c, 0.0)
///     })
///     .collect();
/// let series = Series::new(&bars).unwrap();
///
/// let trend = detect_trend(&series, NonZero::new(20).unwrap(), NonZero::new(50).unwrap());
/// // Short EMA has led since the second bar: no fresh crossover
/// assert_eq!(trend.label, TrendLabel::Neutral);
/// assert!(trend.short.latest() > trend.long.latest());
/// ```
#[must_use]
pub fn detect_trend<B: Ohlcv>(
    series: &Series<'_, B>,
    short: NonZero<usize>,
    long: NonZero<usize>,
) -> Trend {
    let short = ema_series(series, short);
    let long_ema = ema_series(series, long);

    let label = if series.len() > long.get() {
        latest_crossover(&short, &long_ema).into()
    } else {
        TrendLabel::Neutral
    };

    Trend {
        label,
        short,
        long: long_ema,
    }
}
