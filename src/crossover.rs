use std::fmt::Display;

use serde::Serialize;

use crate::{IndicatorSeries, Price};

/// Directional lean of a pattern or an indicator vote.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
}

impl Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
        })
    }
}

/// Type of crossover event detected between two data series.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Cross {
    /// Fast series moved from at-or-below to strictly above the slow one.
    Above,
    /// Fast series moved from at-or-above to strictly below the slow one.
    Below,
}

impl From<Cross> for Bias {
    fn from(cross: Cross) -> Self {
        match cross {
            Cross::Above => Self::Bullish,
            Cross::Below => Self::Bearish,
        }
    }
}

/// Determine if a crossover occurred between the previous and current values.
///
/// Edge-triggered: a fast series that already leads produces no event.
///
/// ```
/// use quantedge_signals::{Cross, crossover};
///
/// assert_eq!(crossover(1.0, 2.0, 3.0, 2.0), Some(Cross::Above));
/// assert_eq!(crossover(3.0, 2.0, 4.0, 2.0), None);
/// ```
#[must_use]
pub fn crossover(prev_fast: Price, prev_slow: Price, fast: Price, slow: Price) -> Option<Cross> {
    if prev_fast <= prev_slow && fast > slow {
        Some(Cross::Above)
    } else if prev_fast >= prev_slow && fast < slow {
        Some(Cross::Below)
    } else {
        None
    }
}

/// Crossover between the last two points of two aligned series.
///
/// `None` when either series lacks a value at either bar.
#[must_use]
pub fn latest_crossover(fast: &IndicatorSeries, slow: &IndicatorSeries) -> Option<Cross> {
    crossover(
        fast.previous()?,
        slow.previous()?,
        fast.latest()?,
        slow.latest()?,
    )
}
