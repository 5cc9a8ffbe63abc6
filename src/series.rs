use crate::{Error, Indicator, Ohlcv, Price, Result, Timestamp};

use serde::Serialize;
use tracing::debug;

/// Validated, chronologically ordered view over a slice of bars.
///
/// Construction rejects empty input, timestamps that do not strictly
/// increase, and non-finite prices or volumes. Everything downstream
/// can rely on those properties.
///
/// ```
/// use quantedge_signals::{Error, PriceBar, Series};
///
/// let bars = [
///     PriceBar::new(1, 1.0, 1.1, 0.9, 1.05, 100.0),
///     PriceBar::new(2, 1.05, 1.2, 1.0, 1.15, 120.0),
/// ];
/// let series = Series::new(&bars).unwrap();
/// assert_eq!(series.len(), 2);
///
/// let unsorted = [bars[1], bars[0]];
/// assert!(matches!(
///     Series::new(&unsorted),
///     Err(Error::NotChronological { index: 1, .. })
/// ));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Series<'a, B> {
    bars: &'a [B],
}

impl<'a, B: Ohlcv> Series<'a, B> {
    /// Validates `bars` and wraps them.
    ///
    /// # Errors
    ///
    /// [`Error::EmptySeries`] for an empty slice,
    /// [`Error::NotChronological`] when a timestamp does not strictly
    /// follow its predecessor, and [`Error::NonFinite`] for NaN or
    /// infinite values.
    pub fn new(bars: &'a [B]) -> Result<Self> {
        Self::validate(bars).inspect_err(|error| debug!(%error, "rejected series"))?;

        Ok(Self { bars })
    }

    fn validate(bars: &[B]) -> Result<()> {
        if bars.is_empty() {
            return Err(Error::EmptySeries);
        }

        let mut previous: Option<Timestamp> = None;
        for (index, bar) in bars.iter().enumerate() {
            let fields = [
                ("open", bar.open()),
                ("high", bar.high()),
                ("low", bar.low()),
                ("close", bar.close()),
                ("volume", bar.volume()),
            ];
            if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
                return Err(Error::NonFinite { index, field });
            }

            let current = bar.open_time();
            if let Some(previous) = previous
                && current <= previous
            {
                return Err(Error::NotChronological {
                    index,
                    previous,
                    current,
                });
            }
            previous = Some(current);
        }

        Ok(())
    }

    /// Underlying bars, oldest first.
    #[must_use]
    pub fn bars(&self) -> &'a [B] {
        self.bars
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always `false`: an empty series cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar.
    #[must_use]
    pub fn latest(&self) -> &'a B {
        &self.bars[self.bars.len() - 1]
    }

    /// Bar before the most recent one, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&'a B> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }

    /// Streams every bar through `indicator`, recording one point per bar.
    pub(crate) fn collect<I>(&self, mut indicator: I) -> IndicatorSeries
    where
        I: Indicator<Output = Price>,
    {
        self.bars
            .iter()
            .map(|bar| IndicatorPoint::new(bar.open_time(), indicator.compute(bar)))
            .collect()
    }
}

/// One indicator reading, `None` while the indicator lacks history.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct IndicatorPoint {
    pub open_time: Timestamp,
    pub value: Option<Price>,
}

impl IndicatorPoint {
    #[must_use]
    pub fn new(open_time: Timestamp, value: Option<Price>) -> Self {
        Self { open_time, value }
    }
}

/// Indicator values aligned 1:1 with the bars of a [`Series`].
///
/// Leading points are `None` until the indicator's window has filled.
#[derive(PartialEq, Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct IndicatorSeries {
    points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`, oldest first.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&IndicatorPoint> {
        self.points.get(index)
    }

    /// Value at the most recent bar.
    #[must_use]
    pub fn latest(&self) -> Option<Price> {
        self.points.last().and_then(|p| p.value)
    }

    /// Value one bar before the most recent.
    #[must_use]
    pub fn previous(&self) -> Option<Price> {
        self.points
            .len()
            .checked_sub(2)
            .and_then(|i| self.points[i].value)
    }

    /// Values only, oldest first.
    pub fn values(&self) -> impl Iterator<Item = Option<Price>> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndicatorPoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn points(&self) -> &[IndicatorPoint] {
        &self.points
    }
}

impl FromIterator<IndicatorPoint> for IndicatorSeries {
    fn from_iter<T: IntoIterator<Item = IndicatorPoint>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'s> IntoIterator for &'s IndicatorSeries {
    type Item = &'s IndicatorPoint;
    type IntoIter = std::slice::Iter<'s, IndicatorPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
