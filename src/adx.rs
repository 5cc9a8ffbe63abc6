use std::{fmt::Display, num::NonZero};

use serde::Serialize;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorPoint, IndicatorSeries, Ohlcv,
    Price, Series, Timestamp, price_source::true_range, price_window::RollingSum,
    ring_buffer::RingBuffer,
};

/// Configuration for the Average Directional Index ([`Adx`]).
///
/// ADX always reads high, low and close, so the only parameter is the
/// smoothing length shared by the range, the directional movement and
/// the final DX average.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AdxConfig {
    length: usize,
}

impl IndicatorConfig for AdxConfig {
    type Builder = AdxConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        AdxConfigBuilder { length: None }
    }
}

impl AdxConfig {
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Bars needed before the first ADX value: `2 × length − 1`.
    #[inline]
    #[must_use]
    pub fn required_bars(&self) -> usize {
        2 * self.length - 1
    }

    #[must_use]
    pub fn with_length(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Default for AdxConfig {
    /// ADX(14).
    fn default() -> Self {
        Self { length: 14 }
    }
}

impl Display for AdxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdxConfig({})", self.length)
    }
}

/// Builder for [`AdxConfig`].
///
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct AdxConfigBuilder {
    length: Option<usize>,
}

impl AdxConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }
}

impl IndicatorConfigBuilder<AdxConfig> for AdxConfigBuilder {
    #[inline]
    fn build(self) -> AdxConfig {
        AdxConfig {
            length: self.length.expect("length is required"),
        }
    }
}

/// ADX reading with the directional indicators it was derived from.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct AdxValue {
    adx: Price,
    plus_di: Price,
    minus_di: Price,
}

impl AdxValue {
    /// Trend strength, 0–100. Direction-agnostic.
    #[inline]
    #[must_use]
    pub fn adx(&self) -> Price {
        self.adx
    }

    /// Positive directional indicator (+DI).
    #[inline]
    #[must_use]
    pub fn plus_di(&self) -> Price {
        self.plus_di
    }

    /// Negative directional indicator (−DI).
    #[inline]
    #[must_use]
    pub fn minus_di(&self) -> Price {
        self.minus_di
    }
}

impl Display for AdxValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ADX(adx: {}, +di: {}, -di: {})",
            self.adx, self.plus_di, self.minus_di
        )
    }
}

/// Average Directional Index (ADX) with simple rolling smoothing.
///
/// ```text
/// TR   = max(high − low, |high − prev_close|, |low − prev_close|)
/// up   = high − prev_high,   down = prev_low − low
/// +DM  = up   if up > down and up > 0,     else 0
/// −DM  = down if down > up and down > 0,   else 0
/// ±DI  = 100 × mean(±DM) / mean(TR)        over `length` bars
/// DX   = 100 × |+DI − −DI| / (+DI + −DI)
/// ADX  = mean(DX)                          over `length` bars
/// ```
///
/// The first bar has no predecessor: its TR is `high − low` and both
/// movements are zero. DI is undefined while the mean range is zero and
/// DX is undefined while both DIs are zero; an undefined DX anywhere in
/// the last `length` bars leaves ADX undefined. The first value is
/// produced at bar `2 × length − 1`.
///
/// # Example
///
/// ```
/// use quantedge_signals::{Adx, AdxConfig};
/// use std::num::NonZero;
/// # use quantedge_signals::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, f64, f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.2 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.1 }
/// #     fn close(&self) -> Price { self.2 }
/// #     fn open_time(&self) -> Timestamp { self.3 }
/// # }
///
/// let mut adx = Adx::new(AdxConfig::with_length(NonZero::new(2).unwrap()));
///
/// // Steady advance: every bar makes a higher high and a higher low
/// assert_eq!(adx.compute(&Bar(11.0, 9.0, 10.0, 1)), None);
/// assert_eq!(adx.compute(&Bar(12.0, 10.0, 11.0, 2)), None);
///
/// let value = adx.compute(&Bar(13.0, 11.0, 12.0, 3)).unwrap();
/// assert_eq!(value.minus_di(), 0.0);
/// assert_eq!(value.adx(), 100.0);
/// ```
#[derive(Clone, Debug)]
pub struct Adx {
    config: AdxConfig,
    true_range: RollingSum,
    plus_dm: RollingSum,
    minus_dm: RollingSum,
    dx: RingBuffer<Option<f64>>,
    prev_bar: Option<(Price, Price, Price)>,
    directional: Option<(Price, Price)>,
    current: Option<AdxValue>,
    last_open_time: Option<Timestamp>,
    length_reciprocal: f64,
}

impl Indicator for Adx {
    type Config = AdxConfig;
    type Output = AdxValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            true_range: RollingSum::new(config.length),
            plus_dm: RollingSum::new(config.length),
            minus_dm: RollingSum::new(config.length),
            dx: RingBuffer::new(config.length),
            prev_bar: None,
            directional: None,
            current: None,
            last_open_time: None,
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / config.length as f64,
        }
    }

    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<AdxValue> {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < ohlcv.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );

        let (high, low, close) = (ohlcv.high(), ohlcv.low(), ohlcv.close());

        let prev_close = self.prev_bar.map(|(_, _, c)| c);
        let (plus_dm, minus_dm) = self
            .prev_bar
            .map_or((0.0, 0.0), |(prev_high, prev_low, _)| {
                Self::directional_movement(prev_high, prev_low, high, low)
            });

        self.true_range.push(true_range(ohlcv, prev_close));
        self.plus_dm.push(plus_dm);
        self.minus_dm.push(minus_dm);

        self.directional = self.directional_indicators_from_window();
        let dx = self.directional.and_then(|(plus_di, minus_di)| {
            let sum = plus_di + minus_di;
            (sum > 0.0).then(|| 100.0 * (plus_di - minus_di).abs() / sum)
        });
        self.dx.push(dx);

        self.current = self
            .average_dx()
            .zip(self.directional)
            .map(|(adx, (plus_di, minus_di))| AdxValue {
                adx,
                plus_di,
                minus_di,
            });

        self.prev_bar = Some((high, low, close));
        self.last_open_time = Some(ohlcv.open_time());

        self.current
    }

    #[inline]
    fn value(&self) -> Option<AdxValue> {
        self.current
    }
}

impl Adx {
    /// Latest `(+DI, −DI)`, available `length − 1` bars before ADX itself.
    #[inline]
    #[must_use]
    pub fn directional_indicators(&self) -> Option<(Price, Price)> {
        self.directional
    }

    #[inline]
    fn directional_movement(
        prev_high: Price,
        prev_low: Price,
        high: Price,
        low: Price,
    ) -> (Price, Price) {
        let up = high - prev_high;
        let down = prev_low - low;

        let plus_dm = if up > down && up > 0.0 { up } else { 0.0 };
        let minus_dm = if down > up && down > 0.0 { down } else { 0.0 };

        (plus_dm, minus_dm)
    }

    fn directional_indicators_from_window(&self) -> Option<(Price, Price)> {
        let true_range = self.true_range.non_negative_sum()?;
        let plus_dm = self.plus_dm.non_negative_sum()?;
        let minus_dm = self.minus_dm.non_negative_sum()?;

        (true_range > 0.0).then(|| (100.0 * plus_dm / true_range, 100.0 * minus_dm / true_range))
    }

    fn average_dx(&self) -> Option<Price> {
        if !self.dx.is_ready() {
            return None;
        }

        let sum = self.dx.iter().sum::<Option<f64>>()?;
        Some(sum * self.length_reciprocal)
    }
}

impl Display for Adx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ADX({})", self.config.length)
    }
}

/// ADX with its directional indicators, aligned with a [`Series`].
#[derive(PartialEq, Clone, Debug, Default, Serialize)]
pub struct AdxSeries {
    pub adx: IndicatorSeries,
    pub plus_di: IndicatorSeries,
    pub minus_di: IndicatorSeries,
}

/// ADX(`length`) over `series`.
///
/// +DI and −DI start at index `length − 1`; ADX at index `2 × length − 2`.
#[must_use]
pub fn adx_series<B: Ohlcv>(series: &Series<'_, B>, length: NonZero<usize>) -> AdxSeries {
    let mut adx = Adx::new(AdxConfig::with_length(length));

    let mut strength = Vec::with_capacity(series.len());
    let mut plus_di = Vec::with_capacity(series.len());
    let mut minus_di = Vec::with_capacity(series.len());

    for bar in series.bars() {
        let value = adx.compute(bar);
        let directional = adx.directional_indicators();
        let t = bar.open_time();

        strength.push(IndicatorPoint::new(t, value.map(|v| v.adx())));
        plus_di.push(IndicatorPoint::new(t, directional.map(|(p, _)| p)));
        minus_di.push(IndicatorPoint::new(t, directional.map(|(_, m)| m)));
    }

    AdxSeries {
        adx: strength.into_iter().collect(),
        plus_di: plus_di.into_iter().collect(),
        minus_di: minus_di.into_iter().collect(),
    }
}
