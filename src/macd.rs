use std::{fmt::Display, num::NonZero};

use serde::Serialize;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorPoint, IndicatorSeries, Ohlcv,
    Price, PriceSource, Series, Timestamp, ema::Smoother,
};

/// Configuration for the Moving Average Convergence Divergence
/// ([`Macd`]) indicator.
///
/// Defaults are the classic 12/26/9 on closing price.
///
/// # Example
///
/// ```
/// use quantedge_signals::MacdConfig;
///
/// let config = MacdConfig::default();
/// assert_eq!(config.fast_length(), 12);
/// assert_eq!(config.slow_length(), 26);
/// assert_eq!(config.signal_length(), 9);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }
}

impl MacdConfig {
    /// Fast EMA length.
    #[inline]
    #[must_use]
    pub fn fast_length(&self) -> usize {
        self.fast
    }

    /// Slow EMA length.
    #[inline]
    #[must_use]
    pub fn slow_length(&self) -> usize {
        self.slow
    }

    /// Length of the EMA applied to the MACD line.
    #[inline]
    #[must_use]
    pub fn signal_length(&self) -> usize {
        self.signal
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast, self.slow, self.signal, self.source
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: fast = 12, slow = 26, signal = 9,
/// source = [`PriceSource::Close`].
pub struct MacdConfigBuilder {
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn fast_length(mut self, length: NonZero<usize>) -> Self {
        self.fast = length.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn slow_length(mut self, length: NonZero<usize>) -> Self {
        self.slow = length.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn signal_length(mut self, length: NonZero<usize>) -> Self {
        self.signal = length.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    /// # Panics
    ///
    /// Panics if the fast length is not shorter than the slow length.
    #[inline]
    fn build(self) -> MacdConfig {
        assert!(
            self.fast < self.slow,
            "fast length must be shorter than slow length"
        );

        MacdConfig {
            fast: self.fast,
            slow: self.slow,
            signal: self.signal,
            source: self.source,
        }
    }
}

/// MACD output: line, signal line and their difference.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct MacdValue {
    macd: Price,
    signal: Price,
}

impl MacdValue {
    /// MACD line: `EMA(fast) − EMA(slow)`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }

    /// Signal line: EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> Price {
        self.signal
    }

    /// Histogram: `macd − signal`. Changes sign exactly at crossovers.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> Price {
        self.macd - self.signal
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MACD(m: {}, s: {})", self.macd, self.signal)
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// macd   = EMA(fast) − EMA(slow)
/// signal = EMA(signal_length) of macd
/// ```
///
/// All three EMAs are seeded with their first input and carry no bias
/// correction, so a value is produced from the first bar.
///
/// # Example
///
/// ```
/// use quantedge_signals::{Macd, MacdConfig};
/// # use quantedge_signals::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp { self.1 }
/// # }
///
/// let mut macd = Macd::new(MacdConfig::default());
///
/// let first = macd.compute(&Bar(1.10, 1)).unwrap();
/// assert_eq!(first.macd(), 0.0);
/// assert_eq!(first.signal(), 0.0);
///
/// // A rising close pulls the fast EMA above the slow one
/// let second = macd.compute(&Bar(1.20, 2)).unwrap();
/// assert!(second.macd() > 0.0);
/// assert!(second.histogram() > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
    fast: Smoother,
    slow: Smoother,
    signal: Smoother,
    prev_close: Option<Price>,
    current: Option<MacdValue>,
    last_open_time: Option<Timestamp>,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            fast: Smoother::new(config.fast),
            slow: Smoother::new(config.slow),
            signal: Smoother::new(config.signal),
            prev_close: None,
            current: None,
            last_open_time: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<MacdValue> {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < ohlcv.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );

        let price = self.config.source.extract(ohlcv, self.prev_close);

        let macd = self.fast.update(price) - self.slow.update(price);
        let signal = self.signal.update(macd);

        self.prev_close = Some(ohlcv.close());
        self.last_open_time = Some(ohlcv.open_time());
        self.current = Some(MacdValue { macd, signal });

        self.current
    }

    #[inline]
    fn value(&self) -> Option<MacdValue> {
        self.current
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal, self.config.source
        )
    }
}

/// MACD line, signal line and histogram aligned with a [`Series`].
#[derive(PartialEq, Clone, Debug, Default, Serialize)]
pub struct MacdSeries {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

/// Standard 12/26/9 MACD on closing prices over `series`.
#[must_use]
pub fn macd_series<B: Ohlcv>(series: &Series<'_, B>) -> MacdSeries {
    let mut macd = Macd::new(MacdConfig::default());

    let mut line = Vec::with_capacity(series.len());
    let mut signal = Vec::with_capacity(series.len());
    let mut histogram = Vec::with_capacity(series.len());

    for bar in series.bars() {
        let value = macd.compute(bar);
        let t = bar.open_time();

        line.push(IndicatorPoint::new(t, value.map(|v| v.macd())));
        signal.push(IndicatorPoint::new(t, value.map(|v| v.signal())));
        histogram.push(IndicatorPoint::new(t, value.map(|v| v.histogram())));
    }

    MacdSeries {
        macd: line.into_iter().collect(),
        signal: signal.into_iter().collect(),
        histogram: histogram.into_iter().collect(),
    }
}
