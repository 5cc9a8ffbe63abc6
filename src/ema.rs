use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorSeries, Ohlcv, Price,
    PriceSource, Series, Timestamp,
};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use quantedge_signals::EmaConfig;
/// use std::num::NonZero;
///
/// let config = EmaConfig::close(NonZero::new(20).unwrap());
///
/// assert_eq!(config.length(), 20);
/// assert!((config.alpha() - 2.0 / 21.0).abs() < 1e-15);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }
}

impl EmaConfig {
    /// Span length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Value smoothed from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Smoothing factor `α = 2 / (length + 1)`.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        smoothing_factor(self.length)
    }

    /// EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the span length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    /// Sets the price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn build(self) -> EmaConfig {
        EmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn smoothing_factor(length: usize) -> f64 {
    2.0 / (length + 1) as f64
}

/// Bare exponential smoothing recurrence over plain values.
///
/// Seeded by the first value, no bias correction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Smoother {
    alpha: f64,
    current: Option<f64>,
}

impl Smoother {
    pub fn new(length: usize) -> Self {
        Self {
            alpha: smoothing_factor(length),
            current: None,
        }
    }

    #[inline]
    pub fn update(&mut self, value: f64) -> f64 {
        let next = match self.current {
            Some(previous) => self.alpha.mul_add(value - previous, previous),
            None => value,
        };
        self.current = Some(next);

        next
    }

    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.current
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (length + 1)`. Each value is computed as:
///
/// ```text
/// EMA = α × price + (1 − α) × prev_EMA
/// ```
///
/// The recurrence is seeded with the very first price and applies no
/// bias correction, so a value is available from the first bar onward.
/// Early values lean heavily on that seed; the trend and MACD rules
/// built on top of it depend on exactly this behaviour.
///
/// # Example
///
/// ```
/// use quantedge_signals::{Ema, EmaConfig};
/// use std::num::NonZero;
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
/// let mut ema = Ema::new(EmaConfig::close(NonZero::new(3).unwrap()));
///
/// // Seeded by the first close
/// assert_eq!(ema.compute(&Bar(4.0, 1)), Some(4.0));
///
/// // EMA(3) α = 0.5: 8 × 0.5 + 4 × 0.5 = 6.0
/// assert_eq!(ema.compute(&Bar(8.0, 2)), Some(6.0));
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
    smoother: Smoother,
    prev_close: Option<Price>,
    last_open_time: Option<Timestamp>,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            smoother: Smoother::new(config.length),
            prev_close: None,
            last_open_time: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Price> {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < ohlcv.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );

        let price = self.config.source.extract(ohlcv, self.prev_close);
        self.smoother.update(price);

        self.prev_close = Some(ohlcv.close());
        self.last_open_time = Some(ohlcv.open_time());

        self.value()
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.smoother.value()
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source)
    }
}

/// EMA of closing prices over `series`, defined from the first bar.
#[must_use]
pub fn ema_series<B: Ohlcv>(series: &Series<'_, B>, length: NonZero<usize>) -> IndicatorSeries {
    series.collect(Ema::new(EmaConfig::close(length)))
}
