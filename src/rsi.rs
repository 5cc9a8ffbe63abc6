use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorSeries, Ohlcv, Price,
    PriceSource, Series, Timestamp, price_window::RollingSum,
};

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// # Example
///
/// ```
/// use quantedge_signals::RsiConfig;
/// use std::num::NonZero;
///
/// let config = RsiConfig::close(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }
}

impl RsiConfig {
    /// Averaging window (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// RSI on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Default for RsiConfig {
    /// RSI(14) on closing price.
    fn default() -> Self {
        Self {
            length: 14,
            source: PriceSource::Close,
        }
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct RsiConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = Some(length.get());
        self
    }

    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn build(self) -> RsiConfig {
        let length = self.length.expect("length is required");

        RsiConfig {
            length,
            source: self.source,
        }
    }
}

/// Relative Strength Index (RSI) over simple rolling means.
///
/// Measures the balance of recent gains and losses on a 0–100 scale.
/// Values above 70 are conventionally considered overbought; below 30,
/// oversold.
///
/// Gains and losses are averaged with a plain trailing mean over the
/// last `length` price changes (not Wilder's smoothing):
///
/// ```text
/// avg_gain = mean(max(Δ, 0))   over the window
/// avg_loss = mean(max(−Δ, 0))  over the window
/// RSI      = 100 − 100 / (1 + avg_gain / avg_loss)
/// ```
///
/// The first bar has no predecessor and contributes a zero change, so
/// the first value is produced at bar `length`.
///
/// Degenerate windows are defined explicitly: no losses gives 100, no
/// gains gives 0, and a perfectly flat window gives 50.
///
/// # Example
///
/// ```
/// use quantedge_signals::{Rsi, RsiConfig};
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
/// let mut rsi = Rsi::new(RsiConfig::close(NonZero::new(4).unwrap()));
///
/// assert_eq!(rsi.compute(&Bar(10.0, 1)), None);
/// assert_eq!(rsi.compute(&Bar(12.0, 2)), None);
/// assert_eq!(rsi.compute(&Bar(11.0, 3)), None);
///
/// // Changes: 0, +2, −1, +2 → avg_gain = 1, avg_loss = 0.25 → RSI = 80
/// assert_eq!(rsi.compute(&Bar(13.0, 4)), Some(80.0));
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
    gains: RollingSum,
    losses: RollingSum,
    prev_price: Option<Price>,
    prev_close: Option<Price>,
    current: Option<Price>,
    last_open_time: Option<Timestamp>,
    length_reciprocal: f64,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            gains: RollingSum::new(config.length),
            losses: RollingSum::new(config.length),
            prev_price: None,
            prev_close: None,
            current: None,
            last_open_time: None,
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / config.length as f64,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < ohlcv.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );

        let price = self.config.source.extract(ohlcv, self.prev_close);
        let (gain, loss) = self
            .prev_price
            .map_or((0.0, 0.0), |prev| Self::gain_and_loss(prev, price));

        self.gains.push(gain);
        self.losses.push(loss);

        self.prev_price = Some(price);
        self.prev_close = Some(ohlcv.close());
        self.last_open_time = Some(ohlcv.open_time());

        self.current = self
            .gains
            .non_negative_sum()
            .zip(self.losses.non_negative_sum())
            .map(|(gains, losses)| {
                Self::rsi_from_averages(
                    gains * self.length_reciprocal,
                    losses * self.length_reciprocal,
                )
            });

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Rsi {
    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        (gain, loss)
    }

    #[inline]
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 { 50.0 } else { 100.0 }
        } else if avg_gain == 0.0 {
            0.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.length, self.config.source)
    }
}

/// RSI of closing prices over `series`, `None` for the first `length - 1` bars.
#[must_use]
pub fn rsi_series<B: Ohlcv>(series: &Series<'_, B>, length: NonZero<usize>) -> IndicatorSeries {
    series.collect(Rsi::new(RsiConfig::close(length)))
}
