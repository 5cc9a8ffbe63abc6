use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp or sequence number.
///
/// Must be strictly increasing between consecutive bars fed to an
/// indicator or collected into a [`Series`](crate::Series).
pub type Timestamp = u64;

/// OHLCV bar data used as input to all indicators.
///
/// Implement this on your own kline/candle type to avoid per-bar
/// conversion. Indicators accept `&impl Ohlcv` and extract the
/// configured [`PriceSource`](crate::PriceSource) internally.
///
/// # Example
///
/// ```
/// use quantedge_signals::{Ohlcv, Price, Timestamp};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64, v: f64,
///     ts: u64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn open_time(&self) -> Timestamp { self.ts }
///     fn volume(&self) -> f64 { self.v }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Bar open timestamp or sequence number.
    fn open_time(&self) -> Timestamp;

    /// Trade volume during the bar. Defaults to `0.0`.
    ///
    /// Override this for volume-dependent analysis. Indicators that
    /// don't use volume ignore this value.
    fn volume(&self) -> f64 {
        0.0
    }
}

/// Plain OHLCV bar for callers without their own kline type.
///
/// Immutable once built: fields are read through the [`Ohlcv`] accessors.
///
/// ```
/// use quantedge_signals::{Ohlcv, PriceBar};
///
/// let bar = PriceBar::new(1, 1.10, 1.12, 1.09, 1.11, 5_000.0);
/// assert_eq!(bar.close(), 1.11);
/// assert_eq!(bar.volume(), 5_000.0);
/// ```
#[derive(PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PriceBar {
    open_time: Timestamp,
    open: Price,
    high: Price,
    low: Price,
    close: Price,
    volume: f64,
}

impl PriceBar {
    #[must_use]
    pub fn new(
        open_time: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: f64,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Ohlcv for PriceBar {
    #[inline]
    fn open(&self) -> Price {
        self.open
    }

    #[inline]
    fn high(&self) -> Price {
        self.high
    }

    #[inline]
    fn low(&self) -> Price {
        self.low
    }

    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn open_time(&self) -> Timestamp {
        self.open_time
    }

    #[inline]
    fn volume(&self) -> f64 {
        self.volume
    }
}
