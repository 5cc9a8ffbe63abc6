use crate::Ohlcv;

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Parameters of an [`Indicator`].
///
/// Configs are plain values. Two indicators built from equal configs
/// produce identical output for the same bars, so a config also works as
/// a cache key.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Finishes the config.
    ///
    /// Panics when the parameters contradict each other, e.g. a MACD fast
    /// length that is not shorter than its slow length.
    #[must_use]
    fn build(self) -> Config;
}

/// Incremental indicator fed one closed bar at a time.
///
/// Each [`compute`](Indicator::compute) call folds one bar into the
/// indicator's state in constant time. Output stays `None` during
/// warm-up, never an error. The batch `*_series` functions are thin
/// loops over this trait.
///
/// # Example
///
/// ```
/// use quantedge_signals::{Sma, SmaConfig, Indicator};
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
/// let mut sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
///
/// assert_eq!(sma.compute(&Bar(10.0, 1)), None);
/// assert_eq!(sma.compute(&Bar(20.0, 2)), None);
/// assert_eq!(sma.compute(&Bar(30.0, 3)), Some(20.0));
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// [`Price`](crate::Price) for single-line indicators, a value type
    /// for multi-line ones such as MACD and ADX.
    type Output: Send + Sync + Display + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Feeds the next bar and returns the updated indicator value,
    /// or `None` if the window is not yet filled.
    ///
    /// Bars must arrive with strictly increasing `open_time`.
    fn compute(&mut self, kline: &impl Ohlcv) -> Option<Self::Output>;

    /// Last output of [`compute`](Indicator::compute).
    fn value(&self) -> Option<Self::Output>;
}
