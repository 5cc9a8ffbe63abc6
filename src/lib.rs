//! Technical indicators and a rule-based trading signal for Rust.
//!
//! Indicators accept any type implementing [`Ohlcv`] and come in two
//! forms. Streaming indicators ([`Sma`], [`Ema`], [`Rsi`], [`Macd`],
//! [`Adx`]) advance one bar per [`compute`](Sma::compute) call and
//! return `None` until enough history has been seen. Batch functions
//! ([`sma_series`], [`rsi_series`], ...) run the same indicators over a
//! validated [`Series`] and return values aligned with its bars.
//!
//! On top of the indicators sit the detectors ([`detect_trend`],
//! [`support_resistance`], [`analyze_volume`], [`detect_patterns`]) and
//! [`generate_signal`], which fuses them into one [`Signal`] for the
//! latest bar.
//!
//! ```
//! use quantedge_signals::{Action, PriceBar, SignalConfig, analyze};
//!
//! let bars: Vec<_> = (0..80u32)
//!     .map(|i| {
//!         let c = 1.10 + f64::from(i % 7) * 0.002;
//!         PriceBar::new(i.into(), c, c + 0.001, c - 0.001, c, 500.0)
//!     })
//!     .collect();
//!
//! let signal = analyze(&bars, &SignalConfig::default())?;
//! assert_eq!(signal.action(), Action::Hold);
//! # Ok::<(), quantedge_signals::Error>(())
//! ```
//!
//! Each indicator type exposes [`new`](Sma::new),
//! [`compute`](Sma::compute), and [`value`](Sma::value) as inherent
//! methods, no trait import needed. Import [`Indicator`] only for
//! generic code.

mod adx;
mod crossover;
mod ema;
mod error;
mod indicator;
mod levels;
mod macd;
mod ohlcv;
mod pattern;
mod price_source;
mod price_window;
mod ring_buffer;
mod rsi;
mod series;
mod signal;
mod sma;
mod trend;
mod volume;

pub use crate::error::{Error, Result};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Ohlcv, Price, PriceBar, Timestamp};
pub use crate::price_source::PriceSource;
pub use crate::series::{IndicatorPoint, IndicatorSeries, Series};

pub use crate::adx::{Adx, AdxConfig, AdxConfigBuilder, AdxSeries, AdxValue, adx_series};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder, ema_series};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdSeries, MacdValue, macd_series};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder, rsi_series};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder, sma_series};

pub use crate::crossover::{Bias, Cross, crossover, latest_crossover};
pub use crate::levels::{Levels, LevelsSeries, support_resistance, support_resistance_series};
pub use crate::pattern::{Pattern, detect_patterns};
pub use crate::trend::{Trend, TrendLabel, TrendStrength, detect_trend};
pub use crate::volume::{VolumeTrend, analyze_volume};

pub use crate::signal::{
    Action, Metrics, Signal, SignalConfig, SignalConfigBuilder, SignalStrength, analyze,
    generate_signal,
};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, kline: &impl Ohlcv) -> Option<$output> {
                <Self as Indicator>::compute(self, kline)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Price);
impl_indicator_methods!(Ema, EmaConfig, Price);
impl_indicator_methods!(Rsi, RsiConfig, Price);
impl_indicator_methods!(Macd, MacdConfig, MacdValue);
impl_indicator_methods!(Adx, AdxConfig, AdxValue);

#[cfg(test)]
mod test_util;
