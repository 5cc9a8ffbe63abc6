use crate::{Ohlcv, Price};

use std::fmt::{Debug, Display};

/// Value extracted from an [`Ohlcv`] bar before feeding into an
/// indicator.
///
/// Each single-input indicator is configured with a `PriceSource` that
/// determines which value (or derived value) to compute on.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    #[default]
    Close,
    /// Traded volume.
    Volume,
    /// True range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
    ///
    /// On the first bar (no previous close), falls back to `high - low`.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    #[inline]
    pub(crate) fn extract(self, ohlcv: &impl Ohlcv, prev_close: Option<Price>) -> Price {
        match self {
            Self::Open => ohlcv.open(),
            Self::High => ohlcv.high(),
            Self::Low => ohlcv.low(),
            Self::Close => ohlcv.close(),
            Self::Volume => ohlcv.volume(),
            Self::TrueRange => true_range(ohlcv, prev_close),
        }
    }
}

#[inline]
pub(crate) fn true_range(ohlcv: &impl Ohlcv, prev_close: Option<Price>) -> Price {
    let hl = (ohlcv.high() - ohlcv.low()).abs();

    match prev_close {
        Some(prev_close) => {
            let hc = (ohlcv.high() - prev_close).abs();
            let lc = (ohlcv.low() - prev_close).abs();
            hl.max(hc).max(lc)
        }
        None => hl,
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::Bar;

    fn bar() -> Bar {
        Bar::new(10.0, 30.0, 5.0, 20.0).with_volume(1_500.0)
    }

    #[test]
    fn extract_open() {
        assert_eq!(PriceSource::Open.extract(&bar(), None), 10.0);
    }

    #[test]
    fn extract_high() {
        assert_eq!(PriceSource::High.extract(&bar(), None), 30.0);
    }

    #[test]
    fn extract_low() {
        assert_eq!(PriceSource::Low.extract(&bar(), None), 5.0);
    }

    #[test]
    fn extract_close() {
        assert_eq!(PriceSource::Close.extract(&bar(), None), 20.0);
    }

    #[test]
    fn extract_volume() {
        assert_eq!(PriceSource::Volume.extract(&bar(), None), 1_500.0);
    }

    // TrueRange: max(high - low, |high - prev_close|, |low - prev_close|)

    #[test]
    fn true_range_without_prev_close_falls_back_to_hl() {
        assert_eq!(PriceSource::TrueRange.extract(&bar(), None), 25.0);
    }

    #[test]
    fn true_range_hl_wins() {
        // hl = 25, |30 - 15| = 15, |5 - 15| = 10
        assert_eq!(PriceSource::TrueRange.extract(&bar(), Some(15.0)), 25.0);
    }

    #[test]
    fn true_range_high_vs_prev_close_wins() {
        // Gap up: hl = 25, |30 - (-10)| = 40, |5 - (-10)| = 15
        assert_eq!(PriceSource::TrueRange.extract(&bar(), Some(-10.0)), 40.0);
    }

    #[test]
    fn true_range_low_vs_prev_close_wins() {
        // Gap down: hl = 25, |30 - 50| = 20, |5 - 50| = 45
        assert_eq!(PriceSource::TrueRange.extract(&bar(), Some(50.0)), 45.0);
    }
}
