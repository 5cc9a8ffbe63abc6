use crate::{Ohlcv, Price, PriceSource, Timestamp, ring_buffer::RingBuffer};

/// Trailing window of plain values with a running sum.
#[derive(Clone, Debug)]
pub(crate) struct RollingSum {
    buffer: RingBuffer,
    /// Maintained incrementally via add/subtract, may accumulate FP
    /// rounding drift over very long runs.
    sum: Price,
    /// Non-zero values currently in the window.
    non_zero: usize,
}

impl RollingSum {
    pub fn new(size: usize) -> Self {
        Self {
            buffer: RingBuffer::new(size),
            sum: 0.0,
            non_zero: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, value: Price) {
        if let Some(old) = self.buffer.push(value) {
            self.sum -= old;
            if old != 0.0 {
                self.non_zero -= 1;
            }
        }
        self.sum += value;
        if value != 0.0 {
            self.non_zero += 1;
        }
    }

    /// Window sum, exactly `0.0` when every value in it is zero.
    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.buffer
            .is_ready()
            .then_some(if self.non_zero == 0 { 0.0 } else { self.sum })
    }

    /// Sum of a window holding non-negative values only.
    ///
    /// Clamps the drift that could otherwise push the sum a few ulps
    /// below zero.
    #[inline]
    pub fn non_negative_sum(&self) -> Option<Price> {
        self.sum().map(|sum| sum.max(0.0))
    }
}

/// Trailing window over a [`PriceSource`] extracted from each bar.
#[derive(Clone, Debug)]
pub(crate) struct PriceWindow {
    values: RollingSum,
    /// Close of the last bar seen, becomes `prev_close` for `TrueRange`.
    prev_close: Option<Price>,
    source: PriceSource,
    last_open_time: Option<Timestamp>,
}

impl PriceWindow {
    pub fn new(size: usize, source: PriceSource) -> Self {
        Self {
            values: RollingSum::new(size),
            prev_close: None,
            source,
            last_open_time: None,
        }
    }

    #[inline]
    pub fn add(&mut self, ohlcv: &impl Ohlcv) {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < ohlcv.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );

        let price = self.source.extract(ohlcv, self.prev_close);

        self.values.push(price);
        self.prev_close = Some(ohlcv.close());
        self.last_open_time = Some(ohlcv.open_time());
    }

    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.values.sum()
    }
}
