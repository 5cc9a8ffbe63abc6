// src/test_util.rs

use crate::{Ohlcv, Price, Timestamp};
use std::num::NonZero;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

#[derive(Clone, Copy, Debug)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub open_time: u64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume: 0.0,
            open_time: 0,
        }
    }

    pub fn at(mut self, open_time: u64) -> Self {
        self.open_time = open_time;
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }
}

/// Convenience: bar with just a close price and timestamp (OHLC all equal to close).
pub fn bar(close: f64, time: u64) -> Bar {
    Bar::new(close, close, close, close).at(time)
}

/// Close-only bars stamped `1..=n`.
pub fn bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .zip(1..)
        .map(|(&close, time)| bar(close, time))
        .collect()
}

/// Bars with explicit high/low around each close, stamped `1..=n`.
pub fn hl_bars(points: &[(f64, f64, f64)]) -> Vec<Bar> {
    points
        .iter()
        .zip(1..)
        .map(|(&(high, low, close), time)| Bar::new(close, high, low, close).at(time))
        .collect()
}

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap()
}

impl Ohlcv for Bar {
    fn open(&self) -> Price {
        self.open
    }
    fn high(&self) -> Price {
        self.high
    }
    fn low(&self) -> Price {
        self.low
    }
    fn close(&self) -> Price {
        self.close
    }
    fn open_time(&self) -> Timestamp {
        self.open_time
    }
    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Rally, one-bar crash, slow recovery, then a sharp final push.
///
/// At the last bar EMA(20) crosses above EMA(50) and MACD crosses above
/// its signal while RSI(14) is still oversold (29.6) and ADX(14) is 56.8.
/// The final bar trades double the usual volume.
pub fn rebound_bars() -> Vec<Bar> {
    let mut closes: Vec<f64> = (0..46).map(|i| 100.0 + 0.3 * f64::from(i)).collect();
    let mut close = closes[45] - 10.0;
    closes.push(close);
    for _ in 0..12 {
        close += 0.1;
        closes.push(close);
    }
    closes.push(close + 3.0);

    let last = closes.len() - 1;
    closes
        .iter()
        .zip(1..)
        .enumerate()
        .map(|(i, (&c, t))| {
            let volume = if i == last { 2_000.0 } else { 1_000.0 };
            Bar::new(c, c + 0.2, c - 0.2, c).at(t).with_volume(volume)
        })
        .collect()
}
