#![allow(dead_code)]

use quantedge_signals::{IndicatorSeries, Ohlcv, Price, Series, Timestamp};
use serde::{Deserialize, de::DeserializeOwned};

/// Daily OHLCV bar parsed from the fixture CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv for RefBar {
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

/// Reference value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub open_time: u64,
    pub expected: f64,
}

/// Reference MACD value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefMacdValue {
    pub open_time: u64,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Reference ADX value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefAdxValue {
    pub open_time: u64,
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

const OHLCV_PATH: &str = "tests/fixtures/data/random-walk-1d.csv";

/// Load the reference OHLCV bars (400 synthetic daily bars).
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load single-value reference data (SMA, EMA, RSI).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load MACD reference data (line, signal, histogram).
pub fn load_macd_ref(path: &str) -> Vec<RefMacdValue> {
    load_records(path, "invalid MACD reference record")
}

/// Load ADX reference data (ADX, +DI, −DI).
pub fn load_adx_ref(path: &str) -> Vec<RefAdxValue> {
    load_records(path, "invalid ADX reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert a batch series agrees with values streamed bar by bar.
pub fn assert_series_matches(
    name: &str,
    bars: &[RefBar],
    streamed: &[Option<f64>],
    batch: &IndicatorSeries,
) {
    assert_eq!(batch.len(), bars.len(), "{name}: series length");

    for (i, ((bar, &expected), point)) in bars.iter().zip(streamed).zip(batch).enumerate() {
        assert_eq!(point.open_time, bar.open_time, "{name}: timestamp at bar {i}");
        assert_eq!(point.value, expected, "{name}: value at bar {i}");
    }
}

/// Validated view over the reference bars.
pub fn reference_series(bars: &[RefBar]) -> Series<'_, RefBar> {
    Series::new(bars).expect("reference bars are valid")
}

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
