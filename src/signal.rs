use std::{fmt::Display, num::NonZero};

use serde::{Deserialize, Serialize, ser::SerializeStruct};
use tracing::{debug, trace};

use crate::{
    Bias, Levels, Ohlcv, Pattern, Price, Result, Series, TrendLabel, TrendStrength, VolumeTrend,
    adx_series, analyze_volume, detect_patterns, detect_trend, latest_crossover, macd_series,
    rsi_series, support_resistance,
};

/// Points each satisfied confidence rule adds.
const RULE_WEIGHT: u8 = 20;

const fn length(n: usize) -> NonZero<usize> {
    match NonZero::new(n) {
        Some(n) => n,
        None => panic!("length must be non-zero"),
    }
}

/// Tunables of [`generate_signal`].
///
/// The default is the reference rule set: EMA 20/50 trend, RSI(14) with
/// 30/70 thresholds, ADX(14) strong above 25, 20-bar support and
/// resistance, volume surge at 1.5× its 20-bar mean, 20-bar pattern
/// lookback with 1% tolerance, 0.5% level proximity and a 2:1 reward to
/// risk. MACD is always 12/26/9.
///
/// Deserializing fills missing fields from the default and rejects the
/// same contradictions [`SignalConfigBuilder::build`] panics on.
///
/// ```
/// use quantedge_signals::SignalConfig;
/// use std::num::NonZero;
///
/// let config = SignalConfig::builder()
///     .rsi_length(NonZero::new(7).unwrap())
///     .build();
/// assert_eq!(config.rsi_length(), 7);
/// assert_eq!(config.long_length(), 50);
/// ```
#[derive(PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSignalConfig")]
pub struct SignalConfig {
    short_length: NonZero<usize>,
    long_length: NonZero<usize>,
    rsi_length: NonZero<usize>,
    oversold: f64,
    overbought: f64,
    adx_length: NonZero<usize>,
    strong_trend: f64,
    levels_window: NonZero<usize>,
    volume_window: NonZero<usize>,
    volume_surge: f64,
    pattern_lookback: usize,
    pattern_tolerance: f64,
    level_proximity: f64,
    reward_ratio: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            short_length: length(20),
            long_length: length(50),
            rsi_length: length(14),
            oversold: 30.0,
            overbought: 70.0,
            adx_length: length(14),
            strong_trend: 25.0,
            levels_window: length(20),
            volume_window: length(20),
            volume_surge: 1.5,
            pattern_lookback: 20,
            pattern_tolerance: 0.01,
            level_proximity: 0.005,
            reward_ratio: 2.0,
        }
    }
}

/// Wire form of [`SignalConfig`] before its cross-field checks.
#[derive(Deserialize)]
#[serde(default)]
struct UncheckedSignalConfig {
    short_length: NonZero<usize>,
    long_length: NonZero<usize>,
    rsi_length: NonZero<usize>,
    oversold: f64,
    overbought: f64,
    adx_length: NonZero<usize>,
    strong_trend: f64,
    levels_window: NonZero<usize>,
    volume_window: NonZero<usize>,
    volume_surge: f64,
    pattern_lookback: usize,
    pattern_tolerance: f64,
    level_proximity: f64,
    reward_ratio: f64,
}

impl Default for UncheckedSignalConfig {
    fn default() -> Self {
        let config = SignalConfig::default();
        Self {
            short_length: config.short_length,
            long_length: config.long_length,
            rsi_length: config.rsi_length,
            oversold: config.oversold,
            overbought: config.overbought,
            adx_length: config.adx_length,
            strong_trend: config.strong_trend,
            levels_window: config.levels_window,
            volume_window: config.volume_window,
            volume_surge: config.volume_surge,
            pattern_lookback: config.pattern_lookback,
            pattern_tolerance: config.pattern_tolerance,
            level_proximity: config.level_proximity,
            reward_ratio: config.reward_ratio,
        }
    }
}

impl TryFrom<UncheckedSignalConfig> for SignalConfig {
    type Error = &'static str;

    fn try_from(raw: UncheckedSignalConfig) -> std::result::Result<Self, Self::Error> {
        let config = Self {
            short_length: raw.short_length,
            long_length: raw.long_length,
            rsi_length: raw.rsi_length,
            oversold: raw.oversold,
            overbought: raw.overbought,
            adx_length: raw.adx_length,
            strong_trend: raw.strong_trend,
            levels_window: raw.levels_window,
            volume_window: raw.volume_window,
            volume_surge: raw.volume_surge,
            pattern_lookback: raw.pattern_lookback,
            pattern_tolerance: raw.pattern_tolerance,
            level_proximity: raw.level_proximity,
            reward_ratio: raw.reward_ratio,
        };
        config.validate()?;
        Ok(config)
    }
}

impl SignalConfig {
    #[must_use]
    pub fn builder() -> SignalConfigBuilder {
        SignalConfigBuilder(Self::default())
    }

    /// Short EMA length of the trend crossover.
    #[inline]
    #[must_use]
    pub fn short_length(&self) -> usize {
        self.short_length.get()
    }

    /// Long EMA length of the trend crossover.
    #[inline]
    #[must_use]
    pub fn long_length(&self) -> usize {
        self.long_length.get()
    }

    #[inline]
    #[must_use]
    pub fn rsi_length(&self) -> usize {
        self.rsi_length.get()
    }

    /// RSI below this votes bullish.
    #[inline]
    #[must_use]
    pub fn oversold(&self) -> f64 {
        self.oversold
    }

    /// RSI above this votes bearish.
    #[inline]
    #[must_use]
    pub fn overbought(&self) -> f64 {
        self.overbought
    }

    #[inline]
    #[must_use]
    pub fn adx_length(&self) -> usize {
        self.adx_length.get()
    }

    /// ADX strictly above this marks a strong trend.
    #[inline]
    #[must_use]
    pub fn strong_trend(&self) -> f64 {
        self.strong_trend
    }

    #[inline]
    #[must_use]
    pub fn levels_window(&self) -> usize {
        self.levels_window.get()
    }

    #[inline]
    #[must_use]
    pub fn volume_window(&self) -> usize {
        self.volume_window.get()
    }

    /// Multiple of mean volume that counts as a surge.
    #[inline]
    #[must_use]
    pub fn volume_surge(&self) -> f64 {
        self.volume_surge
    }

    #[inline]
    #[must_use]
    pub fn pattern_lookback(&self) -> usize {
        self.pattern_lookback
    }

    /// Largest relative gap between two matching peaks or troughs.
    #[inline]
    #[must_use]
    pub fn pattern_tolerance(&self) -> f64 {
        self.pattern_tolerance
    }

    /// Largest relative distance from price to a level that counts as near.
    #[inline]
    #[must_use]
    pub fn level_proximity(&self) -> f64 {
        self.level_proximity
    }

    /// Take-profit distance as a multiple of the stop distance.
    #[inline]
    #[must_use]
    pub fn reward_ratio(&self) -> f64 {
        self.reward_ratio
    }

    fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.short_length >= self.long_length {
            return Err("short length must be shorter than long length");
        }
        if self.oversold < self.overbought {
            Ok(())
        } else {
            Err("oversold threshold must be below overbought threshold")
        }
    }

    fn rsi_vote(&self, rsi: Option<Price>) -> Option<Bias> {
        match rsi? {
            rsi if rsi < self.oversold => Some(Bias::Bullish),
            rsi if rsi > self.overbought => Some(Bias::Bearish),
            _ => None,
        }
    }

    fn is_near(&self, price: Price, level: Price) -> bool {
        (price - level).abs() < self.level_proximity * price.abs()
    }
}

/// Builder for [`SignalConfig`], starting from the defaults.
pub struct SignalConfigBuilder(SignalConfig);

impl SignalConfigBuilder {
    /// EMA lengths of the trend crossover.
    #[must_use]
    pub fn trend_lengths(mut self, short: NonZero<usize>, long: NonZero<usize>) -> Self {
        self.0.short_length = short;
        self.0.long_length = long;
        self
    }

    #[must_use]
    pub fn rsi_length(mut self, length: NonZero<usize>) -> Self {
        self.0.rsi_length = length;
        self
    }

    #[must_use]
    pub fn rsi_thresholds(mut self, oversold: f64, overbought: f64) -> Self {
        self.0.oversold = oversold;
        self.0.overbought = overbought;
        self
    }

    #[must_use]
    pub fn adx_length(mut self, length: NonZero<usize>) -> Self {
        self.0.adx_length = length;
        self
    }

    #[must_use]
    pub fn strong_trend(mut self, threshold: f64) -> Self {
        self.0.strong_trend = threshold;
        self
    }

    #[must_use]
    pub fn levels_window(mut self, window: NonZero<usize>) -> Self {
        self.0.levels_window = window;
        self
    }

    #[must_use]
    pub fn volume(mut self, window: NonZero<usize>, surge: f64) -> Self {
        self.0.volume_window = window;
        self.0.volume_surge = surge;
        self
    }

    #[must_use]
    pub fn patterns(mut self, lookback: usize, tolerance: f64) -> Self {
        self.0.pattern_lookback = lookback;
        self.0.pattern_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn level_proximity(mut self, proximity: f64) -> Self {
        self.0.level_proximity = proximity;
        self
    }

    #[must_use]
    pub fn reward_ratio(mut self, ratio: f64) -> Self {
        self.0.reward_ratio = ratio;
        self
    }

    /// # Panics
    ///
    /// Panics if the short EMA is not shorter than the long one, or if
    /// the oversold threshold is not below the overbought one.
    #[must_use]
    pub fn build(self) -> SignalConfig {
        if let Err(reason) = self.0.validate() {
            panic!("{reason}");
        }
        self.0
    }
}

/// What to do at the latest bar, with exit levels for a position.
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub enum Action {
    Buy {
        stop_loss: Price,
        take_profit: Price,
    },
    Sell {
        stop_loss: Price,
        take_profit: Price,
    },
    #[default]
    Hold,
}

impl Action {
    #[must_use]
    pub fn stop_loss(&self) -> Option<Price> {
        match *self {
            Self::Buy { stop_loss, .. } | Self::Sell { stop_loss, .. } => Some(stop_loss),
            Self::Hold => None,
        }
    }

    #[must_use]
    pub fn take_profit(&self) -> Option<Price> {
        match *self {
            Self::Buy { take_profit, .. } | Self::Sell { take_profit, .. } => Some(take_profit),
            Self::Hold => None,
        }
    }

    /// Direction of the position, `None` on hold.
    #[must_use]
    pub fn bias(&self) -> Option<Bias> {
        match self {
            Self::Buy { .. } => Some(Bias::Bullish),
            Self::Sell { .. } => Some(Bias::Bearish),
            Self::Hold => None,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Buy { .. } => "buy",
            Self::Sell { .. } => "sell",
            Self::Hold => "hold",
        })
    }
}

/// `Strong` for any buy or sell, `Neutral` on hold.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStrength {
    Strong,
    #[default]
    Neutral,
}

impl Display for SignalStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Strong => "strong",
            Self::Neutral => "neutral",
        })
    }
}

/// Readings a [`Signal`] was derived from, `None` where history was short.
#[derive(PartialEq, Clone, Copy, Debug, Default, Serialize)]
pub struct Metrics {
    pub trend: TrendLabel,
    pub trend_strength: TrendStrength,
    pub rsi: Option<Price>,
    /// Latest MACD line.
    pub macd: Option<Price>,
    pub support: Option<Price>,
    pub resistance: Option<Price>,
    pub adx: Option<Price>,
    pub volume_trend: VolumeTrend,
}

/// A trading decision for the latest bar of a [`Series`].
#[derive(PartialEq, Clone, Debug)]
pub struct Signal {
    action: Action,
    entry_price: Price,
    confidence: u8,
    reasoning: Vec<String>,
    patterns: Vec<Pattern>,
    metrics: Metrics,
}

impl Signal {
    #[inline]
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    #[inline]
    #[must_use]
    pub fn strength(&self) -> SignalStrength {
        match self.action {
            Action::Hold => SignalStrength::Neutral,
            Action::Buy { .. } | Action::Sell { .. } => SignalStrength::Strong,
        }
    }

    /// Close of the latest bar.
    #[inline]
    #[must_use]
    pub fn entry_price(&self) -> Price {
        self.entry_price
    }

    #[inline]
    #[must_use]
    pub fn stop_loss(&self) -> Option<Price> {
        self.action.stop_loss()
    }

    #[inline]
    #[must_use]
    pub fn take_profit(&self) -> Option<Price> {
        self.action.take_profit()
    }

    /// Sum of satisfied rule weights: 0, 20, 40 or 60.
    #[inline]
    #[must_use]
    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    /// Human-readable grounds for the decision, in evaluation order.
    #[must_use]
    pub fn reasoning(&self) -> &[String] {
        &self.reasoning
    }

    /// Chart patterns found in the recent bars.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    #[inline]
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

impl Serialize for Signal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Signal", 9)?;
        state.serialize_field("action", &self.action.to_string())?;
        state.serialize_field("strength", &self.strength())?;
        state.serialize_field("entry_price", &self.entry_price)?;
        state.serialize_field("stop_loss", &self.stop_loss())?;
        state.serialize_field("take_profit", &self.take_profit())?;
        state.serialize_field("confidence", &self.confidence)?;
        state.serialize_field("reasoning", &self.reasoning)?;
        state.serialize_field("patterns", &self.patterns)?;
        state.serialize_field("metrics", &self.metrics)?;
        state.end()
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) @ {}",
            self.action,
            self.strength(),
            self.entry_price
        )?;
        if let (Some(stop_loss), Some(take_profit)) = (self.stop_loss(), self.take_profit()) {
            write!(f, ", stop {stop_loss}, target {take_profit}")?;
        }
        write!(f, ", confidence {}", self.confidence)?;
        for reason in &self.reasoning {
            write!(f, "\n- {reason}")?;
        }
        Ok(())
    }
}

/// Combines every detector into one decision for the latest bar.
///
/// A buy needs all four of: a fresh bullish EMA crossover, a strong
/// trend (ADX), an oversold RSI and a bullish MACD crossover on the same
/// bar. A sell mirrors it. Anything less is a hold. A buy stops out at
/// support and targets `reward_ratio` times that distance above entry;
/// a sell uses resistance the same way. Without the needed level the
/// decision falls back to hold.
///
/// Confidence adds 20 for each of: the trend agrees with the action,
/// RSI confirms it, and price sits within `level_proximity` of the
/// level the stop is placed at. A hold therefore scores 0.
///
/// Missing history never fails: indicators that are not yet defined
/// simply do not vote.
///
/// ```
/// use quantedge_signals::{Action, PriceBar, Series, SignalConfig, generate_signal};
///
/// let bars: Vec<_> = (0..30u32)
///     .map(|i| {
///         let c = 1.0 + f64::from(i) * 0.001;
///         PriceBar::new(i.into(), c, c + 0.0005, c - 0.0005, c, 1_000.0)
///     })
///     .collect();
/// let series = Series::new(&bars).unwrap();
///
/// let signal = generate_signal(&series, &SignalConfig::default());
/// assert_eq!(signal.action(), Action::Hold);
/// assert_eq!(signal.confidence(), 0);
/// assert_eq!(signal.stop_loss(), None);
/// ```
#[must_use]
pub fn generate_signal<B: Ohlcv>(series: &Series<'_, B>, config: &SignalConfig) -> Signal {
    let entry_price = series.latest().close();

    let trend = detect_trend(series, config.short_length, config.long_length).label;
    let rsi = rsi_series(series, config.rsi_length).latest();
    let macd = macd_series(series);
    let macd_vote = latest_crossover(&macd.macd, &macd.signal).map(Bias::from);
    let adx = adx_series(series, config.adx_length).adx.latest();
    let levels = support_resistance(series, config.levels_window);
    let volume_trend = analyze_volume(series, config.volume_window, config.volume_surge);
    let patterns = detect_patterns(series, config.pattern_lookback, config.pattern_tolerance);

    let trend_strength = TrendStrength::from_adx(adx, config.strong_trend);
    let rsi_vote = config.rsi_vote(rsi);

    trace!(
        bars = series.len(),
        %trend,
        %trend_strength,
        ?rsi,
        ?rsi_vote,
        macd = ?macd.macd.latest(),
        ?macd_vote,
        ?adx,
        support = ?levels.support,
        resistance = ?levels.resistance,
        %volume_trend,
        "computed signal inputs"
    );

    let mut reasoning = Vec::new();
    if let Some(adx) = adx
        && trend_strength == TrendStrength::Strong
    {
        reasoning.push(format!("Strong trend detected (ADX: {adx:.1})"));
    }

    let direction = match (trend, trend_strength, rsi_vote, macd_vote) {
        (
            TrendLabel::Bullish,
            TrendStrength::Strong,
            Some(Bias::Bullish),
            Some(Bias::Bullish),
        ) => Some(Bias::Bullish),
        (
            TrendLabel::Bearish,
            TrendStrength::Strong,
            Some(Bias::Bearish),
            Some(Bias::Bearish),
        ) => Some(Bias::Bearish),
        _ => None,
    };

    let action = direction.map_or(Action::Hold, |direction| {
        position(direction, entry_price, &levels, config.reward_ratio)
    });

    match action {
        Action::Buy { .. } => {
            reasoning.push("Strong buy signal: RSI oversold and MACD bullish crossover".into());
            if volume_trend == VolumeTrend::StrongBullish {
                reasoning.push("High volume confirming bullish move".into());
            }
        }
        Action::Sell { .. } => {
            reasoning.push("Strong sell signal: RSI overbought and MACD bearish crossover".into());
            if volume_trend == VolumeTrend::StrongBearish {
                reasoning.push("High volume confirming bearish move".into());
            }
        }
        Action::Hold => {}
    }

    for pattern in &patterns {
        reasoning.push(format!(
            "Price pattern detected: {} ({})",
            pattern.name(),
            pattern.bias()
        ));
    }

    let metrics = Metrics {
        trend,
        trend_strength,
        rsi,
        macd: macd.macd.latest(),
        support: levels.support,
        resistance: levels.resistance,
        adx,
        volume_trend,
    };

    let confidence = score(action, entry_price, &metrics, config, &mut reasoning);

    let signal = Signal {
        action,
        entry_price,
        confidence,
        reasoning,
        patterns,
        metrics,
    };

    debug!(
        action = %signal.action,
        confidence,
        %trend,
        ?adx,
        ?rsi,
        entry_price,
        "generated signal"
    );

    signal
}

/// Validates `bars` and generates a signal for the latest one.
///
/// # Errors
///
/// Returns an [`Error`](crate::Error) when `bars` is empty, out of
/// chronological order or holds a non-finite value.
pub fn analyze<B: Ohlcv>(bars: &[B], config: &SignalConfig) -> Result<Signal> {
    let series = Series::new(bars)?;
    Ok(generate_signal(&series, config))
}

fn position(direction: Bias, entry: Price, levels: &Levels, reward_ratio: f64) -> Action {
    match direction {
        Bias::Bullish => match levels.support {
            Some(support) => Action::Buy {
                stop_loss: support,
                take_profit: entry + (entry - support) * reward_ratio,
            },
            None => {
                debug!(entry, "buy downgraded to hold: support undefined");
                Action::Hold
            }
        },
        Bias::Bearish => match levels.resistance {
            Some(resistance) => Action::Sell {
                stop_loss: resistance,
                take_profit: entry - (resistance - entry) * reward_ratio,
            },
            None => {
                debug!(entry, "sell downgraded to hold: resistance undefined");
                Action::Hold
            }
        },
    }
}

/// Confidence of `action`, appending one reason per satisfied rule.
fn score(
    action: Action,
    entry: Price,
    metrics: &Metrics,
    config: &SignalConfig,
    reasoning: &mut Vec<String>,
) -> u8 {
    let mut confidence = 0;

    let trend_aligned = matches!(
        (action, metrics.trend),
        (Action::Buy { .. }, TrendLabel::Bullish) | (Action::Sell { .. }, TrendLabel::Bearish)
    );
    if trend_aligned {
        confidence += RULE_WEIGHT;
        reasoning.push("Trend aligned with signal".into());
    }

    match (action, config.rsi_vote(metrics.rsi)) {
        (Action::Buy { .. }, Some(Bias::Bullish)) => {
            confidence += RULE_WEIGHT;
            reasoning.push("RSI confirms oversold condition".into());
        }
        (Action::Sell { .. }, Some(Bias::Bearish)) => {
            confidence += RULE_WEIGHT;
            reasoning.push("RSI confirms overbought condition".into());
        }
        _ => {}
    }

    match action {
        Action::Buy { .. } if metrics.support.is_some_and(|s| config.is_near(entry, s)) => {
            confidence += RULE_WEIGHT;
            reasoning.push("Price near support level".into());
        }
        Action::Sell { .. } if metrics.resistance.is_some_and(|r| config.is_near(entry, r)) => {
            confidence += RULE_WEIGHT;
            reasoning.push("Price near resistance level".into());
        }
        _ => {}
    }

    confidence
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        Error,
        test_util::{Bar, bars, hl_bars, nz, rebound_bars},
    };

    fn signal(bars: &[Bar], config: &SignalConfig) -> Signal {
        let series = Series::new(bars).unwrap();
        generate_signal(&series, config)
    }

    mod buy {
        use super::*;

        #[test]
        fn rebound_after_crash_buys() {
            let signal = signal(&rebound_bars(), &SignalConfig::default());
            let entry = signal.entry_price();
            let support = signal.metrics().support.unwrap();

            assert_eq!(signal.strength(), SignalStrength::Strong);
            assert_eq!(
                signal.action(),
                Action::Buy {
                    stop_loss: support,
                    take_profit: entry + (entry - support) * 2.0,
                }
            );
            assert_eq!(signal.confidence(), 40);
        }

        #[test]
        fn reasoning_in_evaluation_order() {
            let signal = signal(&rebound_bars(), &SignalConfig::default());
            assert_eq!(
                signal.reasoning(),
                [
                    "Strong trend detected (ADX: 56.8)",
                    "Strong buy signal: RSI oversold and MACD bullish crossover",
                    "High volume confirming bullish move",
                    "Trend aligned with signal",
                    "RSI confirms oversold condition",
                ]
            );
        }

        #[test]
        fn wide_proximity_adds_support_rule() {
            let config = SignalConfig::builder().level_proximity(0.05).build();
            let signal = signal(&rebound_bars(), &config);
            assert_eq!(signal.confidence(), 60);
            assert_eq!(
                signal.reasoning().last().map(String::as_str),
                Some("Price near support level")
            );
        }

        #[test]
        fn metrics_carry_readings() {
            let signal = signal(&rebound_bars(), &SignalConfig::default());
            let metrics = signal.metrics();
            assert_eq!(metrics.trend, TrendLabel::Bullish);
            assert_eq!(metrics.trend_strength, TrendStrength::Strong);
            assert_eq!(metrics.volume_trend, VolumeTrend::StrongBullish);
            assert!(metrics.rsi.unwrap() < 30.0);
            assert!(metrics.adx.unwrap() > 25.0);
            assert!(metrics.macd.is_some());
            assert!(metrics.support.unwrap() < metrics.resistance.unwrap());
        }
    }

    mod hold {
        use super::*;

        #[test]
        fn single_bar_holds_with_empty_metrics() {
            let signal = signal(&bars(&[1.25]), &SignalConfig::default());

            assert_eq!(signal.action(), Action::Hold);
            assert_eq!(signal.strength(), SignalStrength::Neutral);
            assert_eq!(signal.entry_price(), 1.25);
            assert_eq!(signal.confidence(), 0);
            assert!(signal.reasoning().is_empty());

            let metrics = signal.metrics();
            assert_eq!(metrics.trend, TrendLabel::Neutral);
            assert_eq!(metrics.trend_strength, TrendStrength::Weak);
            assert_eq!(metrics.rsi, None);
            assert_eq!(metrics.adx, None);
            assert_eq!(metrics.support, None);
            assert_eq!(metrics.volume_trend, VolumeTrend::Neutral);
        }

        #[test]
        fn partial_confirmation_holds() {
            // Same rebound, but RSI must now read below 20 to vote
            let config = SignalConfig::builder().rsi_thresholds(20.0, 80.0).build();
            let signal = signal(&rebound_bars(), &config);

            assert_eq!(signal.action(), Action::Hold);
            assert_eq!(signal.stop_loss(), None);
            assert_eq!(signal.take_profit(), None);
            assert_eq!(signal.confidence(), 0);
            // Strong trend is still reported
            assert_eq!(signal.reasoning(), ["Strong trend detected (ADX: 56.8)"]);
        }

        #[test]
        fn missing_support_downgrades_buy() {
            let config = SignalConfig::builder().levels_window(nz(100)).build();
            let signal = signal(&rebound_bars(), &config);
            assert_eq!(signal.action(), Action::Hold);
            assert_eq!(signal.metrics().support, None);
        }

        #[test]
        fn flat_market_holds() {
            let points = vec![(1.1, 0.9, 1.0); 80];
            let signal = signal(&hl_bars(&points), &SignalConfig::default());
            assert_eq!(signal.action(), Action::Hold);
            assert_eq!(signal.metrics().rsi, Some(50.0));
            assert_eq!(signal.metrics().adx, None);
        }
    }

    mod patterns {
        use super::*;

        #[test]
        fn each_pattern_adds_a_reason() {
            let mut points = vec![(101.0, 99.0, 100.0); 30];
            points[15].0 = 110.0;
            points[24].0 = 110.0;
            let signal = signal(&hl_bars(&points), &SignalConfig::default());

            assert_eq!(signal.patterns(), [Pattern::DoubleTop]);
            // The two spikes also read as a one-sided ADX trend
            assert_eq!(
                signal.reasoning(),
                [
                    "Strong trend detected (ADX: 100.0)",
                    "Price pattern detected: Double Top (bearish)",
                ]
            );
            assert_eq!(signal.action(), Action::Hold);
        }
    }

    mod config {
        use super::*;

        #[test]
        fn defaults() {
            let config = SignalConfig::default();
            assert_eq!(config.short_length(), 20);
            assert_eq!(config.long_length(), 50);
            assert_eq!(config.rsi_length(), 14);
            assert_eq!((config.oversold(), config.overbought()), (30.0, 70.0));
            assert_eq!(config.adx_length(), 14);
            assert_eq!(config.strong_trend(), 25.0);
            assert_eq!(config.levels_window(), 20);
            assert_eq!(config.volume_window(), 20);
            assert_eq!(config.volume_surge(), 1.5);
            assert_eq!(config.pattern_lookback(), 20);
            assert_eq!(config.pattern_tolerance(), 0.01);
            assert_eq!(config.level_proximity(), 0.005);
            assert_eq!(config.reward_ratio(), 2.0);
        }

        #[test]
        fn partial_json_fills_defaults() {
            let config: SignalConfig =
                serde_json::from_str(r#"{"rsi_length": 7, "reward_ratio": 3.0}"#).unwrap();
            assert_eq!(config.rsi_length(), 7);
            assert_eq!(config.reward_ratio(), 3.0);
            assert_eq!(config.long_length(), 50);
        }

        #[test]
        fn zero_length_is_rejected() {
            let result = serde_json::from_str::<SignalConfig>(r#"{"adx_length": 0}"#);
            assert!(result.is_err());
        }

        #[test]
        fn json_with_inverted_thresholds_is_rejected() {
            let error =
                serde_json::from_str::<SignalConfig>(r#"{"oversold": 80, "overbought": 70}"#)
                    .unwrap_err();
            assert!(
                error
                    .to_string()
                    .contains("oversold threshold must be below overbought threshold")
            );
        }

        #[test]
        fn json_with_inverted_trend_lengths_is_rejected() {
            // Only short is given: 60 against the default long of 50
            let error = serde_json::from_str::<SignalConfig>(r#"{"short_length": 60}"#)
                .unwrap_err();
            assert!(
                error
                    .to_string()
                    .contains("short length must be shorter than long length")
            );
        }

        #[test]
        fn json_round_trips_through_checks() {
            let config = SignalConfig::builder().rsi_thresholds(20.0, 80.0).build();
            let json = serde_json::to_string(&config).unwrap();
            assert_eq!(serde_json::from_str::<SignalConfig>(&json).unwrap(), config);
        }

        #[test]
        #[should_panic(expected = "short length must be shorter than long length")]
        fn rejects_inverted_trend_lengths() {
            let _ = SignalConfig::builder()
                .trend_lengths(nz(50), nz(20))
                .build();
        }

        #[test]
        #[should_panic(expected = "oversold threshold must be below overbought threshold")]
        fn rejects_inverted_thresholds() {
            let _ = SignalConfig::builder().rsi_thresholds(70.0, 30.0).build();
        }
    }

    mod output {
        use super::*;

        #[test]
        fn serializes_flat_record() {
            let signal = signal(&bars(&[1.25]), &SignalConfig::default());
            let json = serde_json::to_value(&signal).unwrap();

            assert_eq!(json["action"], "hold");
            assert_eq!(json["strength"], "neutral");
            assert_eq!(json["entry_price"], 1.25);
            assert!(json["stop_loss"].is_null());
            assert!(json["take_profit"].is_null());
            assert_eq!(json["confidence"], 0);
            assert_eq!(json["metrics"]["trend"], "neutral");
            assert_eq!(json["metrics"]["volume_trend"], "neutral");
            assert!(json["metrics"]["rsi"].is_null());
        }

        #[test]
        fn display_lists_reasons() {
            let signal = signal(&rebound_bars(), &SignalConfig::default());
            let text = signal.to_string();
            assert!(text.starts_with("buy (strong) @ "));
            assert!(text.contains(", confidence 40"));
            assert!(text.ends_with("\n- RSI confirms oversold condition"));
        }

        #[test]
        fn action_accessors() {
            let buy = Action::Buy {
                stop_loss: 1.0,
                take_profit: 3.0,
            };
            assert_eq!(buy.stop_loss(), Some(1.0));
            assert_eq!(buy.take_profit(), Some(3.0));
            assert_eq!(buy.bias(), Some(Bias::Bullish));
            assert_eq!(Action::Hold.bias(), None);
            assert_eq!(Action::Hold.to_string(), "hold");
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn analyze_rejects_empty_input() {
            let bars: Vec<Bar> = Vec::new();
            assert_eq!(
                analyze(&bars, &SignalConfig::default()),
                Err(Error::EmptySeries)
            );
        }

        #[test]
        fn analyze_matches_generate_signal() {
            let bars = rebound_bars();
            let config = SignalConfig::default();
            assert_eq!(analyze(&bars, &config), Ok(signal(&bars, &config)));
        }
    }
}
