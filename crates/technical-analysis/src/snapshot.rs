use analysis_core::stats::trailing_return;
use analysis_core::PriceSeries;
use serde::{Deserialize, Serialize};

use crate::indicators::{annualized_volatility, atr, bollinger_bands, macd, rsi, sma};

/// Window lengths used when reducing a price series to its latest indicator
/// values. Every field falls back to its default when omitted from config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub short_ma: usize,
    pub long_ma: usize,
    /// Trailing window (in bars) for the period return; 63 is one quarter.
    pub return_lookback: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_width: f64,
    pub atr_period: usize,
    pub trading_days: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            short_ma: 50,
            long_ma: 200,
            return_lookback: 63,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_width: 2.0,
            atr_period: 14,
            trading_days: 252.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Latest value of each indicator. A field is `None` when the series is too
/// short to fill its window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub sample_size: usize,
    pub last_close: Option<f64>,
    pub rsi: Option<f64>,
    /// Short moving average (50 bars by default).
    pub ma_short: Option<f64>,
    /// Long moving average (200 bars by default).
    pub ma_long: Option<f64>,
    /// Percent return over `return_lookback` bars.
    pub period_return: Option<f64>,
    pub macd: Option<MacdPoint>,
    pub bollinger: Option<BandPoint>,
    pub atr: Option<f64>,
    pub volatility: Option<f64>,
}

impl TechnicalSnapshot {
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Self {
        let closes = series.closes();

        let macd_point = {
            let result = macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
            match (result.macd_line.last(), result.signal_line.last(), result.histogram.last()) {
                (Some(&macd), Some(&signal), Some(&histogram)) => Some(MacdPoint { macd, signal, histogram }),
                _ => None,
            }
        };

        let band_point = {
            let bands = bollinger_bands(&closes, params.bollinger_period, params.bollinger_width);
            match (bands.upper.last(), bands.middle.last(), bands.lower.last()) {
                (Some(&upper), Some(&middle), Some(&lower)) => Some(BandPoint { upper, middle, lower }),
                _ => None,
            }
        };

        Self {
            sample_size: closes.len(),
            last_close: series.last_close(),
            rsi: rsi(&closes, params.rsi_period).last().copied(),
            ma_short: sma(&closes, params.short_ma).last().copied(),
            ma_long: sma(&closes, params.long_ma).last().copied(),
            period_return: trailing_return(&closes, params.return_lookback),
            macd: macd_point,
            bollinger: band_point,
            atr: atr(series.bars(), params.atr_period).last().copied(),
            volatility: annualized_volatility(&closes, params.trading_days),
        }
    }
}
