use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    /// Bar where every price field equals `close`. Handy for close-only feeds.
    pub fn flat(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }
}

/// Ordered price history: dates strictly increasing, all prices finite.
///
/// The invariant is checked on construction and on deserialization, so every
/// indicator downstream can index from the tail without re-validating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bar>", into = "Vec<Bar>")]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        for (i, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close, bar.volume];
            if prices.iter().any(|v| !v.is_finite()) {
                return Err(AnalysisError::MalformedInput(format!(
                    "non-finite value in bar {} ({})",
                    i, bar.date
                )));
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(AnalysisError::MalformedInput(format!(
                    "bar dates must be strictly increasing: {} follows {}",
                    bar.date,
                    bars[i - 1].date
                )));
            }
        }
        Ok(Self { bars })
    }

    /// Build a daily series of flat bars starting at `start`, one day apart.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self, AnalysisError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::flat(start + Duration::days(i as i64), c))
            .collect();
        Self::new(bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }
}

impl TryFrom<Vec<Bar>> for PriceSeries {
    type Error = AnalysisError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<Bar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let bars = vec![Bar::flat(day(2), 10.0), Bar::flat(day(2), 11.0)];
        assert!(matches!(
            PriceSeries::new(bars),
            Err(AnalysisError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_order_dates() {
        let bars = vec![Bar::flat(day(3), 10.0), Bar::flat(day(2), 11.0)];
        assert!(PriceSeries::new(bars).is_err());
    }

    #[test]
    fn test_rejects_non_finite_prices() {
        let bars = vec![Bar::flat(day(1), f64::NAN)];
        assert!(PriceSeries::new(bars).is_err());
    }

    #[test]
    fn test_from_closes() {
        let series = PriceSeries::from_closes(day(1), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last_close(), Some(3.0));
        assert_eq!(series.bars()[2].date, day(3));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"[
            {"date": "2024-01-02", "open": 1, "high": 1, "low": 1, "close": 1},
            {"date": "2024-01-01", "open": 1, "high": 1, "low": 1, "close": 1}
        ]"#;
        assert!(serde_json::from_str::<PriceSeries>(json).is_err());

        let json = r#"[{"date": "2024-01-01", "open": 1, "high": 2, "low": 0.5, "close": 1.5, "volume": 100}]"#;
        let series: PriceSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.last_close(), Some(1.5));
    }
}
