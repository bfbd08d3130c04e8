use std::collections::BTreeMap;

use analysis_core::PriceSeries;
use serde::{Deserialize, Serialize};

/// Price histories keyed by ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketBasket {
    series: BTreeMap<String, PriceSeries>,
}

impl MarketBasket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: impl Into<String>, series: PriceSeries) -> Self {
        self.insert(symbol, series);
        self
    }

    pub fn insert(&mut self, symbol: impl Into<String>, series: PriceSeries) {
        self.series.insert(symbol.into(), series);
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.series.get(symbol)
    }

    /// Closing prices of `symbol`, only when at least `min_len` are available.
    pub fn closes(&self, symbol: &str, min_len: usize) -> Option<Vec<f64>> {
        self.get(symbol)
            .filter(|s| s.len() >= min_len.max(1))
            .map(|s| s.closes())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
