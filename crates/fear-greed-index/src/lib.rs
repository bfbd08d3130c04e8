//! Macro Fear & Greed composite over a basket of market series.
//!
//! Each indicator is scored independently and only indicators whose inputs
//! are present take part in the mean.

pub mod basket;
pub mod config;
pub mod indicators;


use std::collections::BTreeMap;

use analysis_core::{bucket, first_match, Bucket, Cond};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use basket::MarketBasket;
pub use config::{BasketSymbols, MacroConfig};
pub use indicators::MacroIndicator;

/// Score returned when no indicator could be computed.
pub const NEUTRAL_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,
    #[serde(rename = "Fear")]
    Fear,
    #[serde(rename = "Mild Fear")]
    MildFear,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Mild Greed")]
    MildGreed,
    #[serde(rename = "Greed")]
    Greed,
    #[serde(rename = "Extreme Greed")]
    ExtremeGreed,
}

const SENTIMENT: &[Bucket<SentimentLabel>] = &[
    bucket(Cond::Ge(80.0), SentimentLabel::ExtremeGreed),
    bucket(Cond::Ge(65.0), SentimentLabel::Greed),
    bucket(Cond::Ge(55.0), SentimentLabel::MildGreed),
    bucket(Cond::Ge(45.0), SentimentLabel::Neutral),
    bucket(Cond::Ge(35.0), SentimentLabel::MildFear),
    bucket(Cond::Ge(20.0), SentimentLabel::Fear),
    bucket(Cond::Any, SentimentLabel::ExtremeFear),
];

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        first_match(SENTIMENT, score).unwrap_or(SentimentLabel::ExtremeFear)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SentimentLabel::ExtremeFear => "Extreme Fear",
            SentimentLabel::Fear => "Fear",
            SentimentLabel::MildFear => "Mild Fear",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::MildGreed => "Mild Greed",
            SentimentLabel::Greed => "Greed",
            SentimentLabel::ExtremeGreed => "Extreme Greed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicatorResult {
    pub value: f64,
    pub score: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroCompositeResult {
    pub score: f64,
    pub label: SentimentLabel,
    pub indicators: BTreeMap<MacroIndicator, MacroIndicatorResult>,
    pub num_indicators: usize,
    /// Latest volatility index level, when the basket has it.
    pub volatility_index: Option<f64>,
}

/// Score every computable indicator and average them.
pub fn compute_macro_index(basket: &MarketBasket, config: &MacroConfig) -> MacroCompositeResult {
    let mut indicators = BTreeMap::new();

    for indicator in MacroIndicator::ALL {
        match indicator.measure(basket, config).filter(|v| v.is_finite()) {
            Some(value) => {
                indicators.insert(
                    indicator,
                    MacroIndicatorResult {
                        value,
                        score: indicator.score(value),
                        label: indicator.label().to_string(),
                    },
                );
            }
            None => debug!(indicator = indicator.name(), "inputs unavailable, indicator omitted"),
        }
    }

    let num_indicators = indicators.len();
    let score = if num_indicators == 0 {
        NEUTRAL_SCORE
    } else {
        let total: f64 = indicators.values().map(|r| r.score).sum();
        (total / num_indicators as f64).clamp(0.0, 100.0)
    };

    let volatility_index = basket
        .get(&config.symbols.volatility)
        .and_then(|s| s.last_close());

    MacroCompositeResult {
        score,
        label: SentimentLabel::from_score(score),
        indicators,
        num_indicators,
        volatility_index,
    }
}
