use std::collections::BTreeMap;

use analysis_core::AnalysisError;
use serde::{Deserialize, Serialize};
use technical_analysis::IndicatorParams;

/// The five scoring categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Valuation,
    Quality,
    Growth,
    Momentum,
    Risk,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Valuation,
        Category::Quality,
        Category::Growth,
        Category::Momentum,
        Category::Risk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Valuation => "valuation",
            Category::Quality => "quality",
            Category::Growth => "growth",
            Category::Momentum => "momentum",
            Category::Risk => "risk",
        }
    }
}

/// Per-category weights for the composite. Weights need not sum to 1; a
/// category missing from the map has weight 0 and drops out of the average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Category, f64>", into = "BTreeMap<Category, f64>")]
pub struct Weights {
    weights: BTreeMap<Category, f64>,
}

impl Weights {
    pub fn new(weights: BTreeMap<Category, f64>) -> Result<Self, AnalysisError> {
        for (category, w) in &weights {
            if !w.is_finite() || *w < 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "weight for {} must be finite and non-negative, got {}",
                    category.as_str(),
                    w
                )));
            }
        }
        Ok(Self { weights })
    }

    pub fn equal() -> Self {
        Self {
            weights: Category::ALL.iter().map(|c| (*c, 1.0)).collect(),
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        self.weights.get(&category).copied().unwrap_or(0.0)
    }
}

impl Default for Weights {
    fn default() -> Self {
        let weights = [
            (Category::Valuation, 0.20),
            (Category::Quality, 0.25),
            (Category::Growth, 0.20),
            (Category::Momentum, 0.15),
            (Category::Risk, 0.20),
        ]
        .into_iter()
        .collect();
        Self { weights }
    }
}

impl TryFrom<BTreeMap<Category, f64>> for Weights {
    type Error = AnalysisError;

    fn try_from(weights: BTreeMap<Category, f64>) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<Weights> for BTreeMap<Category, f64> {
    fn from(w: Weights) -> Self {
        w.weights
    }
}

/// Everything `score_security` needs besides its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: Weights,
    /// Starting point of every category and the composite fallback.
    pub baseline: f64,
    pub indicators: IndicatorParams,
}

impl ScoringConfig {
    pub fn new(weights: Weights, baseline: f64, indicators: IndicatorParams) -> Result<Self, AnalysisError> {
        let config = Self {
            weights,
            baseline,
            indicators,
        };
        config.validate()?;
        Ok(config)
    }

    /// Weights are checked on deserialization; the baseline must sit inside the score range.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(0.0..=100.0).contains(&self.baseline) {
            return Err(AnalysisError::InvalidConfig(format!(
                "baseline must be within [0, 100], got {}",
                self.baseline
            )));
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            baseline: 50.0,
            indicators: IndicatorParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = Weights::default();
        assert_eq!(w.get(Category::Quality), 0.25);
        let total: f64 = Category::ALL.iter().map(|c| w.get(*c)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let map: BTreeMap<_, _> = [(Category::Risk, -0.1)].into_iter().collect();
        assert!(matches!(Weights::new(map), Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_weight_rejected_from_json() {
        let result: Result<Weights, _> = serde_json::from_str(r#"{"risk": -1.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_weight_is_zero() {
        let w: Weights = serde_json::from_str(r#"{"valuation": 2.0}"#).unwrap();
        assert_eq!(w.get(Category::Valuation), 2.0);
        assert_eq!(w.get(Category::Momentum), 0.0);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ScoringConfig = serde_json::from_str(r#"{"indicators": {"rsi_period": 9}}"#).unwrap();
        assert_eq!(config.baseline, 50.0);
        assert_eq!(config.weights, Weights::default());
        assert_eq!(config.indicators.rsi_period, 9);
    }

    #[test]
    fn test_baseline_out_of_range() {
        let err = ScoringConfig::new(Weights::default(), 120.0, IndicatorParams::default());
        assert!(err.is_err());
    }
}
