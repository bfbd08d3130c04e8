use analysis_core::{bucket, Cond, MetricKey, MetricSnapshot, RuleGroup, ScoreCard};
use serde::{Deserialize, Serialize};

use crate::category::CategoryScore;
use crate::config::Category;

const PROFIT_MARGIN: RuleGroup = RuleGroup {
    name: "profit_margin",
    buckets: &[
        bucket(Cond::Gt(30.0), 15.0),
        bucket(Cond::Gt(20.0), 10.0),
        bucket(Cond::Gt(10.0), 5.0),
        bucket(Cond::Gt(5.0), 2.0),
        bucket(Cond::Lt(0.0), -10.0),
    ],
};

const GROSS_MARGIN: RuleGroup = RuleGroup {
    name: "gross_margin",
    buckets: &[
        bucket(Cond::Gt(60.0), 10.0),
        bucket(Cond::Gt(40.0), 6.0),
        bucket(Cond::Gt(25.0), 2.0),
        bucket(Cond::Lt(15.0), -5.0),
    ],
};

const ROE: RuleGroup = RuleGroup {
    name: "roe",
    buckets: &[
        bucket(Cond::Gt(25.0), 12.0),
        bucket(Cond::Gt(18.0), 8.0),
        bucket(Cond::Gt(12.0), 4.0),
        bucket(Cond::Gt(8.0), 1.0),
        bucket(Cond::Lt(0.0), -8.0),
    ],
};

const ROA: RuleGroup = RuleGroup {
    name: "roa",
    buckets: &[
        bucket(Cond::Gt(15.0), 8.0),
        bucket(Cond::Gt(10.0), 5.0),
        bucket(Cond::Gt(5.0), 2.0),
        bucket(Cond::Lt(0.0), -5.0),
    ],
};

const CURRENT_RATIO: RuleGroup = RuleGroup {
    name: "current_ratio",
    buckets: &[
        bucket(Cond::Gt(2.5), 8.0),
        bucket(Cond::Gt(1.5), 5.0),
        bucket(Cond::Gt(1.0), 2.0),
        bucket(Cond::Lt(0.8), -8.0),
    ],
};

const DEBT_TO_EQUITY: RuleGroup = RuleGroup {
    name: "debt_to_equity",
    buckets: &[
        bucket(Cond::Lt(0.3), 10.0),
        bucket(Cond::Lt(0.6), 6.0),
        bucket(Cond::Lt(1.0), 2.0),
        bucket(Cond::Lt(1.5), -3.0),
        bucket(Cond::Lt(2.5), -8.0),
        bucket(Cond::Any, -12.0),
    ],
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityInputs {
    pub profit_margin: Option<f64>,
    pub gross_margin: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub current_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
}

impl QualityInputs {
    pub fn from_metrics(metrics: &MetricSnapshot) -> Self {
        Self {
            profit_margin: metrics.get(MetricKey::ProfitMargin),
            gross_margin: metrics.get(MetricKey::GrossMargin),
            roe: metrics.get(MetricKey::Roe),
            roa: metrics.get(MetricKey::Roa),
            current_ratio: metrics.get(MetricKey::CurrentRatio),
            debt_to_equity: metrics.get(MetricKey::DebtToEquity),
        }
    }
}

pub fn score_quality(inputs: &QualityInputs, baseline: f64) -> CategoryScore {
    let mut card = ScoreCard::new(baseline);
    card.apply(&PROFIT_MARGIN, inputs.profit_margin);
    card.apply(&GROSS_MARGIN, inputs.gross_margin);
    card.apply(&ROE, inputs.roe);
    card.apply(&ROA, inputs.roa);
    card.apply(&CURRENT_RATIO, inputs.current_ratio);
    card.apply(&DEBT_TO_EQUITY, inputs.debt_to_equity);
    CategoryScore::from_card(Category::Quality, card)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_quality_business() {
        let inputs = QualityInputs {
            profit_margin: Some(25.0),
            gross_margin: Some(65.0),
            roe: Some(30.0),
            roa: Some(12.0),
            current_ratio: Some(1.8),
            debt_to_equity: Some(0.4),
        };
        // 50 + 10 + 10 + 12 + 5 + 5 + 6 = 98
        assert_eq!(score_quality(&inputs, 50.0).score, 98.0);
    }

    #[test]
    fn test_distressed_business_floors_at_zero() {
        let inputs = QualityInputs {
            profit_margin: Some(-20.0),
            gross_margin: Some(5.0),
            roe: Some(-40.0),
            roa: Some(-8.0),
            current_ratio: Some(0.4),
            debt_to_equity: Some(4.0),
        };
        // 50 - 10 - 5 - 8 - 5 - 8 - 12 = 2
        assert_eq!(score_quality(&inputs, 50.0).score, 2.0);
        assert_eq!(score_quality(&inputs, 10.0).score, 0.0);
    }

    #[test]
    fn test_middling_values_leave_baseline() {
        let inputs = QualityInputs {
            profit_margin: Some(3.0),
            gross_margin: Some(20.0),
            roe: Some(5.0),
            roa: Some(2.0),
            current_ratio: Some(0.9),
            debt_to_equity: None,
        };
        let result = score_quality(&inputs, 50.0);
        assert_eq!(result.score, 50.0);
        assert!(result.hits.is_empty());
    }

    #[test]
    fn test_margin_boundaries_are_strict() {
        let at = |m: f64| {
            score_quality(
                &QualityInputs {
                    profit_margin: Some(m),
                    ..Default::default()
                },
                50.0,
            )
            .score
        };
        assert_eq!(at(30.0), 60.0);
        assert_eq!(at(30.01), 65.0);
        assert_eq!(at(0.0), 50.0);
    }
}
