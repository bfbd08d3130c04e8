use analysis_core::{bucket, Cond, MetricKey, MetricSnapshot, RuleGroup, ScoreCard};
use serde::{Deserialize, Serialize};

use crate::category::CategoryScore;
use crate::config::Category;

const REVENUE_GROWTH: RuleGroup = RuleGroup {
    name: "revenue_growth",
    buckets: &[
        bucket(Cond::Gt(50.0), 18.0),
        bucket(Cond::Gt(30.0), 14.0),
        bucket(Cond::Gt(20.0), 10.0),
        bucket(Cond::Gt(10.0), 6.0),
        bucket(Cond::Gt(5.0), 2.0),
        bucket(Cond::Gt(0.0), 0.0),
        bucket(Cond::Gt(-5.0), -5.0),
        bucket(Cond::Any, -12.0),
    ],
};

const EARNINGS_GROWTH: RuleGroup = RuleGroup {
    name: "earnings_growth",
    buckets: &[
        bucket(Cond::Gt(50.0), 18.0),
        bucket(Cond::Gt(30.0), 14.0),
        bucket(Cond::Gt(20.0), 10.0),
        bucket(Cond::Gt(10.0), 6.0),
        bucket(Cond::Gt(0.0), 2.0),
        bucket(Cond::Gt(-10.0), -5.0),
        bucket(Cond::Any, -12.0),
    ],
};

const BALANCED_BONUS: f64 = 8.0;
const LEVERAGE_BONUS: f64 = 5.0;
const LAGGING_PENALTY: f64 = -5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthInputs {
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
}

impl GrowthInputs {
    pub fn from_metrics(metrics: &MetricSnapshot) -> Self {
        Self {
            revenue_growth: metrics.get(MetricKey::RevenueGrowth),
            earnings_growth: metrics.get(MetricKey::EarningsGrowth),
        }
    }
}

pub fn score_growth(inputs: &GrowthInputs, baseline: f64) -> CategoryScore {
    let mut card = ScoreCard::new(baseline);
    card.apply(&REVENUE_GROWTH, inputs.revenue_growth);
    card.apply(&EARNINGS_GROWTH, inputs.earnings_growth);

    if let (Some(rev), Some(eps)) = (inputs.revenue_growth, inputs.earnings_growth) {
        if rev > 10.0 && eps > 10.0 {
            card.adjust("balanced_growth", rev.min(eps), BALANCED_BONUS);
        }
        if rev > 0.0 {
            // earnings outpacing revenue means margins are expanding
            if eps > rev {
                card.adjust("operating_leverage", eps - rev, LEVERAGE_BONUS);
            } else if eps < rev * 0.5 {
                card.adjust("earnings_lagging_revenue", eps - rev, LAGGING_PENALTY);
            }
        }
    }

    CategoryScore::from_card(Category::Growth, card)
}
