use analysis_core::{bucket, Cond, MetricKey, MetricSnapshot, RuleGroup, ScoreCard};
use serde::{Deserialize, Serialize};

use crate::category::CategoryScore;
use crate::config::Category;
use crate::valuation::fcf_yield;

// Higher risk score means a safer security.

const SHORT_INTEREST: RuleGroup = RuleGroup {
    name: "short_percent",
    buckets: &[
        bucket(Cond::Gt(30.0), -20.0),
        bucket(Cond::Gt(20.0), -15.0),
        bucket(Cond::Gt(10.0), -8.0),
        bucket(Cond::Gt(5.0), -3.0),
        bucket(Cond::Lt(2.0), 5.0),
    ],
};

const BETA: RuleGroup = RuleGroup {
    name: "beta",
    buckets: &[
        bucket(Cond::Gt(2.5), -20.0),
        bucket(Cond::Gt(2.0), -15.0),
        bucket(Cond::Gt(1.5), -8.0),
        bucket(Cond::Gt(1.2), -3.0),
        bucket(Cond::Closed(0.8, 1.2), 5.0),
        bucket(Cond::ClosedOpen(0.5, 0.8), 3.0),
        bucket(Cond::Lt(0.5), 0.0),
    ],
};

const LEVERAGE: RuleGroup = RuleGroup {
    name: "debt_to_equity",
    buckets: &[
        bucket(Cond::Gt(3.0), -15.0),
        bucket(Cond::Gt(2.0), -10.0),
        bucket(Cond::Gt(1.5), -5.0),
        bucket(Cond::Lt(0.5), 8.0),
    ],
};

const LIQUIDITY: RuleGroup = RuleGroup {
    name: "current_ratio",
    buckets: &[
        bucket(Cond::Lt(0.5), -12.0),
        bucket(Cond::Lt(1.0), -5.0),
        bucket(Cond::Gt(2.0), 5.0),
    ],
};

const PROFITABILITY: RuleGroup = RuleGroup {
    name: "profit_margin",
    buckets: &[
        bucket(Cond::Lt(0.0), -15.0),
        bucket(Cond::Lt(5.0), -5.0),
        bucket(Cond::Gt(15.0), 5.0),
    ],
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskInputs {
    pub short_percent: Option<f64>,
    pub beta: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub profit_margin: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub fcf_yield: Option<f64>,
}

impl RiskInputs {
    pub fn from_metrics(metrics: &MetricSnapshot) -> Self {
        Self {
            short_percent: metrics.get(MetricKey::ShortPercent),
            beta: metrics.get(MetricKey::Beta),
            debt_to_equity: metrics.get(MetricKey::DebtToEquity),
            current_ratio: metrics.get(MetricKey::CurrentRatio),
            profit_margin: metrics.get(MetricKey::ProfitMargin),
            free_cash_flow: metrics.get(MetricKey::FreeCashFlow),
            fcf_yield: fcf_yield(metrics),
        }
    }
}

pub fn score_risk(inputs: &RiskInputs, baseline: f64) -> CategoryScore {
    let mut card = ScoreCard::new(baseline);
    card.apply(&SHORT_INTEREST, inputs.short_percent);
    card.apply(&BETA, inputs.beta);
    card.apply(&LEVERAGE, inputs.debt_to_equity);
    card.apply(&LIQUIDITY, inputs.current_ratio);
    card.apply(&PROFITABILITY, inputs.profit_margin);

    if let Some(fcf) = inputs.free_cash_flow {
        if fcf < 0.0 {
            card.adjust("cash_burn", fcf, -10.0);
        } else if let Some(y) = inputs.fcf_yield.filter(|y| *y > 5.0) {
            card.adjust("fcf_yield", y, 5.0);
        }
    }

    CategoryScore::from_card(Category::Risk, card)
}
