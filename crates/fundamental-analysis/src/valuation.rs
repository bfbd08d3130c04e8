use analysis_core::{bucket, Cond, MetricKey, MetricSnapshot, RuleGroup, ScoreCard};
use serde::{Deserialize, Serialize};

use crate::category::CategoryScore;
use crate::config::Category;

const PE: RuleGroup = RuleGroup {
    name: "pe_ratio",
    buckets: &[
        bucket(Cond::Lt(10.0), 20.0),
        bucket(Cond::Lt(15.0), 15.0),
        bucket(Cond::Lt(20.0), 10.0),
        bucket(Cond::Lt(25.0), 5.0),
        bucket(Cond::Lt(35.0), -5.0),
        bucket(Cond::Lt(50.0), -10.0),
        bucket(Cond::Any, -15.0),
    ],
};

const PEG: RuleGroup = RuleGroup {
    name: "peg_ratio",
    buckets: &[
        bucket(Cond::Lt(0.75), 15.0),
        bucket(Cond::Lt(1.0), 10.0),
        bucket(Cond::Lt(1.5), 5.0),
        bucket(Cond::Lt(2.0), 0.0),
        bucket(Cond::Lt(3.0), -5.0),
        bucket(Cond::Any, -10.0),
    ],
};

const FCF_YIELD: RuleGroup = RuleGroup {
    name: "fcf_yield",
    buckets: &[
        bucket(Cond::Gt(10.0), 15.0),
        bucket(Cond::Gt(7.0), 12.0),
        bucket(Cond::Gt(5.0), 8.0),
        bucket(Cond::Gt(3.0), 4.0),
        bucket(Cond::Gt(0.0), 0.0),
        bucket(Cond::Any, -10.0),
    ],
};

const EV_EBITDA: RuleGroup = RuleGroup {
    name: "ev_to_ebitda",
    buckets: &[
        bucket(Cond::Lt(8.0), 10.0),
        bucket(Cond::Lt(12.0), 6.0),
        bucket(Cond::Lt(16.0), 2.0),
        bucket(Cond::Lt(20.0), -3.0),
        bucket(Cond::Any, -8.0),
    ],
};

const FORWARD_BONUS: f64 = 8.0;
/// Forward P/E must undercut the trailing one by at least 15%.
const FORWARD_DISCOUNT: f64 = 0.85;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationInputs {
    pub pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg: Option<f64>,
    pub fcf_yield: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
}

impl ValuationInputs {
    pub fn from_metrics(metrics: &MetricSnapshot) -> Self {
        let forward_pe = metrics.get(MetricKey::ForwardPe);
        // A loss-making trailing P/E is kept (and later skipped), not replaced.
        let pe = metrics
            .get(MetricKey::PeRatio)
            .filter(|v| *v != 0.0)
            .or(forward_pe);
        Self {
            pe,
            forward_pe,
            peg: metrics.get(MetricKey::PegRatio),
            fcf_yield: fcf_yield(metrics),
            ev_to_ebitda: metrics.get(MetricKey::EvToEbitda),
        }
    }
}

/// Free cash flow as a percentage of market cap.
pub fn fcf_yield(metrics: &MetricSnapshot) -> Option<f64> {
    let fcf = metrics.get(MetricKey::FreeCashFlow)?;
    let cap = metrics.positive(MetricKey::MarketCap)?;
    Some(fcf / cap * 100.0)
}

pub fn score_valuation(inputs: &ValuationInputs, baseline: f64) -> CategoryScore {
    let positive = |v: Option<f64>| v.filter(|x| *x > 0.0);
    let mut card = ScoreCard::new(baseline);

    let pe = positive(inputs.pe);
    card.apply(&PE, pe);

    if let (Some(pe), Some(fwd)) = (pe, positive(inputs.forward_pe)) {
        if fwd < pe * FORWARD_DISCOUNT {
            card.adjust("forward_pe_discount", fwd, FORWARD_BONUS);
        }
    }

    card.apply(&PEG, positive(inputs.peg));
    card.apply(&FCF_YIELD, inputs.fcf_yield);
    card.apply(&EV_EBITDA, positive(inputs.ev_to_ebitda));

    CategoryScore::from_card(Category::Valuation, card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cheap_stock_clamps_at_100() {
        let inputs = ValuationInputs {
            pe: Some(8.0),
            peg: Some(0.6),
            fcf_yield: Some(12.0),
            ev_to_ebitda: Some(6.0),
            ..Default::default()
        };
        let result = score_valuation(&inputs, 50.0);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.hits.len(), 4);
    }

    #[test]
    fn test_expensive_pe_alone() {
        let inputs = ValuationInputs {
            pe: Some(60.0),
            ..Default::default()
        };
        assert_eq!(score_valuation(&inputs, 50.0).score, 35.0);
    }

    #[test]
    fn test_forward_discount_bonus() {
        let inputs = ValuationInputs {
            pe: Some(30.0),
            forward_pe: Some(20.0),
            ..Default::default()
        };
        // 50 - 5 + 8
        assert_eq!(score_valuation(&inputs, 50.0).score, 53.0);

        let inputs = ValuationInputs {
            pe: Some(30.0),
            forward_pe: Some(27.0),
            ..Default::default()
        };
        // only a 10% discount, no bonus
        assert_eq!(score_valuation(&inputs, 50.0).score, 45.0);
    }

    #[test]
    fn test_negative_multiples_skipped() {
        let inputs = ValuationInputs {
            pe: Some(-12.0),
            peg: Some(-1.0),
            ev_to_ebitda: Some(-3.0),
            ..Default::default()
        };
        let result = score_valuation(&inputs, 50.0);
        assert_eq!(result.score, 50.0);
        assert!(result.hits.is_empty());
    }

    #[test]
    fn test_negative_fcf_yield_penalized() {
        let inputs = ValuationInputs {
            fcf_yield: Some(-2.0),
            ..Default::default()
        };
        assert_eq!(score_valuation(&inputs, 50.0).score, 40.0);
    }

    #[test]
    fn test_from_metrics_falls_back_to_forward_pe() {
        let metrics = MetricSnapshot::new()
            .with(MetricKey::PeRatio, 0.0)
            .with(MetricKey::ForwardPe, 18.0);
        let inputs = ValuationInputs::from_metrics(&metrics);
        assert_eq!(inputs.pe, Some(18.0));
        // forward equal to pe never earns the discount bonus
        assert_eq!(score_valuation(&inputs, 50.0).score, 60.0);
    }

    #[test]
    fn test_negative_trailing_pe_does_not_fall_back() {
        let metrics = MetricSnapshot::new()
            .with(MetricKey::PeRatio, -12.0)
            .with(MetricKey::ForwardPe, 12.0);
        let inputs = ValuationInputs::from_metrics(&metrics);
        assert_eq!(inputs.pe, Some(-12.0));

        let result = score_valuation(&inputs, 50.0);
        assert_eq!(result.score, 50.0);
        assert!(result.hits.is_empty());
    }

    #[test]
    fn test_fcf_yield_needs_market_cap() {
        let metrics = MetricSnapshot::new().with(MetricKey::FreeCashFlow, 5.0e9);
        assert_eq!(fcf_yield(&metrics), None);

        let metrics = metrics.with(MetricKey::MarketCap, 1.0e11);
        assert_relative_eq!(fcf_yield(&metrics).unwrap(), 5.0, epsilon = 1e-9);
    }
}
