use analysis_core::{bucket, Cond, MetricKey, MetricSnapshot, RuleGroup, ScoreCard};
use serde::{Deserialize, Serialize};
use technical_analysis::TechnicalSnapshot;

use crate::category::CategoryScore;
use crate::config::Category;

const RSI: RuleGroup = RuleGroup {
    name: "rsi",
    buckets: &[
        bucket(Cond::Closed(45.0, 55.0), 10.0),
        bucket(Cond::Closed(40.0, 60.0), 8.0),
        bucket(Cond::OpenClosed(55.0, 65.0), 5.0),
        bucket(Cond::ClosedOpen(35.0, 40.0), 6.0),
        bucket(Cond::Gt(75.0), -8.0),
        bucket(Cond::Lt(25.0), -5.0),
    ],
};

/// Keyed on percent distance of price from the short moving average.
const SHORT_MA_DISTANCE: RuleGroup = RuleGroup {
    name: "short_ma_distance",
    buckets: &[
        bucket(Cond::Ge(20.0), -2.0),
        bucket(Cond::Ge(10.0), 4.0),
        bucket(Cond::Ge(5.0), 8.0),
        bucket(Cond::Gt(0.0), 10.0),
        bucket(Cond::Gt(-5.0), 2.0),
        bucket(Cond::Gt(-10.0), -3.0),
        bucket(Cond::Any, -8.0),
    ],
};

const PERIOD_RETURN: RuleGroup = RuleGroup {
    name: "period_return",
    buckets: &[
        bucket(Cond::Gt(20.0), 8.0),
        bucket(Cond::Gt(10.0), 5.0),
        bucket(Cond::Gt(0.0), 2.0),
        bucket(Cond::Gt(-10.0), -3.0),
        bucket(Cond::Any, -8.0),
    ],
};

/// Keyed on the fractional position inside the 52-week range.
const RANGE_POSITION: RuleGroup = RuleGroup {
    name: "range_position",
    buckets: &[
        bucket(Cond::Closed(0.7, 0.9), 8.0),
        bucket(Cond::ClosedOpen(0.5, 0.7), 5.0),
        bucket(Cond::ClosedOpen(0.3, 0.5), 2.0),
        bucket(Cond::Lt(0.2), -5.0),
        bucket(Cond::Gt(0.95), -2.0),
    ],
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumInputs {
    pub price: Option<f64>,
    pub rsi: Option<f64>,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub period_return: Option<f64>,
    pub high_52w: Option<f64>,
    pub low_52w: Option<f64>,
}

impl MomentumInputs {
    pub fn from_parts(technicals: &TechnicalSnapshot, metrics: &MetricSnapshot) -> Self {
        Self {
            price: technicals.last_close,
            rsi: technicals.rsi,
            ma_short: technicals.ma_short,
            ma_long: technicals.ma_long,
            period_return: technicals.period_return,
            high_52w: metrics.get(MetricKey::High52w),
            low_52w: metrics.get(MetricKey::Low52w),
        }
    }

    /// Percent distance of price above (+) or below (-) the short average.
    pub fn short_ma_distance(&self) -> Option<f64> {
        match (self.price, self.ma_short) {
            (Some(price), Some(ma)) if ma > 0.0 => Some((price - ma) / ma * 100.0),
            _ => None,
        }
    }

    /// Fraction of the way from the 52-week low to the high.
    pub fn range_position(&self) -> Option<f64> {
        match (self.price, self.high_52w, self.low_52w) {
            (Some(price), Some(high), Some(low)) if high > low => Some((price - low) / (high - low)),
            _ => None,
        }
    }
}

pub fn score_momentum(inputs: &MomentumInputs, baseline: f64) -> CategoryScore {
    let mut card = ScoreCard::new(baseline);

    card.apply(&RSI, inputs.rsi);
    card.apply(&SHORT_MA_DISTANCE, inputs.short_ma_distance());

    if let (Some(price), Some(short), Some(long)) = (inputs.price, inputs.ma_short, inputs.ma_long) {
        if short > long {
            card.adjust("golden_cross", short - long, 10.0);
        } else {
            card.adjust("death_cross", short - long, -5.0);
        }
        if price > long {
            card.adjust("above_long_ma", price - long, 5.0);
        } else {
            card.adjust("below_long_ma", price - long, -5.0);
        }
    }

    card.apply(&PERIOD_RETURN, inputs.period_return);
    card.apply(&RANGE_POSITION, inputs.range_position());

    CategoryScore::from_card(Category::Momentum, card)
}
