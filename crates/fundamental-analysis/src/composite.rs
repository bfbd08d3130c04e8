use std::collections::BTreeMap;

use analysis_core::{bucket, first_match, Bucket, Cond};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{Category, Weights};

/// Discrete investment rating derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "REDUCE")]
    Reduce,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "ACCUMULATE")]
    Accumulate,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
}

const RATINGS: &[Bucket<Rating>] = &[
    bucket(Cond::Ge(80.0), Rating::StrongBuy),
    bucket(Cond::Ge(68.0), Rating::Buy),
    bucket(Cond::Ge(55.0), Rating::Accumulate),
    bucket(Cond::Ge(45.0), Rating::Hold),
    bucket(Cond::Ge(35.0), Rating::Reduce),
    bucket(Cond::Any, Rating::Sell),
];

impl Rating {
    pub fn label(&self) -> &'static str {
        match self {
            Rating::StrongBuy => "STRONG BUY",
            Rating::Buy => "BUY",
            Rating::Accumulate => "ACCUMULATE",
            Rating::Hold => "HOLD",
            Rating::Reduce => "REDUCE",
            Rating::Sell => "SELL",
        }
    }

    pub fn color_hint(&self) -> &'static str {
        match self {
            Rating::StrongBuy => "#22c55e",
            Rating::Buy => "#3b82f6",
            Rating::Accumulate => "#06b6d4",
            Rating::Hold => "#eab308",
            Rating::Reduce => "#f97316",
            Rating::Sell => "#ef4444",
        }
    }
}

/// Map a composite score onto its rating tier. Lower bounds are inclusive.
pub fn rate(score: f64) -> Rating {
    first_match(RATINGS, score).unwrap_or(Rating::Sell)
}

/// Weighted average of the category scores. Categories with no score or no
/// weight drop out of both sides; with nothing left the baseline is returned.
pub fn composite_score(scores: &BTreeMap<Category, f64>, weights: &Weights, baseline: f64) -> f64 {
    let (weighted, total_weight) = scores
        .iter()
        .map(|(category, score)| (score, weights.get(*category)))
        .filter(|(_, w)| *w > 0.0)
        .fold((0.0, 0.0), |(sum, wsum), (score, w)| (sum + score * w, wsum + w));

    if total_weight <= 0.0 {
        warn!("composite has no positive weights, falling back to baseline {}", baseline);
        return baseline;
    }

    (weighted / total_weight).clamp(0.0, 100.0)
}
