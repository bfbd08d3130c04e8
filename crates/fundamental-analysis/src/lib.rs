//! Category scoring and the composite investment score.
//!
//! Five independent scorers turn a `MetricSnapshot` and a price history into
//! 0-100 category scores; `composite_score` blends them with caller-supplied
//! weights and `rate` maps the blend onto a rating tier.

pub mod category;
pub mod composite;
pub mod config;
pub mod growth;
pub mod momentum;
pub mod quality;
pub mod risk;
pub mod valuation;


use std::collections::BTreeMap;

use analysis_core::{MetricKey, MetricSnapshot, PriceSeries};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use technical_analysis::TechnicalSnapshot;
use tracing::debug;

pub use category::CategoryScore;
pub use composite::{composite_score, rate, Rating};
pub use config::{Category, ScoringConfig, Weights};
pub use growth::{score_growth, GrowthInputs};
pub use momentum::{score_momentum, MomentumInputs};
pub use quality::{score_quality, QualityInputs};
pub use risk::{score_risk, RiskInputs};
pub use valuation::{fcf_yield, score_valuation, ValuationInputs};

/// The values the category rules looked at, for display next to the scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg: Option<f64>,
    pub fcf_yield: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub short_percent: Option<f64>,
    pub beta: Option<f64>,
    /// Position inside the 52-week range, 0-100.
    pub range_position_pct: Option<f64>,
    pub technicals: TechnicalSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScore {
    pub categories: BTreeMap<Category, CategoryScore>,
    pub composite: f64,
    pub rating: Rating,
    pub derived: DerivedMetrics,
}

impl SecurityScore {
    pub fn score(&self, category: Category) -> Option<f64> {
        self.categories.get(&category).map(|c| c.score)
    }
}

/// Score one security across all five categories and blend the result.
pub fn score_security(metrics: &MetricSnapshot, prices: &PriceSeries, config: &ScoringConfig) -> SecurityScore {
    let technicals = TechnicalSnapshot::compute(prices, &config.indicators);
    if technicals.ma_long.is_none() {
        debug!(
            bars = prices.len(),
            "price history shorter than long average window, trend rules skipped"
        );
    }

    let valuation = ValuationInputs::from_metrics(metrics);
    let growth = GrowthInputs::from_metrics(metrics);
    let momentum = MomentumInputs::from_parts(&technicals, metrics);
    let risk = RiskInputs::from_metrics(metrics);

    let baseline = config.baseline;
    let categories: BTreeMap<Category, CategoryScore> = [
        score_valuation(&valuation, baseline),
        score_quality(&QualityInputs::from_metrics(metrics), baseline),
        score_growth(&growth, baseline),
        score_momentum(&momentum, baseline),
        score_risk(&risk, baseline),
    ]
    .into_iter()
    .map(|s| (s.category, s))
    .collect();

    let flat: BTreeMap<Category, f64> = categories.iter().map(|(c, s)| (*c, s.score)).collect();
    let composite = composite_score(&flat, &config.weights, baseline);

    let derived = DerivedMetrics {
        pe: valuation.pe,
        forward_pe: valuation.forward_pe,
        peg: valuation.peg,
        fcf_yield: valuation.fcf_yield,
        ev_to_ebitda: valuation.ev_to_ebitda,
        revenue_growth: growth.revenue_growth,
        earnings_growth: growth.earnings_growth,
        short_percent: risk.short_percent,
        beta: metrics.get(MetricKey::Beta),
        range_position_pct: momentum.range_position().map(|p| p * 100.0),
        technicals,
    };

    SecurityScore {
        categories,
        composite,
        rating: rate(composite),
        derived,
    }
}

/// One security in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub symbol: String,
    #[serde(default)]
    pub metrics: MetricSnapshot,
    #[serde(default)]
    pub prices: PriceSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub symbol: String,
    #[serde(flatten)]
    pub score: SecurityScore,
}

/// Score many securities in parallel. Output order follows input order.
pub fn score_batch(requests: &[ScoreRequest], config: &ScoringConfig) -> Vec<BatchEntry> {
    debug!(count = requests.len(), "scoring batch");
    requests
        .par_iter()
        .map(|req| BatchEntry {
            symbol: req.symbol.clone(),
            score: score_security(&req.metrics, &req.prices, config),
        })
        .collect()
}
