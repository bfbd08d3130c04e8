use analysis_core::{RuleHit, ScoreCard};
use serde::{Deserialize, Serialize};

use crate::config::Category;

/// Clamped score of one category plus the buckets that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
    pub hits: Vec<RuleHit>,
}

impl CategoryScore {
    pub(crate) fn from_card(category: Category, card: ScoreCard) -> Self {
        let (score, hits) = card.finish();
        Self { category, score, hits }
    }
}
