use serde::{Deserialize, Serialize};

use crate::distortion::{DistortionResult, DistortionSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortfolioVerdict {
    #[serde(rename = "MOSTLY DISTORTED VALUE")]
    MostlyDistorted,
    #[serde(rename = "MIXED")]
    Mixed,
    #[serde(rename = "FUNDAMENTAL GROWTH")]
    FundamentalGrowth,
}

/// Aggregate distortion view over a set of positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDistortion {
    pub positions: usize,
    pub distorted_count: usize,
    /// Mean distortion score over positions with a positive score.
    pub average_distortion: Option<f64>,
    pub verdict: PortfolioVerdict,
}

pub fn summarize_portfolio<'a, I>(results: I) -> PortfolioDistortion
where
    I: IntoIterator<Item = &'a DistortionResult>,
{
    let mut positions = 0;
    let mut distorted_count = 0;
    let mut scored = Vec::new();

    for r in results {
        positions += 1;
        if r.signal == DistortionSignal::Distorted {
            distorted_count += 1;
        }
        if r.distortion_score > 0.0 {
            scored.push(r.distortion_score);
        }
    }

    let average_distortion = if scored.is_empty() {
        None
    } else {
        Some(scored.iter().sum::<f64>() / scored.len() as f64)
    };

    let verdict = if distorted_count * 2 > positions {
        PortfolioVerdict::MostlyDistorted
    } else if distorted_count > 0 {
        PortfolioVerdict::Mixed
    } else {
        PortfolioVerdict::FundamentalGrowth
    };

    PortfolioDistortion {
        positions,
        distorted_count,
        average_distortion,
        verdict,
    }
}
