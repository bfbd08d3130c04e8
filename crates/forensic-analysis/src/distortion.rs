use analysis_core::{FinancialStatements, LineItemLookup, MetricKey, MetricSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aliases::{OPERATING_INCOME, RESTRUCTURING, UNUSUAL_ITEMS};
use crate::config::ForensicsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DistortionSignal {
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "MODERATE DISTORTION")]
    Moderate,
    #[serde(rename = "DISTORTED VALUE")]
    Distorted,
}

impl DistortionSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistortionSignal::Neutral => "NEUTRAL",
            DistortionSignal::Moderate => "MODERATE DISTORTION",
            DistortionSignal::Distorted => "DISTORTED VALUE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Restructuring,
    UnusualItems,
}

/// One charge added back to operating income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    pub label: String,
    /// Absolute size of the charge.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistortionResult {
    pub has_distortion: bool,
    pub distortion_score: f64,
    pub signal_strength: f64,
    pub signal: DistortionSignal,
    pub gaap_pe: Option<f64>,
    pub real_pe: Option<f64>,
    /// `(gaap_pe - real_pe) / real_pe * 100`
    pub pe_gap: Option<f64>,
    /// Annualized after-tax earnings with one-time charges added back.
    pub normalized_earnings: Option<f64>,
    pub reported_earnings: Option<f64>,
    pub adjustments: Vec<Adjustment>,
}

impl DistortionResult {
    pub fn neutral() -> Self {
        Self {
            has_distortion: false,
            distortion_score: 0.0,
            signal_strength: 0.0,
            signal: DistortionSignal::Neutral,
            gaap_pe: None,
            real_pe: None,
            pe_gap: None,
            normalized_earnings: None,
            reported_earnings: None,
            adjustments: Vec::new(),
        }
    }
}

impl Default for DistortionResult {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Signal, distortion score and signal strength for a P/E gap.
pub fn classify_gap(pe_gap: f64, config: &ForensicsConfig) -> (DistortionSignal, f64, f64) {
    if pe_gap > config.distorted_gap_pct {
        (
            DistortionSignal::Distorted,
            (pe_gap * 1.5).min(100.0),
            (pe_gap * 2.0).min(100.0),
        )
    } else if pe_gap > config.moderate_gap_pct {
        (DistortionSignal::Moderate, pe_gap, pe_gap * 1.5)
    } else {
        (DistortionSignal::Neutral, 0.0, 0.0)
    }
}

fn ratio(numerator: Option<f64>, denominator: f64) -> Option<f64> {
    numerator.filter(|_| denominator > 0.0).map(|n| n / denominator)
}

/// Compare the reported P/E with one computed from earnings that add back
/// restructuring and unusual charges from the latest quarter.
///
/// Returns a neutral result when no quarterly income statement or no
/// operating-income line is available.
pub fn detect_distortion(
    metrics: &MetricSnapshot,
    statements: &FinancialStatements,
    config: &ForensicsConfig,
) -> DistortionResult {
    let Some(income) = statements.income_quarterly.as_ref().filter(|s| !s.is_empty()) else {
        debug!("no quarterly income statement, distortion check skipped");
        return DistortionResult::neutral();
    };

    let Some(operating) = OPERATING_INCOME.find_latest(income) else {
        debug!(concept = OPERATING_INCOME.concept(), "line item not found, distortion check skipped");
        return DistortionResult::neutral();
    };

    let adjustments: Vec<Adjustment> = [
        (AdjustmentKind::Restructuring, &RESTRUCTURING),
        (AdjustmentKind::UnusualItems, &UNUSUAL_ITEMS),
    ]
    .into_iter()
    .flat_map(|(kind, lookup)| {
        lookup.find_all(income).into_iter().map(move |item| Adjustment {
            kind,
            label: item.label.to_string(),
            value: item.value.abs(),
        })
    })
    .collect();
    let addbacks: f64 = adjustments.iter().map(|a| a.value).sum();

    let reported_annual = operating.value * config.quarters_per_year;
    let normalized_annual = (operating.value + addbacks) * config.quarters_per_year;
    let reported_net = config.tax_rate.after_tax(reported_annual);
    let normalized_net = config.tax_rate.after_tax(normalized_annual);

    let market_cap = metrics.positive(MetricKey::MarketCap);
    let real_pe = ratio(market_cap, normalized_net);
    // provider trailing P/E covers a full twelve months, prefer it
    let gaap_pe = metrics
        .positive(MetricKey::PeRatio)
        .or_else(|| ratio(market_cap, reported_net));

    let pe_gap = match (gaap_pe, real_pe) {
        (Some(gaap), Some(real)) if real > 0.0 => Some((gaap - real) / real * 100.0),
        _ => None,
    };

    let (signal, distortion_score, signal_strength) = match pe_gap {
        Some(gap) => classify_gap(gap, config),
        None => (DistortionSignal::Neutral, 0.0, 0.0),
    };

    debug!(
        operating_label = operating.label,
        addbacks,
        pe_gap = ?pe_gap,
        signal = signal.as_str(),
        "distortion check"
    );

    DistortionResult {
        has_distortion: signal == DistortionSignal::Distorted,
        distortion_score,
        signal_strength,
        signal,
        gaap_pe,
        real_pe,
        pe_gap,
        normalized_earnings: Some(normalized_net),
        reported_earnings: Some(reported_net),
        adjustments,
    }
}
