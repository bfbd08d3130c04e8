//! Close/volume profile and overhead supply detection.
//!
//! Closes are binned evenly between the lowest low and highest high of the
//! series. Bins carrying well above the average volume are zones where many
//! holders bought: above the last close they are overhead supply, at or below
//! it they are support.

use analysis_core::{bucket, first_match, Bucket, Cond, PriceSeries};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplyRisk {
    Low,
    Moderate,
    High,
    Critical,
}

impl SupplyRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplyRisk::Low => "LOW",
            SupplyRisk::Moderate => "MODERATE",
            SupplyRisk::High => "HIGH",
            SupplyRisk::Critical => "CRITICAL",
        }
    }
}

/// Keyed on percent distance from the last close up to the nearest supply zone.
const SUPPLY_RISK: &[Bucket<(SupplyRisk, f64)>] = &[
    bucket(Cond::Lt(3.0), (SupplyRisk::Critical, 90.0)),
    bucket(Cond::Lt(5.0), (SupplyRisk::High, 70.0)),
    bucket(Cond::Lt(10.0), (SupplyRisk::Moderate, 50.0)),
    bucket(Cond::Any, (SupplyRisk::Low, 20.0)),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeProfileParams {
    pub bins: usize,
    /// A bin is a zone when its volume exceeds this multiple of the bin average.
    pub zone_multiple: f64,
    pub min_bars: usize,
}

impl Default for VolumeProfileParams {
    fn default() -> Self {
        Self {
            bins: 20,
            zone_multiple: 1.5,
            min_bars: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileBin {
    pub price_low: f64,
    pub price_high: f64,
    pub price_mid: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeZone {
    pub price_low: f64,
    pub price_high: f64,
    pub volume: f64,
    /// Zone volume over the average bin volume.
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyProfile {
    pub overhead_supply_zones: Vec<VolumeZone>,
    pub support_zones: Vec<VolumeZone>,
    pub current_risk: SupplyRisk,
    pub risk_score: f64,
    /// Percent from the last close to the lowest overhead zone floor.
    pub distance_to_supply: Option<f64>,
    pub volume_profile: Vec<ProfileBin>,
}

impl SupplyProfile {
    pub fn neutral() -> Self {
        Self {
            overhead_supply_zones: Vec::new(),
            support_zones: Vec::new(),
            current_risk: SupplyRisk::Low,
            risk_score: 0.0,
            distance_to_supply: None,
            volume_profile: Vec::new(),
        }
    }
}

/// Risk tier and score for a given distance to overhead supply.
pub fn supply_risk(distance_pct: f64) -> (SupplyRisk, f64) {
    first_match(SUPPLY_RISK, distance_pct).unwrap_or((SupplyRisk::Low, 20.0))
}

/// Volume traded per close-price bin. The top edge of the range falls in the
/// last bin.
pub fn volume_profile(series: &PriceSeries, bins: usize) -> Vec<ProfileBin> {
    let bars = series.bars();
    if bars.is_empty() || bins == 0 {
        return Vec::new();
    }

    let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let edge = |i: usize| low + (high - low) * i as f64 / bins as f64;

    (0..bins)
        .map(|i| {
            let (price_low, price_high) = (edge(i), edge(i + 1));
            let last = i + 1 == bins;
            let volume = bars
                .iter()
                .filter(|b| b.close >= price_low && (b.close < price_high || (last && b.close <= price_high)))
                .map(|b| b.volume)
                .sum();
            ProfileBin {
                price_low,
                price_high,
                price_mid: (price_low + price_high) / 2.0,
                volume,
            }
        })
        .collect()
}

pub fn overhead_supply(series: &PriceSeries, params: &VolumeProfileParams) -> SupplyProfile {
    let Some(current) = series.last_close() else {
        return SupplyProfile::neutral();
    };
    if series.len() < params.min_bars.max(1) {
        return SupplyProfile::neutral();
    }

    let profile = volume_profile(series, params.bins);
    let total: f64 = profile.iter().map(|b| b.volume).sum();
    let avg = if profile.is_empty() { 0.0 } else { total / profile.len() as f64 };

    let mut result = SupplyProfile::neutral();
    for bin in &profile {
        if bin.volume <= avg * params.zone_multiple {
            continue;
        }
        let zone = VolumeZone {
            price_low: bin.price_low,
            price_high: bin.price_high,
            volume: bin.volume,
            strength: if avg > 0.0 { bin.volume / avg } else { 0.0 },
        };
        if bin.price_mid > current {
            result.overhead_supply_zones.push(zone);
        } else {
            result.support_zones.push(zone);
        }
    }

    let nearest = result
        .overhead_supply_zones
        .iter()
        .map(|z| z.price_low)
        .reduce(f64::min);
    if let Some(nearest) = nearest.filter(|_| current > 0.0) {
        let distance = (nearest - current) / current * 100.0;
        let (risk, score) = supply_risk(distance);
        result.current_risk = risk;
        result.risk_score = score;
        result.distance_to_supply = Some(distance);
    }

    result.volume_profile = profile;
    result
}
