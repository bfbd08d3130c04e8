//! Flat fundamental metric vocabulary and the provider-snapshot extractor.
//!
//! `extract_metrics` is the single point where provider scale is converted:
//! fractional ratios become percentages here and nowhere else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    RevenueGrowth,
    EarningsGrowth,
    ProfitMargin,
    OperatingMargin,
    GrossMargin,
    Roe,
    Roa,
    DebtToEquity,
    CurrentRatio,
    QuickRatio,
    FreeCashFlow,
    OperatingCashFlow,
    Revenue,
    Ebitda,
    MarketCap,
    PeRatio,
    ForwardPe,
    PegRatio,
    PriceToBook,
    PriceToSales,
    DividendYield,
    Beta,
    ShortPercent,
    #[serde(rename = "52w_high")]
    High52w,
    #[serde(rename = "52w_low")]
    Low52w,
    EvToEbitda,
}

/// How a provider value is rescaled on extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Raw,
    /// Provider fraction (0.12) to percentage (12.0)
    Percent,
    /// Provider percentage (150.0) to ratio (1.5)
    PercentToRatio,
}

impl Scale {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Scale::Raw => x,
            Scale::Percent => x * 100.0,
            Scale::PercentToRatio => x / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub key: MetricKey,
    pub field: &'static str,
    pub scale: Scale,
    pub default: f64,
}

const fn spec(key: MetricKey, field: &'static str, scale: Scale) -> MetricSpec {
    MetricSpec { key, field, scale, default: 0.0 }
}

/// Provider field, scale and default for every key, in vocabulary order.
pub const EXTRACTION_TABLE: &[MetricSpec] = &[
    spec(MetricKey::RevenueGrowth, "revenueGrowth", Scale::Percent),
    spec(MetricKey::EarningsGrowth, "earningsGrowth", Scale::Percent),
    spec(MetricKey::ProfitMargin, "profitMargins", Scale::Percent),
    spec(MetricKey::OperatingMargin, "operatingMargins", Scale::Percent),
    spec(MetricKey::GrossMargin, "grossMargins", Scale::Percent),
    spec(MetricKey::Roe, "returnOnEquity", Scale::Percent),
    spec(MetricKey::Roa, "returnOnAssets", Scale::Percent),
    spec(MetricKey::DebtToEquity, "debtToEquity", Scale::PercentToRatio),
    spec(MetricKey::CurrentRatio, "currentRatio", Scale::Raw),
    spec(MetricKey::QuickRatio, "quickRatio", Scale::Raw),
    spec(MetricKey::FreeCashFlow, "freeCashflow", Scale::Raw),
    spec(MetricKey::OperatingCashFlow, "operatingCashflow", Scale::Raw),
    spec(MetricKey::Revenue, "totalRevenue", Scale::Raw),
    spec(MetricKey::Ebitda, "ebitda", Scale::Raw),
    spec(MetricKey::MarketCap, "marketCap", Scale::Raw),
    spec(MetricKey::PeRatio, "trailingPE", Scale::Raw),
    spec(MetricKey::ForwardPe, "forwardPE", Scale::Raw),
    spec(MetricKey::PegRatio, "pegRatio", Scale::Raw),
    spec(MetricKey::PriceToBook, "priceToBook", Scale::Raw),
    spec(MetricKey::PriceToSales, "priceToSalesTrailing12Months", Scale::Raw),
    spec(MetricKey::DividendYield, "dividendYield", Scale::Percent),
    MetricSpec {
        key: MetricKey::Beta,
        field: "beta",
        scale: Scale::Raw,
        default: 1.0,
    },
    spec(MetricKey::ShortPercent, "shortPercentOfFloat", Scale::Percent),
    spec(MetricKey::High52w, "fiftyTwoWeekHigh", Scale::Raw),
    spec(MetricKey::Low52w, "fiftyTwoWeekLow", Scale::Raw),
    spec(MetricKey::EvToEbitda, "enterpriseToEbitda", Scale::Raw),
];

impl MetricKey {
    pub fn spec(self) -> &'static MetricSpec {
        // The table is complete and ordered like the enum.
        &EXTRACTION_TABLE[self as usize]
    }

    pub fn default_value(self) -> f64 {
        self.spec().default
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::RevenueGrowth => "revenue_growth",
            MetricKey::EarningsGrowth => "earnings_growth",
            MetricKey::ProfitMargin => "profit_margin",
            MetricKey::OperatingMargin => "operating_margin",
            MetricKey::GrossMargin => "gross_margin",
            MetricKey::Roe => "roe",
            MetricKey::Roa => "roa",
            MetricKey::DebtToEquity => "debt_to_equity",
            MetricKey::CurrentRatio => "current_ratio",
            MetricKey::QuickRatio => "quick_ratio",
            MetricKey::FreeCashFlow => "free_cash_flow",
            MetricKey::OperatingCashFlow => "operating_cash_flow",
            MetricKey::Revenue => "revenue",
            MetricKey::Ebitda => "ebitda",
            MetricKey::MarketCap => "market_cap",
            MetricKey::PeRatio => "pe_ratio",
            MetricKey::ForwardPe => "forward_pe",
            MetricKey::PegRatio => "peg_ratio",
            MetricKey::PriceToBook => "price_to_book",
            MetricKey::PriceToSales => "price_to_sales",
            MetricKey::DividendYield => "dividend_yield",
            MetricKey::Beta => "beta",
            MetricKey::ShortPercent => "short_percent",
            MetricKey::High52w => "52w_high",
            MetricKey::Low52w => "52w_low",
            MetricKey::EvToEbitda => "ev_to_ebitda",
        }
    }
}

/// Named fundamental metrics for one security.
///
/// Remembers which keys the provider actually supplied: `get` exposes that,
/// `value` resolves absent keys to their documented default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSnapshot {
    values: BTreeMap<MetricKey, f64>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and callers with typed data.
    pub fn with(mut self, key: MetricKey, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    /// Non-finite values are dropped: they would poison every rule they reach.
    pub fn insert(&mut self, key: MetricKey, value: f64) {
        if value.is_finite() {
            self.values.insert(key, value);
        } else {
            self.values.remove(&key);
        }
    }

    pub fn get(&self, key: MetricKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    pub fn value(&self, key: MetricKey) -> f64 {
        self.get(key).unwrap_or_else(|| key.default_value())
    }

    /// Supplied and strictly positive; the guard most ratio rules need.
    pub fn positive(&self, key: MetricKey) -> Option<f64> {
        self.get(key).filter(|v| *v > 0.0)
    }

    pub fn supplied(&self) -> usize {
        self.values.len()
    }

    /// Every key in the vocabulary with defaults filled in.
    pub fn to_flat_map(&self) -> BTreeMap<&'static str, f64> {
        EXTRACTION_TABLE
            .iter()
            .map(|s| (s.key.as_str(), self.value(s.key)))
            .collect()
    }
}

/// Normalize a raw provider snapshot (a JSON object keyed by provider field
/// names) into a `MetricSnapshot`.
///
/// Missing and `null` fields stay absent. Provider strings that parse as
/// numbers are accepted; `"Infinity"`/`"NaN"` are treated as absent. Any
/// other value type is a malformed snapshot.
pub fn extract_metrics(raw: &Value) -> Result<MetricSnapshot, AnalysisError> {
    let obj = raw.as_object().ok_or_else(|| {
        AnalysisError::MalformedInput("provider snapshot must be a JSON object".to_string())
    })?;

    let mut snapshot = MetricSnapshot::new();
    for spec in EXTRACTION_TABLE {
        let Some(value) = obj.get(spec.field) else {
            continue;
        };
        if let Some(x) = numeric_field(spec.field, value)? {
            snapshot.insert(spec.key, spec.scale.apply(x));
        }
    }

    tracing::debug!(
        supplied = snapshot.supplied(),
        total = EXTRACTION_TABLE.len(),
        "extracted metric snapshot"
    );
    Ok(snapshot)
}

fn numeric_field(field: &str, value: &Value) -> Result<Option<f64>, AnalysisError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64().filter(|x| x.is_finite())),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(Some(x)),
            Ok(_) => Ok(None),
            Err(_) => Err(AnalysisError::MalformedInput(format!(
                "field {} is not numeric: {:?}",
                field, s
            ))),
        },
        other => Err(AnalysisError::MalformedInput(format!(
            "field {} has unexpected type: {}",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_table_matches_enum_order() {
        for (i, spec) in EXTRACTION_TABLE.iter().enumerate() {
            assert_eq!(spec.key as usize, i, "{} out of order", spec.key.as_str());
        }
    }

    #[test]
    fn test_ratio_fields_become_percentages() {
        let raw = json!({
            "returnOnEquity": 0.12,
            "profitMargins": 0.254,
            "revenueGrowth": -0.03,
            "shortPercentOfFloat": 0.05,
            "debtToEquity": 150.0,
            "trailingPE": 18.5,
        });
        let m = extract_metrics(&raw).unwrap();
        assert_relative_eq!(m.value(MetricKey::Roe), 12.0, epsilon = 1e-9);
        assert_relative_eq!(m.value(MetricKey::ProfitMargin), 25.4, epsilon = 1e-9);
        assert_relative_eq!(m.value(MetricKey::RevenueGrowth), -3.0, epsilon = 1e-9);
        assert_relative_eq!(m.value(MetricKey::ShortPercent), 5.0, epsilon = 1e-9);
        assert_relative_eq!(m.value(MetricKey::DebtToEquity), 1.5, epsilon = 1e-9);
        assert_relative_eq!(m.value(MetricKey::PeRatio), 18.5);
    }

    #[test]
    fn test_missing_fields_default() {
        let m = extract_metrics(&json!({ "beta": null })).unwrap();
        assert_eq!(m.supplied(), 0);
        assert_eq!(m.get(MetricKey::Roe), None);
        assert_eq!(m.value(MetricKey::Roe), 0.0);
        assert_eq!(m.value(MetricKey::Beta), 1.0);

        let flat = m.to_flat_map();
        assert_eq!(flat.len(), EXTRACTION_TABLE.len());
        assert_eq!(flat["52w_high"], 0.0);
        assert_eq!(flat["beta"], 1.0);
    }

    #[test]
    fn test_infinity_string_is_absent() {
        let m = extract_metrics(&json!({ "trailingPE": "Infinity", "forwardPE": "21.5" })).unwrap();
        assert_eq!(m.get(MetricKey::PeRatio), None);
        assert_eq!(m.get(MetricKey::ForwardPe), Some(21.5));
    }

    #[test]
    fn test_malformed_snapshot() {
        assert!(matches!(
            extract_metrics(&json!([1, 2, 3])),
            Err(AnalysisError::MalformedInput(_))
        ));
        assert!(extract_metrics(&json!({ "marketCap": "lots" })).is_err());
        assert!(extract_metrics(&json!({ "beta": [1.0] })).is_err());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let m = extract_metrics(&json!({ "longName": "Acme Corp", "marketCap": 1.0e9 })).unwrap();
        assert_eq!(m.supplied(), 1);
        assert_eq!(m.get(MetricKey::MarketCap), Some(1.0e9));
    }

    #[test]
    fn test_snapshot_serializes_with_vocabulary_names() {
        let m = MetricSnapshot::new()
            .with(MetricKey::High52w, 120.0)
            .with(MetricKey::PeRatio, 15.0);
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v, json!({ "pe_ratio": 15.0, "52w_high": 120.0 }));
        let back: MetricSnapshot = serde_json::from_value(v).unwrap();
        assert_eq!(back, m);
    }
}
