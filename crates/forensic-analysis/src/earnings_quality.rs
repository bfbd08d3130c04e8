use std::collections::BTreeSet;

use analysis_core::{FinancialStatements, LineItemLookup, Statement};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aliases::{NET_INCOME, OPERATING_CASH_FLOW, TOTAL_ASSETS};
use crate::config::ForensicsConfig;

const NEUTRAL_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityFlag {
    #[serde(rename = "Low cash conversion - earnings quality concern")]
    LowCashConversion,
    #[serde(rename = "High accrual ratio - potential earnings manipulation")]
    HighAccrualRatio,
}

impl QualityFlag {
    pub fn message(&self) -> &'static str {
        match self {
            QualityFlag::LowCashConversion => "Low cash conversion - earnings quality concern",
            QualityFlag::HighAccrualRatio => "High accrual ratio - potential earnings manipulation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    /// `(net income - operating cash flow) / average total assets * 100`
    pub accrual_ratio: Option<f64>,
    /// Operating cash flow as a percentage of net income.
    pub cash_conversion: Option<f64>,
    pub quality_score: f64,
    pub flags: BTreeSet<QualityFlag>,
}

impl Default for QualityResult {
    fn default() -> Self {
        Self {
            accrual_ratio: None,
            cash_conversion: None,
            quality_score: NEUTRAL_SCORE,
            flags: BTreeSet::new(),
        }
    }
}

/// Score for a given cash conversion, and whether it is low enough to flag.
pub fn conversion_score(conversion: f64) -> (f64, bool) {
    if conversion >= 100.0 {
        (80.0 + ((conversion - 100.0) / 2.0).min(20.0), false)
    } else if conversion >= 80.0 {
        (60.0 + (conversion - 80.0), false)
    } else {
        ((conversion * 0.75).max(0.0), true)
    }
}

/// Two-point average of the latest total assets, or the latest alone when
/// the prior period is not reported.
fn average_total_assets(balance: &Statement) -> Option<f64> {
    let (_, row) = TOTAL_ASSETS.find_row(balance)?;
    let latest = row.first().copied().flatten()?;
    match row.get(1).copied().flatten() {
        Some(prior) => Some((latest + prior) / 2.0),
        None => Some(latest),
    }
}

/// Compare annual operating cash flow with net income.
pub fn assess_earnings_quality(statements: &FinancialStatements, config: &ForensicsConfig) -> QualityResult {
    let mut result = QualityResult::default();

    let (Some(income), Some(cash_flow)) = (
        statements.income_annual.as_ref(),
        statements.cash_flow_annual.as_ref(),
    ) else {
        debug!("annual income or cash flow statement missing, quality left neutral");
        return result;
    };

    let (Some(net_income), Some(ocf)) = (
        NET_INCOME.find_latest(income).map(|i| i.value),
        OPERATING_CASH_FLOW.find_latest(cash_flow).map(|i| i.value),
    ) else {
        debug!("net income or operating cash flow not reported, quality left neutral");
        return result;
    };

    if net_income > 0.0 {
        let conversion = ocf / net_income * 100.0;
        let (score, low) = conversion_score(conversion);
        result.cash_conversion = Some(conversion);
        result.quality_score = score;
        if low {
            result.flags.insert(QualityFlag::LowCashConversion);
        }
    }

    let avg_assets = statements
        .balance_annual
        .as_ref()
        .and_then(average_total_assets)
        .filter(|a| *a > 0.0);

    if let Some(assets) = avg_assets {
        let accrual = (net_income - ocf) / assets * 100.0;
        result.accrual_ratio = Some(accrual);
        if accrual.abs() > config.accrual_flag_pct {
            result.flags.insert(QualityFlag::HighAccrualRatio);
            result.quality_score = (result.quality_score - config.accrual_penalty).max(0.0);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn fy(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap()
    }

    fn statements(net_income: f64, ocf: f64, assets: &[Option<f64>]) -> FinancialStatements {
        let mut balance = BTreeMap::new();
        balance.insert("Total Assets".to_string(), assets.to_vec());
        let periods: Vec<NaiveDate> = (0..assets.len()).map(|i| fy(2024 - i as i32)).collect();

        FinancialStatements {
            income_annual: Some(Statement::single_period(fy(2024), &[("Net Income", net_income)]).unwrap()),
            cash_flow_annual: Some(Statement::single_period(fy(2024), &[("Operating Cash Flow", ocf)]).unwrap()),
            balance_annual: Some(Statement::new(periods, balance).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_conversion_of_exactly_100() {
        assert_eq!(conversion_score(100.0), (80.0, false));
        let result = assess_earnings_quality(&statements(500.0, 500.0, &[Some(10_000.0)]), &ForensicsConfig::default());
        assert_eq!(result.quality_score, 80.0);
        assert_eq!(result.cash_conversion, Some(100.0));
        assert!(result.flags.is_empty());
    }

    #[test]
    fn test_conversion_bands() {
        assert_eq!(conversion_score(180.0).0, 100.0);
        assert_eq!(conversion_score(500.0).0, 100.0);
        assert_eq!(conversion_score(120.0).0, 90.0);
        assert_eq!(conversion_score(90.0).0, 70.0);
        assert_eq!(conversion_score(80.0).0, 60.0);
        assert_eq!(conversion_score(60.0), (45.0, true));
        assert_eq!(conversion_score(-40.0), (0.0, true));
    }

    #[test]
    fn test_accrual_uses_two_point_average() {
        // accruals 1500 over average assets of 10000
        let result = assess_earnings_quality(
            &statements(2000.0, 500.0, &[Some(12_000.0), Some(8_000.0)]),
            &ForensicsConfig::default(),
        );
        assert_abs_diff_eq!(result.accrual_ratio.unwrap(), 15.0, epsilon = 1e-9);
        assert!(result.flags.contains(&QualityFlag::HighAccrualRatio));
        assert!(result.flags.contains(&QualityFlag::LowCashConversion));
        // conversion 25% scores 18.75, then the accrual penalty floors at 0
        assert_eq!(result.quality_score, 0.0);
    }

    #[test]
    fn test_accrual_of_exactly_ten_not_flagged() {
        let result = assess_earnings_quality(
            &statements(1500.0, 500.0, &[Some(10_000.0), None]),
            &ForensicsConfig::default(),
        );
        assert_eq!(result.accrual_ratio, Some(10.0));
        assert!(!result.flags.contains(&QualityFlag::HighAccrualRatio));
    }

    #[test]
    fn test_negative_accrual_flagged_on_magnitude() {
        let result = assess_earnings_quality(
            &statements(100.0, 1300.0, &[Some(10_000.0)]),
            &ForensicsConfig::default(),
        );
        assert_abs_diff_eq!(result.accrual_ratio.unwrap(), -12.0, epsilon = 1e-9);
        // conversion 1300% caps at 100, minus 20
        assert_eq!(result.quality_score, 80.0);
        assert_eq!(result.flags.len(), 1);
    }

    #[test]
    fn test_net_loss_keeps_neutral_score() {
        let result = assess_earnings_quality(
            &statements(-300.0, 200.0, &[Some(100_000.0)]),
            &ForensicsConfig::default(),
        );
        assert_eq!(result.cash_conversion, None);
        assert_eq!(result.quality_score, 50.0);
        assert_abs_diff_eq!(result.accrual_ratio.unwrap(), -0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_cash_flow_is_neutral() {
        let mut s = statements(500.0, 400.0, &[Some(1000.0)]);
        s.cash_flow_annual = None;
        assert_eq!(assess_earnings_quality(&s, &ForensicsConfig::default()), QualityResult::default());
    }

    #[test]
    fn test_zero_assets_skip_accrual() {
        let result = assess_earnings_quality(
            &statements(500.0, 450.0, &[Some(0.0)]),
            &ForensicsConfig::default(),
        );
        assert_eq!(result.accrual_ratio, None);
        assert_eq!(result.quality_score, 70.0);
    }

    #[test]
    fn test_flags_serialize_as_messages() {
        let result = assess_earnings_quality(
            &statements(1000.0, 100.0, &[Some(1000.0)]),
            &ForensicsConfig::default(),
        );
        let json = serde_json::to_value(&result).unwrap();
        let flags: Vec<&str> = json["flags"].as_array().unwrap().iter().filter_map(|f| f.as_str()).collect();
        assert_eq!(
            flags,
            vec![QualityFlag::LowCashConversion.message(), QualityFlag::HighAccrualRatio.message()]
        );
    }
}
