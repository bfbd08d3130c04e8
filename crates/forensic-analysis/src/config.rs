use analysis_core::AnalysisError;
use serde::{Deserialize, Serialize};

/// Flat statutory rate used to turn operating income into approximate net income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TaxRate(f64);

impl TaxRate {
    pub fn new(rate: f64) -> Result<Self, AnalysisError> {
        if !(0.0..1.0).contains(&rate) {
            return Err(AnalysisError::InvalidConfig(format!(
                "tax rate must be within [0, 1), got {}",
                rate
            )));
        }
        Ok(Self(rate))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn after_tax(self, pre_tax: f64) -> f64 {
        pre_tax * (1.0 - self.0)
    }
}

impl TryFrom<f64> for TaxRate {
    type Error = AnalysisError;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<TaxRate> for f64 {
    fn from(rate: TaxRate) -> Self {
        rate.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self(0.21)
    }
}

/// Constants of the distortion and earnings-quality estimators.
///
/// The quarterly run-rate (`quarters_per_year`) and flat tax rate are coarse
/// approximations; the gap thresholds were tuned against them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForensicsConfig {
    pub tax_rate: TaxRate,
    pub quarters_per_year: f64,
    /// P/E gap (percent) above which earnings count as distorted.
    pub distorted_gap_pct: f64,
    pub moderate_gap_pct: f64,
    /// Absolute accrual ratio (percent) above which the manipulation flag fires.
    pub accrual_flag_pct: f64,
    pub accrual_penalty: f64,
}

impl Default for ForensicsConfig {
    fn default() -> Self {
        Self {
            tax_rate: TaxRate::default(),
            quarters_per_year: 4.0,
            distorted_gap_pct: 15.0,
            moderate_gap_pct: 10.0,
            accrual_flag_pct: 10.0,
            accrual_penalty: 20.0,
        }
    }
}
