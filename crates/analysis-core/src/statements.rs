use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Wire shape of a statement table before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementTable {
    #[serde(default)]
    pub periods: Vec<NaiveDate>,
    #[serde(default)]
    pub lines: BTreeMap<String, Vec<Option<f64>>>,
}

/// One financial statement: line-item label to values by period, most recent
/// period first. Every row has one slot per period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StatementTable", into = "StatementTable")]
pub struct Statement {
    periods: Vec<NaiveDate>,
    lines: BTreeMap<String, Vec<Option<f64>>>,
}

impl Statement {
    pub fn new(
        periods: Vec<NaiveDate>,
        lines: BTreeMap<String, Vec<Option<f64>>>,
    ) -> Result<Self, AnalysisError> {
        if periods.windows(2).any(|w| w[0] <= w[1]) {
            return Err(AnalysisError::MalformedInput(
                "statement periods must be ordered most recent first without duplicates".to_string(),
            ));
        }
        let mut clean = BTreeMap::new();
        for (label, row) in lines {
            if row.len() != periods.len() {
                return Err(AnalysisError::MalformedInput(format!(
                    "line {:?} has {} values for {} periods",
                    label,
                    row.len(),
                    periods.len()
                )));
            }
            // NaN cells from upstream frames mean "not reported"
            let row = row.into_iter().map(|v| v.filter(|x| x.is_finite())).collect();
            clean.insert(label, row);
        }
        Ok(Self { periods, lines: clean })
    }

    /// Single-period statement from `(label, value)` pairs.
    pub fn single_period(period: NaiveDate, items: &[(&str, f64)]) -> Result<Self, AnalysisError> {
        let lines = items
            .iter()
            .map(|(label, value)| (label.to_string(), vec![Some(*value)]))
            .collect();
        Self::new(vec![period], lines)
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.lines.is_empty()
    }

    pub fn row(&self, label: &str) -> Option<&[Option<f64>]> {
        self.lines.get(label).map(|r| r.as_slice())
    }

    /// Most recent reported value of a line.
    pub fn latest(&self, label: &str) -> Option<f64> {
        self.row(label).and_then(|r| r.first().copied().flatten())
    }
}

impl TryFrom<StatementTable> for Statement {
    type Error = AnalysisError;

    fn try_from(table: StatementTable) -> Result<Self, Self::Error> {
        Self::new(table.periods, table.lines)
    }
}

impl From<Statement> for StatementTable {
    fn from(s: Statement) -> Self {
        Self {
            periods: s.periods,
            lines: s.lines,
        }
    }
}

/// The statement tables the forensic estimators read. Any of them may be
/// missing; the estimators degrade to neutral results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialStatements {
    pub income_quarterly: Option<Statement>,
    pub income_annual: Option<Statement>,
    pub balance_quarterly: Option<Statement>,
    pub balance_annual: Option<Statement>,
    pub cash_flow_quarterly: Option<Statement>,
    pub cash_flow_annual: Option<Statement>,
}
