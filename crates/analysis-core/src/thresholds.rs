//! Declarative threshold tables.
//!
//! Every scorer in the workspace maps a raw value onto points or a score with
//! an ordered list of `(condition, outcome)` buckets where the first match
//! wins. Keeping the tables as data puts each tunable number in exactly one
//! place and lets the tests probe boundaries mechanically.

use serde::{Deserialize, Serialize};

/// Predicate over a single value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cond {
    Gt(f64),
    Ge(f64),
    Lt(f64),
    Le(f64),
    /// `low <= x <= high`
    Closed(f64, f64),
    /// `low <= x < high`
    ClosedOpen(f64, f64),
    /// `low < x <= high`
    OpenClosed(f64, f64),
    Any,
}

impl Cond {
    pub fn matches(self, x: f64) -> bool {
        match self {
            Cond::Gt(t) => x > t,
            Cond::Ge(t) => x >= t,
            Cond::Lt(t) => x < t,
            Cond::Le(t) => x <= t,
            Cond::Closed(lo, hi) => x >= lo && x <= hi,
            Cond::ClosedOpen(lo, hi) => x >= lo && x < hi,
            Cond::OpenClosed(lo, hi) => x > lo && x <= hi,
            Cond::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket<T> {
    pub when: Cond,
    pub then: T,
}

pub const fn bucket<T>(when: Cond, then: T) -> Bucket<T> {
    Bucket { when, then }
}

/// Outcome of the first bucket whose condition holds.
pub fn first_match<T: Copy>(table: &[Bucket<T>], x: f64) -> Option<T> {
    table.iter().find(|b| b.when.matches(x)).map(|b| b.then)
}

/// Mutually exclusive point adjustments keyed on one input.
#[derive(Debug, Clone, Copy)]
pub struct RuleGroup {
    pub name: &'static str,
    pub buckets: &'static [Bucket<f64>],
}

impl RuleGroup {
    pub fn points(&self, x: f64) -> Option<f64> {
        first_match(self.buckets, x)
    }
}

/// Provenance of one applied bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleHit {
    pub rule: String,
    pub input: f64,
    pub points: f64,
}

/// Running total for one category: starts at a baseline, accumulates signed
/// adjustments, clamps only when finished.
#[derive(Debug, Clone)]
pub struct ScoreCard {
    total: f64,
    hits: Vec<RuleHit>,
}

impl ScoreCard {
    pub fn new(baseline: f64) -> Self {
        Self {
            total: baseline,
            hits: Vec::new(),
        }
    }

    /// Apply `group` to `input`. Absent or non-finite inputs skip the group entirely.
    pub fn apply(&mut self, group: &RuleGroup, input: Option<f64>) {
        let Some(x) = input.filter(|v| v.is_finite()) else {
            return;
        };
        if let Some(points) = group.points(x) {
            self.adjust(group.name, x, points);
        }
    }

    /// Record an adjustment decided outside a table (multi-input rules).
    pub fn adjust(&mut self, rule: &str, input: f64, points: f64) {
        self.total += points;
        self.hits.push(RuleHit {
            rule: rule.to_string(),
            input,
            points,
        });
    }

    pub fn raw_total(&self) -> f64 {
        self.total
    }

    /// Final score clamped to [0, 100] together with the rules that fired.
    pub fn finish(self) -> (f64, Vec<RuleHit>) {
        (self.total.clamp(0.0, 100.0), self.hits)
    }
}
