use crate::Statement;

/// A located statement line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem {
    pub label: &'static str,
    pub value: f64,
}

/// Strategy for finding a financial concept among provider-specific labels.
///
/// Implementors only supply the ordered candidates; lookups try them in
/// order against a statement and never hand-roll per-caller fallbacks.
pub trait LineItemLookup {
    /// Human name of the concept, used in logs and provenance.
    fn concept(&self) -> &str;

    fn candidates(&self) -> &[&'static str];

    /// First candidate whose most recent value is reported.
    fn find_latest(&self, statement: &Statement) -> Option<LineItem> {
        self.candidates().iter().find_map(|&label| {
            statement.latest(label).map(|value| LineItem { label, value })
        })
    }

    /// Full row of the first candidate whose most recent value is reported.
    fn find_row<'a>(&self, statement: &'a Statement) -> Option<(&'static str, &'a [Option<f64>])> {
        self.candidates().iter().find_map(|&label| {
            statement
                .row(label)
                .filter(|row| row.first().copied().flatten().is_some())
                .map(|row| (label, row))
        })
    }

    /// Every candidate with a reported most recent value, in candidate order.
    fn find_all(&self, statement: &Statement) -> Vec<LineItem> {
        self.candidates()
            .iter()
            .filter_map(|&label| statement.latest(label).map(|value| LineItem { label, value }))
            .collect()
    }
}

/// Ordered list of label variants for one concept.
#[derive(Debug, Clone, Copy)]
pub struct AliasList {
    concept: &'static str,
    aliases: &'static [&'static str],
}

impl AliasList {
    pub const fn new(concept: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { concept, aliases }
    }
}

impl LineItemLookup for AliasList {
    fn concept(&self) -> &str {
        self.concept
    }

    fn candidates(&self) -> &[&'static str] {
        self.aliases
    }
}
