use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Input has the wrong shape for its contract (not an object, ragged
    /// statement rows, unordered price dates, non-numeric metric values).
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
