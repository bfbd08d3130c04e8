//! Forensic checks on financial statements: GAAP-vs-normalized earnings
//! distortion and cash-backed earnings quality.

pub mod aliases;
pub mod config;
pub mod distortion;
pub mod earnings_quality;
pub mod portfolio;

pub use config::{ForensicsConfig, TaxRate};
pub use distortion::{classify_gap, detect_distortion, Adjustment, AdjustmentKind, DistortionResult, DistortionSignal};
pub use earnings_quality::{assess_earnings_quality, conversion_score, QualityFlag, QualityResult};
pub use portfolio::{summarize_portfolio, PortfolioDistortion, PortfolioVerdict};
