use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use fear_greed_index::MacroConfig;
use forensic_analysis::ForensicsConfig;
use fundamental_analysis::ScoringConfig;
use serde::{Deserialize, Serialize};
use technical_analysis::VolumeProfileParams;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "INVEST_SCORE_CONFIG";

/// Every tunable of the engine. Sections left out of the file keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub forensics: ForensicsConfig,
    #[serde(rename = "macro")]
    pub macro_index: MacroConfig,
    pub volume_profile: VolumeProfileParams,
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let config: AppConfig = serde_json::from_str(raw).context("invalid config JSON")?;
        config.scoring.validate()?;
        Ok(config)
    }

    /// Load from `path`, else from `$INVEST_SCORE_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let Some(path) = path else {
            tracing::debug!("no config file, using defaults");
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json_str(&raw)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(AppConfig::from_json_str("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_sections_override_independently() {
        let config = AppConfig::from_json_str(
            r#"{
                "scoring": {"baseline": 40.0},
                "forensics": {"tax_rate": 0.25},
                "macro": {"short_window": 10, "symbols": {"volatility": "VIX"}},
                "volume_profile": {"bins": 30}
            }"#,
        )
        .unwrap();

        assert_eq!(config.scoring.baseline, 40.0);
        assert_eq!(config.forensics.tax_rate.value(), 0.25);
        assert_eq!(config.macro_index.short_window, 10);
        assert_eq!(config.macro_index.symbols.volatility, "VIX");
        assert_eq!(config.macro_index.symbols.broad_market, "SPY");
        assert_eq!(config.volume_profile.bins, 30);
        assert_eq!(config.volume_profile.min_bars, 20);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AppConfig::from_json_str(r#"{"scoring": {"weights": {"risk": -1}}}"#).is_err());
        assert!(AppConfig::from_json_str(r#"{"scoring": {"baseline": 150}}"#).is_err());
        assert!(AppConfig::from_json_str(r#"{"forensics": {"tax_rate": 1.0}}"#).is_err());
    }
}
