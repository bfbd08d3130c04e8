use std::path::PathBuf;

use analysis_core::{extract_metrics, FinancialStatements, PriceSeries};
use anyhow::Context;
use clap::Args;
use fear_greed_index::{compute_macro_index, MarketBasket};
use forensic_analysis::{assess_earnings_quality, detect_distortion, summarize_portfolio};
use fundamental_analysis::{rate, score_batch, score_security, ScoreRequest};
use serde::Deserialize;
use serde_json::{json, Value};
use technical_analysis::overhead_supply;
use tracing::info;

use crate::config::AppConfig;
use crate::input::{read_json, read_value};

#[derive(Args)]
pub struct ScoreArgs {
    /// Provider info snapshot (JSON object)
    #[arg(long, required_unless_present = "batch", conflicts_with = "batch")]
    pub info: Option<PathBuf>,

    /// Price history: JSON array of daily bars
    #[arg(long, conflicts_with = "batch")]
    pub prices: Option<PathBuf>,

    /// JSON array of {symbol, info, prices} to score in parallel
    #[arg(long)]
    pub batch: Option<PathBuf>,
}

#[derive(Args)]
pub struct RateArgs {
    /// Composite score in [0, 100]
    pub score: f64,
}

#[derive(Args)]
pub struct DistortionArgs {
    #[arg(long)]
    pub info: PathBuf,

    /// Financial statement tables (JSON)
    #[arg(long)]
    pub statements: PathBuf,
}

#[derive(Args)]
pub struct QualityArgs {
    #[arg(long)]
    pub statements: PathBuf,
}

#[derive(Args)]
pub struct MacroArgs {
    /// Ticker -> price history map (JSON)
    #[arg(long)]
    pub basket: PathBuf,
}

#[derive(Args)]
pub struct SupplyArgs {
    /// Price history: JSON array of daily bars with volume
    #[arg(long)]
    pub prices: PathBuf,
}

#[derive(Args)]
pub struct PortfolioArgs {
    /// JSON array of {symbol, info, statements}
    #[arg(long)]
    pub positions: PathBuf,
}

#[derive(Deserialize)]
struct BatchItem {
    symbol: String,
    info: Value,
    #[serde(default)]
    prices: PriceSeries,
}

#[derive(Deserialize)]
struct Position {
    symbol: String,
    info: Value,
    #[serde(default)]
    statements: FinancialStatements,
}

pub fn run_score(args: ScoreArgs, config: &AppConfig) -> anyhow::Result<Value> {
    if let Some(path) = args.batch {
        let items: Vec<BatchItem> = read_json(&path)?;
        let requests = items
            .into_iter()
            .map(|item| {
                let metrics = extract_metrics(&item.info)
                    .with_context(|| format!("bad info snapshot for {}", item.symbol))?;
                Ok(ScoreRequest {
                    symbol: item.symbol,
                    metrics,
                    prices: item.prices,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        info!("Scoring {} securities", requests.len());
        return Ok(serde_json::to_value(score_batch(&requests, &config.scoring))?);
    }

    let info_path = args.info.context("--info is required")?;
    let metrics = extract_metrics(&read_value(&info_path)?)
        .with_context(|| format!("bad info snapshot in {}", info_path.display()))?;
    let prices: PriceSeries = match args.prices {
        Some(path) => read_json(&path)?,
        None => PriceSeries::default(),
    };

    let result = score_security(&metrics, &prices, &config.scoring);
    Ok(serde_json::to_value(result)?)
}

pub fn run_rate(args: RateArgs) -> anyhow::Result<Value> {
    let rating = rate(args.score);
    Ok(json!({
        "score": args.score,
        "rating": rating,
        "color": rating.color_hint(),
    }))
}

pub fn run_distortion(args: DistortionArgs, config: &AppConfig) -> anyhow::Result<Value> {
    let metrics = extract_metrics(&read_value(&args.info)?)?;
    let statements: FinancialStatements = read_json(&args.statements)?;
    let result = detect_distortion(&metrics, &statements, &config.forensics);
    Ok(serde_json::to_value(result)?)
}

pub fn run_quality(args: QualityArgs, config: &AppConfig) -> anyhow::Result<Value> {
    let statements: FinancialStatements = read_json(&args.statements)?;
    Ok(serde_json::to_value(assess_earnings_quality(&statements, &config.forensics))?)
}

pub fn run_macro(args: MacroArgs, config: &AppConfig) -> anyhow::Result<Value> {
    let basket: MarketBasket = read_json(&args.basket)?;
    info!("Computing macro index over {} series", basket.len());
    Ok(serde_json::to_value(compute_macro_index(&basket, &config.macro_index))?)
}

pub fn run_supply(args: SupplyArgs, config: &AppConfig) -> anyhow::Result<Value> {
    let prices: PriceSeries = read_json(&args.prices)?;
    Ok(serde_json::to_value(overhead_supply(&prices, &config.volume_profile))?)
}

pub fn run_portfolio(args: PortfolioArgs, config: &AppConfig) -> anyhow::Result<Value> {
    let positions: Vec<Position> = read_json(&args.positions)?;

    let mut symbols = Vec::with_capacity(positions.len());
    let mut results = Vec::with_capacity(positions.len());
    for p in positions {
        let metrics = extract_metrics(&p.info)
            .with_context(|| format!("bad info snapshot for {}", p.symbol))?;
        results.push(detect_distortion(&metrics, &p.statements, &config.forensics));
        symbols.push(p.symbol);
    }

    let summary = summarize_portfolio(&results);
    let per_position: Vec<Value> = symbols
        .iter()
        .zip(&results)
        .map(|(symbol, r)| json!({ "symbol": symbol, "distortion": r }))
        .collect();

    Ok(json!({
        "summary": summary,
        "positions": per_position,
    }))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use analysis_core::Bar;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, NaiveDate};
    use tempfile::tempdir;

    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn flat_series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        PriceSeries::from_closes(start, closes).unwrap()
    }

    #[test]
    fn test_score_reads_files_and_config() {
        let temp = tempdir().expect("tempdir");
        let config_path = write(temp.path(), "config.json", r#"{"scoring": {"baseline": 40.0}}"#);
        let info = write(temp.path(), "info.json", r#"{"trailingPE": 60}"#);

        let config = AppConfig::load(Some(config_path.as_path())).unwrap();
        let args = ScoreArgs {
            info: Some(info),
            prices: None,
            batch: None,
        };
        let value = run_score(args, &config).unwrap();

        // 40 - 15 for the expensive P/E, every other category at the baseline
        assert_eq!(value["categories"]["valuation"]["score"], 25.0);
        assert_eq!(value["categories"]["risk"]["score"], 40.0);
        assert_abs_diff_eq!(value["composite"].as_f64().unwrap(), 37.0, epsilon = 1e-9);
        assert_eq!(value["derived"]["pe"], 60.0);
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let temp = tempdir().expect("tempdir");
        let batch = write(
            temp.path(),
            "batch.json",
            r#"[
                {"symbol": "CHEAP", "info": {"trailingPE": 8}},
                {"symbol": "RICH", "info": {"trailingPE": 60}}
            ]"#,
        );
        let args = ScoreArgs {
            info: None,
            prices: None,
            batch: Some(batch),
        };
        let value = run_score(args, &AppConfig::default()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["symbol"], "CHEAP");
        assert_eq!(entries[1]["symbol"], "RICH");
    }

    #[test]
    fn test_macro_uses_configured_symbols() {
        let temp = tempdir().expect("tempdir");
        let basket = MarketBasket::new().with("VIX", flat_series(&[16.0; 20]));
        let basket_path = write(temp.path(), "basket.json", &serde_json::to_string(&basket).unwrap());

        let config = AppConfig::from_json_str(r#"{"macro": {"symbols": {"volatility": "VIX"}}}"#).unwrap();
        let value = run_macro(MacroArgs { basket: basket_path.clone() }, &config).unwrap();
        assert_eq!(value["num_indicators"], 2);
        assert_eq!(value["volatility_index"], 16.0);

        // default symbols look for ^VIX and find nothing
        let value = run_macro(MacroArgs { basket: basket_path }, &AppConfig::default()).unwrap();
        assert_eq!(value["num_indicators"], 0);
        assert_eq!(value["score"], 50.0);
    }

    #[test]
    fn test_quality_honors_forensics_config() {
        let temp = tempdir().expect("tempdir");
        let statements = write(
            temp.path(),
            "statements.json",
            r#"{
                "income_annual": {"periods": ["2024-12-31"], "lines": {"Net Income": [100.0]}},
                "cash_flow_annual": {"periods": ["2024-12-31"], "lines": {"Operating Cash Flow": [120.0]}},
                "balance_annual": {
                    "periods": ["2024-12-31", "2023-12-31"],
                    "lines": {"Total Assets": [1000.0, 1000.0]}
                }
            }"#,
        );

        // accrual ratio is -2%: below the default flag threshold
        let value = run_quality(QualityArgs { statements: statements.clone() }, &AppConfig::default()).unwrap();
        assert_eq!(value["quality_score"], 90.0);
        assert!(value["flags"].as_array().unwrap().is_empty());

        let config = AppConfig::from_json_str(r#"{"forensics": {"accrual_flag_pct": 1.0}}"#).unwrap();
        let value = run_quality(QualityArgs { statements }, &config).unwrap();
        assert_eq!(value["quality_score"], 70.0);
        assert_eq!(value["flags"][0], "High accrual ratio - potential earnings manipulation");
    }

    #[test]
    fn test_supply_reads_bars_with_volume() {
        let temp = tempdir().expect("tempdir");
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars: Vec<Bar> = (0..20)
            .map(|i| {
                let (close, volume) = match i {
                    0..=9 => (110.0, 1000.0),
                    19 => (106.5, 10.0),
                    _ => (90.0, 10.0),
                };
                Bar {
                    volume,
                    ..Bar::flat(start + Duration::days(i), close)
                }
            })
            .collect();
        let prices = write(temp.path(), "prices.json", &serde_json::to_string(&bars).unwrap());

        let value = run_supply(SupplyArgs { prices: prices.clone() }, &AppConfig::default()).unwrap();
        assert_eq!(value["current_risk"], "CRITICAL");
        assert_eq!(value["risk_score"], 90.0);

        let config = AppConfig::from_json_str(r#"{"volume_profile": {"min_bars": 30}}"#).unwrap();
        let value = run_supply(SupplyArgs { prices }, &config).unwrap();
        assert_eq!(value["current_risk"], "LOW");
        assert_eq!(value["risk_score"], 0.0);
    }

    #[test]
    fn test_rate_output() {
        let value = run_rate(RateArgs { score: 72.5 }).unwrap();
        assert_eq!(value["rating"], "BUY");
        assert_eq!(value["color"], "#3b82f6");
    }

    #[test]
    fn test_batch_item_without_prices() {
        let item: BatchItem = serde_json::from_str(r#"{"symbol": "ACME", "info": {"trailingPE": 12}}"#).unwrap();
        assert_eq!(item.symbol, "ACME");
        assert!(item.prices.is_empty());
    }

    #[test]
    fn test_position_statements_parse() {
        let raw = r#"{
            "symbol": "ACME",
            "info": {"marketCap": 10000, "trailingPE": 35},
            "statements": {
                "income_quarterly": {
                    "periods": ["2024-09-30"],
                    "lines": {"Operating Income": [100.0], "Restructuring": [20.0]}
                }
            }
        }"#;
        let p: Position = serde_json::from_str(raw).unwrap();
        let metrics = extract_metrics(&p.info).unwrap();
        let result = detect_distortion(&metrics, &p.statements, &AppConfig::default().forensics);
        assert!(result.has_distortion);
    }
}
