//! invest-score: score securities, forensic checks and the macro index from
//! already-fetched JSON snapshots.
//!
//! Usage:
//!   invest-score score --info aapl_info.json --prices aapl_prices.json
//!   invest-score score --batch watchlist.json
//!   invest-score rate 72.5
//!   invest-score distortion --info aapl_info.json --statements aapl_statements.json
//!   invest-score quality --statements aapl_statements.json
//!   invest-score macro --basket basket.json
//!   invest-score supply --prices aapl_prices.json
//!   invest-score portfolio --positions holdings.json
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod commands;
mod config;
mod input;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::{
    DistortionArgs, MacroArgs, PortfolioArgs, QualityArgs, RateArgs, ScoreArgs, SupplyArgs,
};
use config::AppConfig;

#[derive(Parser)]
#[command(name = "invest-score", version, about = "Rule-based security scoring and forensic checks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (falls back to $INVEST_SCORE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Five category scores, composite and rating for one security or a batch
    Score(ScoreArgs),
    /// Map a composite score to its rating tier
    Rate(RateArgs),
    /// GAAP vs normalized earnings distortion
    Distortion(DistortionArgs),
    /// Cash conversion and accrual-based earnings quality
    Quality(QualityArgs),
    /// Macro Fear & Greed composite
    Macro(MacroArgs),
    /// Volume profile and overhead supply zones
    Supply(SupplyArgs),
    /// Distortion check across several holdings
    Portfolio(PortfolioArgs),
}

fn run(cli: Cli) -> anyhow::Result<serde_json::Value> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Score(args) => commands::run_score(args, &config),
        Commands::Rate(args) => commands::run_rate(args),
        Commands::Distortion(args) => commands::run_distortion(args, &config),
        Commands::Quality(args) => commands::run_quality(args, &config),
        Commands::Macro(args) => commands::run_macro(args, &config),
        Commands::Supply(args) => commands::run_supply(args, &config),
        Commands::Portfolio(args) => commands::run_portfolio(args, &config),
    }
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "invest_score=info,fundamental_analysis=warn,forensic_analysis=warn,fear_greed_index=warn,technical_analysis=warn".into()
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pretty = cli.pretty;

    let value = match run(cli) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("{:#}", e);
            process::exit(1);
        }
    };

    let rendered = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => {
            tracing::error!("failed to render output: {}", e);
            process::exit(1);
        }
    }
}
