use serde::{Deserialize, Serialize};

/// Ticker of each basket role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasketSymbols {
    /// Volatility index
    pub volatility: String,
    /// 3-month forward volatility index
    pub volatility_3m: String,
    /// Cap-weighted broad market
    pub broad_market: String,
    pub equal_weight: String,
    pub high_yield: String,
    pub investment_grade: String,
    pub long_treasury: String,
    pub cyclical: String,
    pub defensive: String,
}

impl Default for BasketSymbols {
    fn default() -> Self {
        Self {
            volatility: "^VIX".to_string(),
            volatility_3m: "^VIX3M".to_string(),
            broad_market: "SPY".to_string(),
            equal_weight: "RSP".to_string(),
            high_yield: "HYG".to_string(),
            investment_grade: "LQD".to_string(),
            long_treasury: "TLT".to_string(),
            cyclical: "XLY".to_string(),
            defensive: "XLP".to_string(),
        }
    }
}

/// Basket symbols and the history windows (in sessions) each indicator uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroConfig {
    pub symbols: BasketSymbols,
    pub trend_lookback: usize,
    pub short_window: usize,
    pub momentum_window: usize,
    pub high_window: usize,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            symbols: BasketSymbols::default(),
            trend_lookback: 14,
            short_window: 20,
            momentum_window: 125,
            high_window: 252,
        }
    }
}
