use analysis_core::stats::{trailing_max, trailing_mean, trailing_return};
use analysis_core::{bucket, first_match, Bucket, Cond};
use serde::{Deserialize, Serialize};

use crate::basket::MarketBasket;
use crate::config::MacroConfig;

/// The ten macro risk-appetite indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroIndicator {
    VixLevel,
    VixTrend,
    Momentum,
    PriceStrength,
    Breadth,
    PutCall,
    JunkBond,
    SafeHaven,
    Rotation,
    Credit,
}

const VIX_LEVEL: &[Bucket<f64>] = &[
    bucket(Cond::Lt(12.0), 95.0),
    bucket(Cond::Lt(15.0), 80.0),
    bucket(Cond::Lt(18.0), 65.0),
    bucket(Cond::Lt(22.0), 50.0),
    bucket(Cond::Lt(28.0), 35.0),
    bucket(Cond::Lt(35.0), 20.0),
    bucket(Cond::Any, 5.0),
];

const VIX_TREND: &[Bucket<f64>] = &[
    bucket(Cond::Lt(-20.0), 90.0),
    bucket(Cond::Lt(-10.0), 75.0),
    bucket(Cond::Lt(-5.0), 60.0),
    bucket(Cond::Lt(5.0), 50.0),
    bucket(Cond::Lt(15.0), 35.0),
    bucket(Cond::Lt(30.0), 20.0),
    bucket(Cond::Any, 5.0),
];

const MOMENTUM: &[Bucket<f64>] = &[
    bucket(Cond::Gt(10.0), 95.0),
    bucket(Cond::Gt(6.0), 80.0),
    bucket(Cond::Gt(3.0), 65.0),
    bucket(Cond::Gt(0.0), 55.0),
    bucket(Cond::Gt(-3.0), 40.0),
    bucket(Cond::Gt(-6.0), 25.0),
    bucket(Cond::Any, 10.0),
];

const PRICE_STRENGTH: &[Bucket<f64>] = &[
    bucket(Cond::Gt(-2.0), 90.0),
    bucket(Cond::Gt(-5.0), 75.0),
    bucket(Cond::Gt(-10.0), 55.0),
    bucket(Cond::Gt(-15.0), 40.0),
    bucket(Cond::Gt(-20.0), 25.0),
    bucket(Cond::Any, 10.0),
];

const BREADTH: &[Bucket<f64>] = &[
    bucket(Cond::Gt(3.0), 85.0),
    bucket(Cond::Gt(1.0), 70.0),
    bucket(Cond::Gt(-1.0), 50.0),
    bucket(Cond::Gt(-3.0), 35.0),
    bucket(Cond::Any, 20.0),
];

const PUT_CALL: &[Bucket<f64>] = &[
    bucket(Cond::Lt(-15.0), 85.0),
    bucket(Cond::Lt(-8.0), 70.0),
    bucket(Cond::Lt(-2.0), 55.0),
    bucket(Cond::Lt(5.0), 40.0),
    bucket(Cond::Lt(15.0), 25.0),
    bucket(Cond::Any, 10.0),
];

const JUNK_BOND: &[Bucket<f64>] = &[
    bucket(Cond::Gt(2.0), 85.0),
    bucket(Cond::Gt(1.0), 70.0),
    bucket(Cond::Gt(0.0), 55.0),
    bucket(Cond::Gt(-1.0), 40.0),
    bucket(Cond::Gt(-2.0), 25.0),
    bucket(Cond::Any, 10.0),
];

const SAFE_HAVEN: &[Bucket<f64>] = &[
    bucket(Cond::Lt(-5.0), 85.0),
    bucket(Cond::Lt(-2.0), 70.0),
    bucket(Cond::Lt(1.0), 55.0),
    bucket(Cond::Lt(3.0), 40.0),
    bucket(Cond::Lt(6.0), 25.0),
    bucket(Cond::Any, 10.0),
];

const ROTATION: &[Bucket<f64>] = &[
    bucket(Cond::Gt(5.0), 90.0),
    bucket(Cond::Gt(2.0), 75.0),
    bucket(Cond::Gt(0.0), 55.0),
    bucket(Cond::Gt(-2.0), 40.0),
    bucket(Cond::Gt(-5.0), 25.0),
    bucket(Cond::Any, 10.0),
];

const CREDIT: &[Bucket<f64>] = &[
    bucket(Cond::Gt(1.5), 85.0),
    bucket(Cond::Gt(0.5), 70.0),
    bucket(Cond::Gt(-0.5), 50.0),
    bucket(Cond::Gt(-1.5), 35.0),
    bucket(Cond::Any, 15.0),
];

impl MacroIndicator {
    pub const ALL: [MacroIndicator; 10] = [
        MacroIndicator::VixLevel,
        MacroIndicator::VixTrend,
        MacroIndicator::Momentum,
        MacroIndicator::PriceStrength,
        MacroIndicator::Breadth,
        MacroIndicator::PutCall,
        MacroIndicator::JunkBond,
        MacroIndicator::SafeHaven,
        MacroIndicator::Rotation,
        MacroIndicator::Credit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MacroIndicator::VixLevel => "vix_level",
            MacroIndicator::VixTrend => "vix_trend",
            MacroIndicator::Momentum => "momentum",
            MacroIndicator::PriceStrength => "price_strength",
            MacroIndicator::Breadth => "breadth",
            MacroIndicator::PutCall => "put_call",
            MacroIndicator::JunkBond => "junk_bond",
            MacroIndicator::SafeHaven => "safe_haven",
            MacroIndicator::Rotation => "rotation",
            MacroIndicator::Credit => "credit",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            MacroIndicator::VixLevel => "VIX Level",
            MacroIndicator::VixTrend => "VIX 14D Change",
            MacroIndicator::Momentum => "Market Momentum",
            MacroIndicator::PriceStrength => "52W High Distance",
            MacroIndicator::Breadth => "Market Breadth",
            MacroIndicator::PutCall => "VIX Term Structure",
            MacroIndicator::JunkBond => "Junk Bond Demand",
            MacroIndicator::SafeHaven => "Safe Haven Demand",
            MacroIndicator::Rotation => "Sector Rotation",
            MacroIndicator::Credit => "Credit Spreads",
        }
    }

    fn table(&self) -> &'static [Bucket<f64>] {
        match self {
            MacroIndicator::VixLevel => VIX_LEVEL,
            MacroIndicator::VixTrend => VIX_TREND,
            MacroIndicator::Momentum => MOMENTUM,
            MacroIndicator::PriceStrength => PRICE_STRENGTH,
            MacroIndicator::Breadth => BREADTH,
            MacroIndicator::PutCall => PUT_CALL,
            MacroIndicator::JunkBond => JUNK_BOND,
            MacroIndicator::SafeHaven => SAFE_HAVEN,
            MacroIndicator::Rotation => ROTATION,
            MacroIndicator::Credit => CREDIT,
        }
    }

    /// Map a raw reading onto 0-100 (higher is greedier).
    pub fn score(&self, value: f64) -> f64 {
        first_match(self.table(), value).unwrap_or(50.0)
    }

    /// Raw reading from the basket, or `None` when a required series is
    /// missing, too short, or has a non-positive base price.
    pub fn measure(&self, basket: &MarketBasket, config: &MacroConfig) -> Option<f64> {
        let s = &config.symbols;
        let window_return = |symbol: &str| {
            basket
                .closes(symbol, config.short_window)
                .and_then(|c| trailing_return(&c, config.short_window))
        };
        let spread = |a: &str, b: &str| Some(window_return(a)? - window_return(b)?);

        match self {
            MacroIndicator::VixLevel => last(basket, &s.volatility),
            MacroIndicator::VixTrend => {
                let closes = basket.closes(&s.volatility, config.trend_lookback)?;
                trailing_return(&closes, config.trend_lookback)
            }
            MacroIndicator::Momentum => {
                let closes = basket.closes(&s.broad_market, config.momentum_window)?;
                let ma = trailing_mean(&closes, config.momentum_window).filter(|m| *m > 0.0)?;
                Some((*closes.last()? - ma) / ma * 100.0)
            }
            MacroIndicator::PriceStrength => {
                let closes = basket.closes(&s.broad_market, config.high_window)?;
                let high = trailing_max(&closes, config.high_window).filter(|h| *h > 0.0)?;
                Some((*closes.last()? - high) / high * 100.0)
            }
            MacroIndicator::Breadth => spread(&s.equal_weight, &s.broad_market),
            MacroIndicator::PutCall => {
                let vix = last(basket, &s.volatility)?;
                let vix3m = last(basket, &s.volatility_3m).filter(|v| *v > 0.0)?;
                Some((vix / vix3m - 1.0) * 100.0)
            }
            MacroIndicator::JunkBond => window_return(&s.high_yield),
            MacroIndicator::SafeHaven => spread(&s.long_treasury, &s.broad_market),
            MacroIndicator::Rotation => spread(&s.cyclical, &s.defensive),
            MacroIndicator::Credit => spread(&s.high_yield, &s.investment_grade),
        }
    }
}

fn last(basket: &MarketBasket, symbol: &str) -> Option<f64> {
    basket.get(symbol).and_then(|s| s.last_close())
}
