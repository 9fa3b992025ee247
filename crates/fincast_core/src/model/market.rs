use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Qualitative market state classification.
///
/// The regime drives two hardcoded multiplier tables: a volatility multiplier
/// applied inside the simulation step, and a growth multiplier applied when
/// deriving scenario growth rates from market observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketRegime {
    Bull,
    Bear,
    Sideways,
}

impl MarketRegime {
    /// Multiplier applied to each scenario's volatility factor during
    /// simulation. Bear markets amplify idiosyncratic shocks, bull markets
    /// dampen them.
    #[must_use]
    pub fn volatility_multiplier(self) -> f64 {
        match self {
            MarketRegime::Bull => 0.8,
            MarketRegime::Bear => 1.4,
            MarketRegime::Sideways => 1.0,
        }
    }

    /// Multiplier applied to the baseline revenue-growth assumptions when the
    /// parameter provider derives a bundle from market observations.
    #[must_use]
    pub fn growth_multiplier(self) -> f64 {
        match self {
            MarketRegime::Bull => 1.2,
            MarketRegime::Bear => 0.7,
            MarketRegime::Sideways => 0.9,
        }
    }

    /// Wire-format label (`BULL`, `BEAR`, `SIDEWAYS`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MarketRegime::Bull => "BULL",
            MarketRegime::Bear => "BEAR",
            MarketRegime::Sideways => "SIDEWAYS",
        }
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared market observations consumed by every scenario in a bundle.
///
/// Immutable per invocation. How these values are measured (index history,
/// moving averages, treasury yields) is the parameter provider's concern; the
/// engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    pub regime: MarketRegime,
    /// Classifier confidence in the regime label, in [0, 1].
    pub regime_confidence: f64,
    /// Annualized market volatility, non-negative.
    pub market_volatility: f64,
    pub risk_free_rate: f64,
    /// Sector name to trailing monthly return.
    #[serde(default)]
    pub sector_performance: HashMap<String, f64>,
}

impl MarketContext {
    // Defaults used when the upstream market-data collaborator is
    // unavailable: sideways regime at even confidence, 20% annual volatility,
    // 4.5% risk-free rate.
    pub const FALLBACK_REGIME_CONFIDENCE: f64 = 0.5;
    pub const FALLBACK_MARKET_VOLATILITY: f64 = 0.20;
    pub const FALLBACK_RISK_FREE_RATE: f64 = 0.045;

    /// Context used when no live market observations are available.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            regime: MarketRegime::Sideways,
            regime_confidence: Self::FALLBACK_REGIME_CONFIDENCE,
            market_volatility: Self::FALLBACK_MARKET_VOLATILITY,
            risk_free_rate: Self::FALLBACK_RISK_FREE_RATE,
            sector_performance: HashMap::new(),
        }
    }

    /// Reject contexts that would poison the simulation with non-finite or
    /// out-of-range values.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.market_volatility.is_finite() || self.market_volatility < 0.0 {
            return Err(InputError::NegativeMarketVolatility(self.market_volatility));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(InputError::NonFiniteRiskFreeRate(self.risk_free_rate));
        }
        if !self.regime_confidence.is_finite()
            || !(0.0..=1.0).contains(&self.regime_confidence)
        {
            return Err(InputError::RegimeConfidenceOutOfRange(
                self.regime_confidence,
            ));
        }
        Ok(())
    }
}
