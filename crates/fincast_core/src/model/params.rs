use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::model::{MarketContext, MarketRegime};

/// The three hardcoded scenario configurations.
///
/// A closed variant rather than open-ended polymorphism: no extensibility
/// beyond base/bull/bear is implied by the dashboard contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Base,
    Bull,
    Bear,
}

impl ScenarioKind {
    /// Fixed output order: base, bull, bear.
    pub const ALL: [ScenarioKind; 3] = [ScenarioKind::Base, ScenarioKind::Bull, ScenarioKind::Bear];

    /// Stable identifier slug used in scenario ids.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            ScenarioKind::Base => "base",
            ScenarioKind::Bull => "bull",
            ScenarioKind::Bear => "bear",
        }
    }

    /// Human-readable scenario name shown on the dashboard.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            ScenarioKind::Base => "Base Case (Market-Adjusted)",
            ScenarioKind::Bull => "Bull Case (Market-Driven)",
            ScenarioKind::Bear => "Bear Case (Risk-Adjusted)",
        }
    }
}

/// Per-scenario modeling assumptions supplied by the parameter provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParameters {
    pub scenario_type: ScenarioKind,
    /// Annualized revenue growth assumption.
    pub revenue_growth: f64,
    /// Annualized idiosyncratic volatility, non-negative.
    pub volatility_factor: f64,
    /// Total margin improvement phased in linearly over the horizon.
    #[serde(default = "default_margin_improvement")]
    pub margin_improvement: f64,
    /// Correlation with the shared market factor, in [-1, 1].
    pub market_correlation: f64,
    /// Confidence interval attached to this scenario, in (0, 1).
    pub confidence_interval: f64,
}

fn default_margin_improvement() -> f64 {
    ScenarioParameters::DEFAULT_MARGIN_IMPROVEMENT
}

impl ScenarioParameters {
    pub const DEFAULT_MARGIN_IMPROVEMENT: f64 = 0.02;

    /// Reject parameter sets that would poison the simulation.
    pub fn validate(&self, expected: ScenarioKind) -> Result<(), InputError> {
        if self.scenario_type != expected {
            return Err(InputError::ScenarioTypeMismatch {
                expected,
                found: self.scenario_type,
            });
        }
        let scenario = self.scenario_type;
        for (field, value) in [
            ("revenue growth", self.revenue_growth),
            ("margin improvement", self.margin_improvement),
        ] {
            if !value.is_finite() {
                return Err(InputError::NonFiniteField {
                    scenario,
                    field,
                    value,
                });
            }
        }
        if !self.volatility_factor.is_finite() || self.volatility_factor < 0.0 {
            return Err(InputError::NegativeVolatilityFactor {
                scenario,
                value: self.volatility_factor,
            });
        }
        if !self.market_correlation.is_finite()
            || !(-1.0..=1.0).contains(&self.market_correlation)
        {
            return Err(InputError::CorrelationOutOfRange {
                scenario,
                value: self.market_correlation,
            });
        }
        if !self.confidence_interval.is_finite()
            || self.confidence_interval <= 0.0
            || self.confidence_interval >= 1.0
        {
            return Err(InputError::ConfidenceOutOfRange {
                scenario,
                value: self.confidence_interval,
            });
        }
        Ok(())
    }
}

/// The full input to a projection run: three scenario parameter sets plus the
/// shared market context they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterBundle {
    pub base: ScenarioParameters,
    pub bull: ScenarioParameters,
    pub bear: ScenarioParameters,
    pub market_context: MarketContext,
}

// Baseline assumptions scaled by the regime growth multiplier when deriving a
// bundle from market observations.
const BASE_REVENUE_GROWTH: f64 = 0.12;
const BULL_REVENUE_GROWTH: f64 = 0.25;
const BEAR_REVENUE_GROWTH: f64 = -0.05;

const BASE_VOLATILITY_SCALE: f64 = 0.8;
const BULL_VOLATILITY_SCALE: f64 = 1.2;
const BEAR_VOLATILITY_SCALE: f64 = 1.5;

const BASE_MARKET_CORRELATION: f64 = 0.6;
const BULL_MARKET_CORRELATION: f64 = 0.8;
const BEAR_MARKET_CORRELATION: f64 = 0.9;

const BASE_CONFIDENCE_INTERVAL: f64 = 0.68;
const BULL_CONFIDENCE_INTERVAL: f64 = 0.90;
const BEAR_CONFIDENCE_INTERVAL: f64 = 0.75;

impl ParameterBundle {
    /// Derive the three scenario parameter sets from market observations.
    ///
    /// Growth assumptions scale with the regime growth multiplier; volatility
    /// factors scale off the observed market volatility. Correlation and
    /// confidence levels are fixed per scenario.
    #[must_use]
    pub fn from_context(market_context: MarketContext) -> Self {
        let growth_multiplier = market_context.regime.growth_multiplier();
        let market_volatility = market_context.market_volatility;

        let params = |kind, growth: f64, vol_scale: f64, correlation, confidence| {
            ScenarioParameters {
                scenario_type: kind,
                revenue_growth: growth * growth_multiplier,
                volatility_factor: market_volatility * vol_scale,
                margin_improvement: ScenarioParameters::DEFAULT_MARGIN_IMPROVEMENT,
                market_correlation: correlation,
                confidence_interval: confidence,
            }
        };

        Self {
            base: params(
                ScenarioKind::Base,
                BASE_REVENUE_GROWTH,
                BASE_VOLATILITY_SCALE,
                BASE_MARKET_CORRELATION,
                BASE_CONFIDENCE_INTERVAL,
            ),
            bull: params(
                ScenarioKind::Bull,
                BULL_REVENUE_GROWTH,
                BULL_VOLATILITY_SCALE,
                BULL_MARKET_CORRELATION,
                BULL_CONFIDENCE_INTERVAL,
            ),
            bear: params(
                ScenarioKind::Bear,
                BEAR_REVENUE_GROWTH,
                BEAR_VOLATILITY_SCALE,
                BEAR_MARKET_CORRELATION,
                BEAR_CONFIDENCE_INTERVAL,
            ),
            market_context,
        }
    }

    /// Bundle used when the upstream provider is unavailable. Always
    /// well-formed, so the engine needs no special-casing for provider
    /// outages.
    #[must_use]
    pub fn fallback() -> Self {
        Self::from_context(MarketContext::fallback())
    }

    /// Parameter set for a scenario slot.
    #[must_use]
    pub fn params_for(&self, kind: ScenarioKind) -> &ScenarioParameters {
        match kind {
            ScenarioKind::Base => &self.base,
            ScenarioKind::Bull => &self.bull,
            ScenarioKind::Bear => &self.bear,
        }
    }

    /// Validate every scenario slot and the shared context.
    pub fn validate(&self) -> Result<(), InputError> {
        for kind in ScenarioKind::ALL {
            self.params_for(kind).validate(kind)?;
        }
        self.market_context.validate()
    }
}
