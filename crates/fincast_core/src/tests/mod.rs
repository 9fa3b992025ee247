//! Integration tests for the scenario projection engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Output shape, ordering, and accounting identities
//! - `determinism` - Seed reproducibility and margin bound properties
//! - `deterministic_path` - Zero-noise golden revenue path
//! - `analytics` - Sharpe ratio, drawdown, and volatility edge cases
//! - `wire` - JSON field-name contract for the dashboard API

mod scenarios;

use std::collections::HashMap;

use crate::model::{MarketContext, MarketRegime, ParameterBundle, ScenarioKind, ScenarioParameters};

/// Bundle with every stochastic input switched off: zero volatility factors,
/// zero market volatility, zero correlation. Revenue paths under this bundle
/// are fully deterministic.
pub(crate) fn zero_noise_bundle() -> ParameterBundle {
    let market_context = MarketContext {
        regime: MarketRegime::Sideways,
        regime_confidence: 0.5,
        market_volatility: 0.0,
        risk_free_rate: 0.045,
        sector_performance: HashMap::new(),
    };
    let params = |kind, growth| ScenarioParameters {
        scenario_type: kind,
        revenue_growth: growth,
        volatility_factor: 0.0,
        margin_improvement: 0.02,
        market_correlation: 0.0,
        confidence_interval: 0.68,
    };
    ParameterBundle {
        base: params(ScenarioKind::Base, 0.12),
        bull: params(ScenarioKind::Bull, 0.25),
        bear: params(ScenarioKind::Bear, -0.05),
        market_context,
    }
}
