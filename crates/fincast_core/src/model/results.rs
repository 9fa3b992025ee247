//! Projection results returned to the dashboard
//!
//! Field names on these types are part of the wire contract with the frontend
//! and must not change; the serde renames pin them to the JSON the dashboard
//! consumes.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::model::{MarketRegime, ScenarioKind};

/// One simulated monthly period of the income-statement to cash-flow
/// waterfall.
///
/// Monetary fields are integer-rounded currency units. Within a scenario,
/// projections are strictly ordered by `month_index` and by `date`, and
/// satisfy `gross_profit = revenue - cogs` and `ebitda = gross_profit - opex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub month_index: u32,
    /// Issue date plus 30 days per elapsed period.
    pub date: Date,
    pub revenue: i64,
    pub cogs: i64,
    pub gross_profit: i64,
    pub opex: i64,
    pub ebitda: i64,
    pub net_income: i64,
    pub cash_flow: i64,
    pub ebitda_margin: f64,
    /// This month's realized stochastic shock; feeds the next month's
    /// volatility-clustering term.
    pub volatility_shock: f64,
    pub market_correlation: f64,
    pub seasonal_factor: f64,
}

/// Summary risk analytics derived from a scenario's projection series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAnalytics {
    /// Last over first revenue, minus one.
    pub total_revenue_growth: f64,
    pub average_ebitda_margin: f64,
    /// Stdev of the revenue series over its mean.
    pub realized_volatility: f64,
    pub market_regime: MarketRegime,
    pub confidence_interval: f64,
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline of the EBITDA series, in [0, 1].
    pub max_drawdown: f64,
}

/// A fully populated projection scenario: assumptions, 36 monthly periods,
/// and summary analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub scenario_type: ScenarioKind,
    pub description: String,
    pub revenue_growth: f64,
    pub margin_improvement: f64,
    pub working_capital_days: u32,
    pub capex_as_percent_revenue: f64,
    pub projections: Vec<Projection>,
    pub analytics: ScenarioAnalytics,
}

impl Scenario {
    /// Revenue series across the projection horizon.
    #[must_use]
    pub fn revenue_series(&self) -> Vec<i64> {
        self.projections.iter().map(|p| p.revenue).collect()
    }

    /// EBITDA series across the projection horizon.
    #[must_use]
    pub fn ebitda_series(&self) -> Vec<i64> {
        self.projections.iter().map(|p| p.ebitda).collect()
    }
}
