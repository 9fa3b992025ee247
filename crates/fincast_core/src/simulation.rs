//! Scenario projection engine.
//!
//! Simulates 36 monthly periods of the income-statement to cash-flow
//! waterfall for each of the three scenarios in a parameter bundle. Each
//! month combines a deterministic seasonal growth component with three
//! stochastic terms: a fat-tailed idiosyncratic shock (with volatility
//! clustering), a mean-reversion pull toward the deterministic trend, and a
//! market-correlated shock shared across scenarios through the bundle's
//! market context.
//!
//! The per-scenario state (current revenue and the previous month's shock) is
//! threaded through an explicit accumulator rather than held on a shared
//! engine object, so scenario runs cannot leak state into one another.

use std::f64::consts::{FRAC_PI_2, TAU};

use jiff::ToSpan;
use jiff::civil::Date;
use rand::distr::Distribution;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rand_distr::{StandardNormal, StudentT};

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::analytics;
use crate::error::{EngineError, InputError};
use crate::model::{
    MarketContext, ParameterBundle, Projection, Scenario, ScenarioKind, ScenarioParameters,
};

/// Number of monthly periods projected per scenario.
pub const PROJECTION_MONTHS: usize = 36;

/// Base revenue assumed when the caller does not supply one.
pub const DEFAULT_BASE_REVENUE: f64 = 2_500_000.0;

// Revenue process parameters.
const SEASONAL_AMPLITUDE: f64 = 0.15;
const SEASONAL_PHASE: f64 = FRAC_PI_2;
const SHOCK_DEGREES_OF_FREEDOM: f64 = 5.0;
const VOLATILITY_CLUSTERING_WEIGHT: f64 = 0.3;
const MEAN_REVERSION_RATE: f64 = 0.1;
const MONTHS_PER_YEAR: f64 = 12.0;

// Margin model parameters.
const BASE_MARGIN: f64 = 0.35;
const MARGIN_NOISE_STD: f64 = 0.02;
const OPERATING_LEVERAGE: f64 = 1.5;
const OPERATING_LEVERAGE_SCALE: f64 = 0.1;
const MARGIN_FLOOR: f64 = 0.15;
const MARGIN_CEILING: f64 = 0.65;

// Cost structure parameters.
const BASE_OPEX_RATE: f64 = 0.25;
const SCALE_BENEFIT_SLOPE: f64 = 0.02;
const SCALE_BENEFIT_CAP: f64 = 0.05;
const CREDIT_SPREAD: f64 = 0.02;
const DEBT_TO_REVENUE: f64 = 0.05;
const TAX_RATE: f64 = 0.25;
const LOSS_FLOW_THROUGH: f64 = 0.1;
const WORKING_CAPITAL_NOISE: f64 = 0.02;
const CAPEX_RATE: f64 = 0.035;
const WORKING_CAPITAL_DAYS: u32 = 45;

const DAYS_PER_PERIOD: i64 = 30;

/// Engine-level configuration for a projection run.
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Starting annual revenue, must be positive and finite.
    pub base_revenue: f64,
    /// Date the projection is issued from; defaults to today.
    pub issue_date: Option<Date>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            base_revenue: DEFAULT_BASE_REVENUE,
            issue_date: None,
        }
    }
}

/// Generate the three market-aware scenarios for a parameter bundle.
///
/// Output is always exactly three scenarios in base, bull, bear order, each
/// with [`PROJECTION_MONTHS`] populated projections and derived analytics.
///
/// A seed RNG deals one sub-seed per scenario, so for a fixed `seed` the
/// output is bit-identical across invocations and identical whether the
/// scenario runs execute sequentially or on the rayon pool.
pub fn generate_scenarios(
    config: &ProjectionConfig,
    bundle: &ParameterBundle,
    seed: u64,
) -> Result<Vec<Scenario>, EngineError> {
    if !config.base_revenue.is_finite() || config.base_revenue <= 0.0 {
        return Err(InputError::NonPositiveBaseRevenue(config.base_revenue).into());
    }
    bundle.validate()?;

    let issue_date = config
        .issue_date
        .unwrap_or_else(|| jiff::Zoned::now().date());

    let mut seed_rng = SmallRng::seed_from_u64(seed);
    let runs: Vec<(ScenarioKind, u64)> = ScenarioKind::ALL
        .into_iter()
        .map(|kind| (kind, seed_rng.next_u64()))
        .collect();

    let run = |(kind, scenario_seed): (ScenarioKind, u64)| {
        simulate_scenario(
            kind,
            bundle.params_for(kind),
            &bundle.market_context,
            config.base_revenue,
            issue_date,
            scenario_seed,
        )
    };

    #[cfg(feature = "parallel")]
    let scenarios: Result<Vec<Scenario>, EngineError> = runs.into_par_iter().map(run).collect();

    #[cfg(not(feature = "parallel"))]
    let scenarios: Result<Vec<Scenario>, EngineError> = runs.into_iter().map(run).collect();

    scenarios
}

/// Running state carried from one monthly step to the next within a scenario.
#[derive(Debug, Clone, Copy)]
struct MonthState {
    current_revenue: f64,
    previous_shock: f64,
}

fn simulate_scenario(
    kind: ScenarioKind,
    params: &ScenarioParameters,
    context: &MarketContext,
    base_revenue: f64,
    issue_date: Date,
    seed: u64,
) -> Result<Scenario, EngineError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let shock_dist = StudentT::new(SHOCK_DEGREES_OF_FREEDOM).map_err(|_| {
        EngineError::InvalidDistributionParameters {
            distribution: "Student's t revenue shock",
            reason: "degrees of freedom must be positive and finite",
        }
    })?;

    let base_growth = params.revenue_growth / MONTHS_PER_YEAR;
    let regime_multiplier = context.regime.volatility_multiplier();

    let mut state = MonthState {
        current_revenue: base_revenue,
        previous_shock: 0.0,
    };
    let mut projections = Vec::with_capacity(PROJECTION_MONTHS);

    for month in 0..PROJECTION_MONTHS {
        let (projection, next_state) = project_month(
            month,
            state,
            params,
            context,
            base_revenue,
            base_growth,
            regime_multiplier,
            issue_date,
            &shock_dist,
            &mut rng,
        );
        projections.push(projection);
        state = next_state;
    }

    let analytics = analytics::summarize(&projections, params, context);

    Ok(Scenario {
        id: format!("scenario-{}", kind.slug()),
        name: kind.display_name().to_string(),
        scenario_type: kind,
        description: format!(
            "{} with {} market regime adjustment",
            kind.display_name(),
            context.regime
        ),
        revenue_growth: params.revenue_growth,
        margin_improvement: params.margin_improvement,
        working_capital_days: WORKING_CAPITAL_DAYS,
        capex_as_percent_revenue: CAPEX_RATE,
        projections,
        analytics,
    })
}

/// Simulate one monthly period.
///
/// Stochastic draws happen in a fixed order (revenue shock, market shock,
/// margin noise, working-capital noise); that order is part of the
/// reproducibility contract for a given seed.
#[allow(clippy::too_many_arguments)]
fn project_month(
    month: usize,
    state: MonthState,
    params: &ScenarioParameters,
    context: &MarketContext,
    base_revenue: f64,
    base_growth: f64,
    regime_multiplier: f64,
    issue_date: Date,
    shock_dist: &StudentT<f64>,
    rng: &mut SmallRng,
) -> (Projection, MonthState) {
    let seasonal_factor =
        1.0 + SEASONAL_AMPLITUDE * (TAU * month as f64 / MONTHS_PER_YEAR + SEASONAL_PHASE).sin();

    // Volatility clustering: a large realized shock last month amplifies this
    // month's volatility.
    let mut volatility = params.volatility_factor * regime_multiplier;
    if month > 0 {
        volatility *= 1.0 + VOLATILITY_CLUSTERING_WEIGHT * state.previous_shock.abs();
    }
    let volatility_shock = shock_dist.sample(rng) * volatility / MONTHS_PER_YEAR;

    // Pull back toward the deterministic trend line at a fixed fraction of
    // the normalized deviation per month.
    let trend = base_revenue * (1.0 + base_growth * month as f64);
    let mean_reversion = -MEAN_REVERSION_RATE * ((state.current_revenue - trend) / base_revenue);

    // Shared market factor, scaled by this scenario's correlation.
    let market_sample: f64 = StandardNormal.sample(rng);
    let correlated_shock =
        params.market_correlation * market_sample * context.market_volatility / MONTHS_PER_YEAR;

    let total_growth =
        (base_growth + volatility_shock + mean_reversion + correlated_shock) * seasonal_factor;
    let current_revenue = state.current_revenue * (1.0 + total_growth);

    let margin_sample: f64 = StandardNormal.sample(rng);
    let margin_noise = margin_sample * MARGIN_NOISE_STD;
    let leverage_effect =
        total_growth * MONTHS_PER_YEAR * OPERATING_LEVERAGE * OPERATING_LEVERAGE_SCALE;
    let margin = (BASE_MARGIN
        + params.margin_improvement / PROJECTION_MONTHS as f64
        + margin_noise
        + leverage_effect)
        .clamp(MARGIN_FLOOR, MARGIN_CEILING);

    let revenue = round_currency(current_revenue);
    let cogs = round_currency(revenue as f64 * (1.0 - margin));
    let gross_profit = revenue - cogs;

    // Economies of scale: opex rate shrinks as revenue outgrows the base,
    // capped at five points of benefit.
    let scale_benefit = ((revenue as f64 / base_revenue - 1.0) * SCALE_BENEFIT_SLOPE)
        .min(SCALE_BENEFIT_CAP);
    let opex = round_currency(revenue as f64 * (BASE_OPEX_RATE - scale_benefit));
    let ebitda = gross_profit - opex;

    let interest_rate = context.risk_free_rate + CREDIT_SPREAD;
    let interest_expense = round_currency(revenue as f64 * DEBT_TO_REVENUE * interest_rate);
    let ebt = ebitda - interest_expense;
    // Losses only flow through at a reduced rate, a stand-in for loss
    // carry-forward rather than full NOL accounting.
    let net_income = if ebt > 0 {
        round_currency(ebt as f64 * (1.0 - TAX_RATE))
    } else {
        round_currency(ebt as f64 * LOSS_FLOW_THROUGH)
    };

    let working_capital_sample: f64 = StandardNormal.sample(rng);
    let working_capital_change =
        round_currency(revenue as f64 * WORKING_CAPITAL_NOISE * working_capital_sample);
    let capex = round_currency(revenue as f64 * CAPEX_RATE);
    let cash_flow = net_income + capex - working_capital_change;

    let ebitda_margin = if revenue > 0 {
        ebitda as f64 / revenue as f64
    } else {
        0.0
    };

    let date = issue_date.saturating_add((DAYS_PER_PERIOD * (month as i64 + 1)).days());

    let projection = Projection {
        month_index: month as u32,
        date,
        revenue,
        cogs,
        gross_profit,
        opex,
        ebitda,
        net_income,
        cash_flow,
        ebitda_margin,
        volatility_shock,
        market_correlation: params.market_correlation,
        seasonal_factor,
    };

    let next_state = MonthState {
        current_revenue,
        previous_shock: volatility_shock,
    };

    (projection, next_state)
}

#[inline]
fn round_currency(value: f64) -> i64 {
    value.round() as i64
}
