//! Output shape, ordering, and accounting identity tests

use crate::error::{EngineError, InputError};
use crate::model::{ParameterBundle, ScenarioKind};
use crate::simulation::{PROJECTION_MONTHS, ProjectionConfig, generate_scenarios};

fn config() -> ProjectionConfig {
    ProjectionConfig {
        base_revenue: 2_500_000.0,
        issue_date: Some(jiff::civil::date(2026, 1, 15)),
    }
}

#[test]
fn test_three_scenarios_in_fixed_order() {
    let scenarios = generate_scenarios(&config(), &ParameterBundle::fallback(), 42).unwrap();

    assert_eq!(scenarios.len(), 3);
    assert_eq!(scenarios[0].scenario_type, ScenarioKind::Base);
    assert_eq!(scenarios[1].scenario_type, ScenarioKind::Bull);
    assert_eq!(scenarios[2].scenario_type, ScenarioKind::Bear);

    assert_eq!(scenarios[0].id, "scenario-base");
    assert_eq!(scenarios[1].id, "scenario-bull");
    assert_eq!(scenarios[2].id, "scenario-bear");
}

#[test]
fn test_every_scenario_has_full_projection_horizon() {
    let scenarios = generate_scenarios(&config(), &ParameterBundle::fallback(), 42).unwrap();

    for scenario in &scenarios {
        assert_eq!(scenario.projections.len(), PROJECTION_MONTHS);
    }
}

#[test]
fn test_months_and_dates_strictly_increasing() {
    let issue_date = jiff::civil::date(2026, 1, 15);
    let scenarios = generate_scenarios(&config(), &ParameterBundle::fallback(), 42).unwrap();

    for scenario in &scenarios {
        for (i, projection) in scenario.projections.iter().enumerate() {
            assert_eq!(projection.month_index, i as u32);
            // 30 days per elapsed period from the issue date.
            let expected_date =
                issue_date.checked_add(jiff::Span::new().days(30 * (i as i64 + 1))).unwrap();
            assert_eq!(projection.date, expected_date);
        }
        for window in scenario.projections.windows(2) {
            assert!(window[0].month_index < window[1].month_index);
            assert!(window[0].date < window[1].date);
        }
    }
}

#[test]
fn test_waterfall_accounting_identities() {
    let scenarios = generate_scenarios(&config(), &ParameterBundle::fallback(), 42).unwrap();

    for scenario in &scenarios {
        for p in &scenario.projections {
            assert_eq!(
                p.gross_profit,
                p.revenue - p.cogs,
                "gross profit identity violated at month {}",
                p.month_index
            );
            assert_eq!(
                p.ebitda,
                p.gross_profit - p.opex,
                "ebitda identity violated at month {}",
                p.month_index
            );
        }
    }
}

#[test]
fn test_echoed_assumption_fields() {
    let bundle = ParameterBundle::fallback();
    let scenarios = generate_scenarios(&config(), &bundle, 42).unwrap();

    for scenario in &scenarios {
        let params = bundle.params_for(scenario.scenario_type);
        assert_eq!(scenario.revenue_growth, params.revenue_growth);
        assert_eq!(scenario.margin_improvement, params.margin_improvement);
        assert_eq!(scenario.working_capital_days, 45);
        assert_eq!(scenario.capex_as_percent_revenue, 0.035);
        assert_eq!(scenario.name, scenario.scenario_type.display_name());
        assert!(scenario.description.contains("SIDEWAYS"));

        for p in &scenario.projections {
            assert_eq!(p.market_correlation, params.market_correlation);
        }
    }
}

#[test]
fn test_analytics_echo_context_and_confidence() {
    let bundle = ParameterBundle::fallback();
    let scenarios = generate_scenarios(&config(), &bundle, 42).unwrap();

    for scenario in &scenarios {
        let params = bundle.params_for(scenario.scenario_type);
        assert_eq!(scenario.analytics.market_regime, bundle.market_context.regime);
        assert_eq!(scenario.analytics.confidence_interval, params.confidence_interval);
        assert!(scenario.analytics.max_drawdown >= 0.0);
        assert!(scenario.analytics.max_drawdown <= 1.0);
        assert!(scenario.analytics.realized_volatility >= 0.0);
        assert!(scenario.analytics.sharpe_ratio.is_finite());
    }
}

#[test]
fn test_rejects_non_positive_base_revenue() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let config = ProjectionConfig {
            base_revenue: bad,
            issue_date: None,
        };
        let result = generate_scenarios(&config, &ParameterBundle::fallback(), 42);
        assert!(
            matches!(
                result,
                Err(EngineError::Input(InputError::NonPositiveBaseRevenue(_)))
            ),
            "base revenue {bad} should be rejected"
        );
    }
}

#[test]
fn test_rejects_malformed_bundle_before_simulating() {
    let mut bundle = ParameterBundle::fallback();
    bundle.bear.volatility_factor = -0.3;

    let result = generate_scenarios(&config(), &bundle, 42);
    assert!(matches!(
        result,
        Err(EngineError::Input(InputError::NegativeVolatilityFactor { .. }))
    ));
}
