//! Scenario-level risk analytics derived from projection series.
//!
//! Every function here is total: degenerate inputs (empty series, zero
//! variance, zero denominators) produce a defined default of 0.0 instead of
//! propagating NaN or infinity into a user-facing report.

use crate::model::{MarketContext, Projection, ScenarioAnalytics, ScenarioParameters};

const MONTHS_PER_YEAR: f64 = 12.0;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, matching the convention of the dashboard's
/// historical analytics.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Total growth across the series: last over first, minus one.
#[must_use]
pub fn total_growth(series: &[i64]) -> f64 {
    match (series.first(), series.last()) {
        (Some(&first), Some(&last)) if first != 0 => last as f64 / first as f64 - 1.0,
        _ => 0.0,
    }
}

/// Coefficient of variation of the series (stdev over mean).
#[must_use]
pub fn realized_volatility(series: &[i64]) -> f64 {
    let values: Vec<f64> = series.iter().map(|&v| v as f64).collect();
    let m = mean(&values);
    if m == 0.0 {
        return 0.0;
    }
    let volatility = std_dev(&values) / m;
    if volatility.is_finite() { volatility } else { 0.0 }
}

/// Annualized Sharpe ratio of period-over-period returns on the series.
///
/// Returns 0.0 when the return variance is zero, when any prior-period value
/// is zero, or when the computation degenerates to a non-finite value.
#[must_use]
pub fn sharpe_ratio(series: &[i64], risk_free_rate: f64) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let mut returns = Vec::with_capacity(series.len() - 1);
    for window in series.windows(2) {
        let prior = window[0] as f64;
        if prior == 0.0 {
            return 0.0;
        }
        returns.push((window[1] as f64 - prior) / prior);
    }
    let volatility = std_dev(&returns);
    if volatility <= 0.0 || !volatility.is_finite() {
        return 0.0;
    }
    let excess_return = mean(&returns) * MONTHS_PER_YEAR - risk_free_rate;
    let sharpe = excess_return / (volatility * MONTHS_PER_YEAR.sqrt());
    if sharpe.is_finite() { sharpe } else { 0.0 }
}

/// Maximum drawdown of the series as a fraction of the running peak.
///
/// Peaks at or below zero are skipped (a drawdown from a non-positive peak is
/// not meaningful), and the result is capped at 1.0 so a collapse below zero
/// reads as a full drawdown.
#[must_use]
pub fn max_drawdown(series: &[i64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }

    let mut peak = series[0] as f64;
    let mut max_drawdown = 0.0;

    for &value in series {
        let value = value as f64;
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let drawdown = (peak - value) / peak;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown.min(1.0)
}

/// Derive the full analytics record for a simulated scenario.
#[must_use]
pub fn summarize(
    projections: &[Projection],
    params: &ScenarioParameters,
    context: &MarketContext,
) -> ScenarioAnalytics {
    let revenue: Vec<i64> = projections.iter().map(|p| p.revenue).collect();
    let ebitda: Vec<i64> = projections.iter().map(|p| p.ebitda).collect();
    let margins: Vec<f64> = projections.iter().map(|p| p.ebitda_margin).collect();

    ScenarioAnalytics {
        total_revenue_growth: total_growth(&revenue),
        average_ebitda_margin: mean(&margins),
        realized_volatility: realized_volatility(&revenue),
        market_regime: context.regime,
        confidence_interval: params.confidence_interval,
        sharpe_ratio: sharpe_ratio(&ebitda, context.risk_free_rate),
        max_drawdown: max_drawdown(&ebitda),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_growth_basic() {
        assert_eq!(total_growth(&[100, 150]), 0.5);
        assert_eq!(total_growth(&[100]), 0.0);
        assert_eq!(total_growth(&[]), 0.0);
        assert_eq!(total_growth(&[0, 100]), 0.0);
    }

    #[test]
    fn test_realized_volatility_constant_series_is_zero() {
        assert_eq!(realized_volatility(&[500; 36]), 0.0);
    }

    #[test]
    fn test_sharpe_ratio_known_value() {
        // Returns alternate between +10% and roughly -9.09%, so the stdev is
        // well above zero and the ratio is finite.
        let series = [100, 110, 100, 110, 100];
        let sharpe = sharpe_ratio(&series, 0.045);
        assert!(sharpe.is_finite());
    }

    #[test]
    fn test_sharpe_ratio_zero_prior_falls_back() {
        assert_eq!(sharpe_ratio(&[0, 100, 200], 0.045), 0.0);
    }

    #[test]
    fn test_max_drawdown_known_series() {
        // Peak 200, trough 120: drawdown 40%.
        let series = [100, 200, 150, 120, 180];
        assert!((max_drawdown(&series) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_max_drawdown_capped_at_one() {
        // Collapse below zero from a positive peak reads as a full drawdown.
        let series = [100, -250];
        assert_eq!(max_drawdown(&series), 1.0);
    }

    #[test]
    fn test_max_drawdown_all_negative_is_zero() {
        // No positive peak, so no meaningful drawdown.
        assert_eq!(max_drawdown(&[-50, -80, -20]), 0.0);
    }
}
