use std::fmt;

use crate::model::ScenarioKind;

/// Errors raised when rejecting malformed engine input before simulating
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    NonPositiveBaseRevenue(f64),
    NonFiniteField {
        scenario: ScenarioKind,
        field: &'static str,
        value: f64,
    },
    NegativeVolatilityFactor {
        scenario: ScenarioKind,
        value: f64,
    },
    CorrelationOutOfRange {
        scenario: ScenarioKind,
        value: f64,
    },
    ConfidenceOutOfRange {
        scenario: ScenarioKind,
        value: f64,
    },
    ScenarioTypeMismatch {
        expected: ScenarioKind,
        found: ScenarioKind,
    },
    NegativeMarketVolatility(f64),
    NonFiniteRiskFreeRate(f64),
    RegimeConfidenceOutOfRange(f64),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NonPositiveBaseRevenue(value) => {
                write!(f, "base revenue must be positive and finite, got {value}")
            }
            InputError::NonFiniteField {
                scenario,
                field,
                value,
            } => {
                write!(f, "{scenario:?} scenario {field} must be finite, got {value}")
            }
            InputError::NegativeVolatilityFactor { scenario, value } => {
                write!(
                    f,
                    "{scenario:?} scenario volatility factor must be non-negative, got {value}"
                )
            }
            InputError::CorrelationOutOfRange { scenario, value } => {
                write!(
                    f,
                    "{scenario:?} scenario market correlation must lie in [-1, 1], got {value}"
                )
            }
            InputError::ConfidenceOutOfRange { scenario, value } => {
                write!(
                    f,
                    "{scenario:?} scenario confidence interval must lie in (0, 1), got {value}"
                )
            }
            InputError::ScenarioTypeMismatch { expected, found } => {
                write!(
                    f,
                    "parameter bundle slot for {expected:?} carries {found:?} parameters"
                )
            }
            InputError::NegativeMarketVolatility(value) => {
                write!(f, "market volatility must be non-negative, got {value}")
            }
            InputError::NonFiniteRiskFreeRate(value) => {
                write!(f, "risk-free rate must be finite, got {value}")
            }
            InputError::RegimeConfidenceOutOfRange(value) => {
                write!(f, "regime confidence must lie in [0, 1], got {value}")
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Errors surfaced by the projection engine.
///
/// Degenerate numeric situations inside the simulation (zero-variance Sharpe
/// denominators, non-positive drawdown peaks) are handled locally with defined
/// defaults and never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Input(InputError),
    InvalidDistributionParameters {
        distribution: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Input(e) => write!(f, "{e}"),
            EngineError::InvalidDistributionParameters {
                distribution,
                reason,
            } => {
                write!(f, "invalid {distribution} parameters: {reason}")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Input(e) => Some(e),
            EngineError::InvalidDistributionParameters { .. } => None,
        }
    }
}

impl From<InputError> for EngineError {
    fn from(e: InputError) -> Self {
        EngineError::Input(e)
    }
}
