use std::fmt;

/// Errors raised when a goal or engine configuration cannot be analyzed.
///
/// Every variant is an invalid-input condition detected before any
/// computation starts. Degenerate horizons and unknown strategy/risk tags are
/// not errors; they resolve to documented defaults.
#[derive(Debug, Clone)]
pub enum GoalError {
    /// Target amount is zero, negative or not finite
    InvalidTargetAmount(f64),
    /// Current amount is negative or not finite
    InvalidCurrentAmount(f64),
    /// Monthly contribution is negative or not finite
    InvalidContribution(f64),
    /// A date string could not be parsed as a civil date
    MalformedDate { input: String, source: jiff::Error },
    /// Monte Carlo run requested with zero paths
    InvalidSimulationCount(usize),
    /// Crash severity range is empty or outside `[0, 1]`
    InvalidCrashSeverity { min: f64, max: f64 },
    /// A market assumption is not finite, or a volatility is negative
    InvalidAssumption { field: String, value: f64 },
    /// A stress or macro scenario carries unusable parameters
    InvalidScenario { name: String, reason: &'static str },
    /// Monte Carlo simulation was cancelled by the caller
    Cancelled,
}

impl fmt::Display for GoalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalError::InvalidTargetAmount(v) => {
                write!(f, "target amount must be positive and finite, got {v}")
            }
            GoalError::InvalidCurrentAmount(v) => {
                write!(f, "current amount must be non-negative and finite, got {v}")
            }
            GoalError::InvalidContribution(v) => {
                write!(
                    f,
                    "monthly contribution must be non-negative and finite, got {v}"
                )
            }
            GoalError::MalformedDate { input, source } => {
                write!(f, "malformed date {input:?}: {source}")
            }
            GoalError::InvalidSimulationCount(n) => {
                write!(f, "simulation count must be at least 1, got {n}")
            }
            GoalError::InvalidCrashSeverity { min, max } => {
                write!(
                    f,
                    "crash severity range [{min}, {max}] must satisfy 0 <= min <= max <= 1"
                )
            }
            GoalError::InvalidAssumption { field, value } => {
                write!(f, "invalid market assumption {field}: {value}")
            }
            GoalError::InvalidScenario { name, reason } => {
                write!(f, "invalid scenario {name:?}: {reason}")
            }
            GoalError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for GoalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GoalError::MalformedDate { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GoalError>;
